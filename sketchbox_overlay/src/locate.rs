// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Offset locator: text position to shape.

use sketchbox_doc::Document;

use crate::shape::ShapeId;
use crate::tree::DisplayTree;

/// Find the deepest shape among `scope` (and their descendants) whose
/// document span contains `offset`.
///
/// Spans are half-open: a shape covers `start..start + len`. Siblings are
/// scanned in order and the first match wins; within a matching scope a
/// matching descendant is preferred over the scope itself.
pub fn locate<D: Document>(
    tree: &DisplayTree<D::Key>,
    doc: &D,
    offset: usize,
    scope: &[ShapeId],
) -> Option<ShapeId> {
    for &id in scope {
        let Some(shape) = tree.get(id) else {
            continue;
        };
        let key = shape.doc();
        let start = doc.start_offset(key);
        if !(start..start + doc.text_len(key)).contains(&offset) {
            continue;
        }
        if shape.is_scope() {
            return Some(locate(tree, doc, offset, shape.children()).unwrap_or(id));
        }
        return Some(id);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;
    use crate::config::OverlayConfig;
    use kurbo::{Affine, Point};
    use sketchbox_doc::{Item, NodeId, ParseTree};

    #[test]
    fn finds_deepest_covering_shape() {
        let mut doc = ParseTree::new(Item::container("", ""));
        let root = doc.root_id();
        let scope = doc.append(root, Item::scope("{", "}")).unwrap();
        let a = doc
            .append(scope, Item::coordinate("(0,0)", Some(Point::ZERO)))
            .unwrap();
        doc.append(scope, Item::coordinate("(?)", None)).unwrap();
        let b = doc
            .append(root, Item::coordinate(" (1,1)", Some(Point::new(1.0, 1.0))))
            .unwrap();
        assert_eq!(doc.serialize(), "{(0,0)(?)} (1,1)");

        let config = OverlayConfig::default();
        let mut tree = DisplayTree::new();
        tree.attach(None, build(&doc, root, &Affine::IDENTITY, &config).unwrap());
        let at = |offset| {
            locate(&tree, &doc, offset, tree.top_level()).map(|id| tree.get(id).unwrap().doc())
        };

        let expected: [(usize, Option<NodeId>); 7] = [
            (0, Some(scope)),
            (1, Some(a)),
            (5, Some(a)),
            (7, Some(scope)),
            (9, Some(scope)),
            (10, Some(b)),
            (16, None),
        ];
        for (offset, key) in expected {
            assert_eq!(at(offset), key, "offset {offset}");
        }
    }

    #[test]
    fn empty_scope_list_finds_nothing() {
        let doc = ParseTree::new(Item::container("", ""));
        let tree = DisplayTree::new();
        assert_eq!(locate(&tree, &doc, 0, &[]), None);
    }
}
