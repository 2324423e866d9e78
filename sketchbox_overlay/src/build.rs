// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree builder: document subtree to unattached shapes.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use kurbo::{Point, Rect};
use sketchbox_doc::{Document, NodeKind};
use smallvec::SmallVec;

use crate::config::OverlayConfig;
use crate::error::BuildError;
use crate::position::{ToScreen, fit_scope, leaf_bounds};
use crate::shape::ShapeKind;

/// An owned shape subtree produced by [`build`], not yet attached to a
/// [`DisplayTree`](crate::DisplayTree).
#[derive(Clone, Debug, PartialEq)]
pub struct BuiltShape<K> {
    pub(crate) kind: ShapeKind,
    pub(crate) doc: K,
    pub(crate) position: Point,
    pub(crate) bounds: Rect,
    pub(crate) tooltip: Option<String>,
    pub(crate) children: Vec<Self>,
}

impl<K: Copy> BuiltShape<K> {
    /// Variant of the shape.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Key of the visualized document node.
    pub fn doc(&self) -> K {
        self.doc
    }

    /// Screen position.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Child subtrees (scopes only).
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Number of shapes in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

/// Build the shapes representing `node` and its subtree.
///
/// - `Scope` nodes wrap their displayed descendants and are dropped when they
///   have none.
/// - `Container` and `Controls` nodes contribute their children's shapes
///   directly.
/// - `Coordinate` nodes with an editable coordinate become one leaf; a
///   [`ShapeKind::ControlPoint`] when the parent is a `Controls` node.
/// - `Path` nodes and everything beneath them contribute nothing.
///
/// The result is a list because a transparent node may yield any number of
/// top-level shapes.
pub fn build<D, T>(
    doc: &D,
    node: D::Key,
    transform: &T,
    config: &OverlayConfig,
) -> Result<Vec<BuiltShape<D::Key>>, BuildError>
where
    D: Document,
    T: ToScreen + ?Sized,
{
    build_at(doc, node, 0, transform, config)
}

/// Like [`build`], for a `node` that already sits `depth` levels below the
/// document root.
///
/// The depth counts towards [`OverlayConfig::max_depth`], so building a
/// subtree fails exactly where building the whole document would.
pub fn build_at<D, T>(
    doc: &D,
    node: D::Key,
    depth: usize,
    transform: &T,
    config: &OverlayConfig,
) -> Result<Vec<BuiltShape<D::Key>>, BuildError>
where
    D: Document,
    T: ToScreen + ?Sized,
{
    let mut builder = Builder {
        doc,
        transform,
        config,
        base: depth,
        path: SmallVec::new(),
        seen: HashSet::new(),
    };
    let mut out = Vec::new();
    builder.visit(node, &mut out)?;
    Ok(out)
}

struct Builder<'a, D: Document, T: ?Sized> {
    doc: &'a D,
    transform: &'a T,
    config: &'a OverlayConfig,
    /// document depth of the node the build started from
    base: usize,
    /// ancestors of the node being visited, outermost first
    path: SmallVec<[D::Key; 16]>,
    seen: HashSet<D::Key>,
}

impl<D, T> Builder<'_, D, T>
where
    D: Document,
    T: ToScreen + ?Sized,
{
    fn visit(
        &mut self,
        node: D::Key,
        out: &mut Vec<BuiltShape<D::Key>>,
    ) -> Result<(), BuildError> {
        if self.path.contains(&node) {
            return Err(BuildError::Cycle {
                depth: self.path.len(),
            });
        }
        if !self.seen.insert(node) {
            return Err(BuildError::SharedNode);
        }
        if self.base + self.path.len() >= self.config.max_depth {
            return Err(BuildError::DepthLimit {
                limit: self.config.max_depth,
            });
        }
        let doc = self.doc;
        let kind = doc.kind(node).ok_or(BuildError::MissingNode)?;

        match kind {
            NodeKind::Scope => {
                let mut children = Vec::new();
                self.path.push(node);
                for &child in doc.children(node) {
                    self.visit(child, &mut children)?;
                }
                self.path.pop();
                let padding = self.config.scope_padding;
                match fit_scope(children.iter().map(|c| c.bounds), padding) {
                    Some(bounds) => out.push(BuiltShape {
                        kind: ShapeKind::Scope,
                        doc: node,
                        position: bounds.center(),
                        bounds,
                        tooltip: self.tooltip(node),
                        children,
                    }),
                    None => tracing::trace!(?node, "pruned empty scope"),
                }
            }
            NodeKind::Container | NodeKind::Controls => {
                self.path.push(node);
                for &child in doc.children(node) {
                    self.visit(child, out)?;
                }
                self.path.pop();
            }
            NodeKind::Coordinate => {
                if let Some(coordinate) = doc.coordinate(node) {
                    let in_controls = self
                        .path
                        .last()
                        .copied()
                        .or_else(|| doc.parent(node))
                        .and_then(|p| doc.kind(p))
                        == Some(NodeKind::Controls);
                    let position = self.transform.to_screen(coordinate);
                    out.push(BuiltShape {
                        kind: if in_controls {
                            ShapeKind::ControlPoint { origin: None }
                        } else {
                            ShapeKind::Node
                        },
                        doc: node,
                        position,
                        bounds: leaf_bounds(position, self.config.hit_radius),
                        tooltip: self.tooltip(node),
                        children: Vec::new(),
                    });
                }
            }
            NodeKind::Path => {}
        }
        Ok(())
    }

    fn tooltip(&self, node: D::Key) -> Option<String> {
        self.doc
            .name(node)
            .filter(|name| self.doc.find_by_name(name).is_some())
            .map(String::from)
    }
}
