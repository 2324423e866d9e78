// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control-point binder.

use alloc::vec::Vec;

use sketchbox_doc::Document;

use crate::shape::{ShapeId, ShapeKind};
use crate::tree::DisplayTree;

/// Point every control point at the displayed curve endpoint it belongs to.
///
/// Origins resolve through [`DisplayTree::shape_for`] and are kept only when
/// they name a live [`ShapeKind::Node`]; anything else binds to `None`.
/// Running it twice changes nothing.
pub fn bind<D: Document>(tree: &mut DisplayTree<D::Key>, doc: &D) {
    let control_points: Vec<ShapeId> = tree
        .all_items()
        .filter(|&id| {
            tree.get(id).is_some_and(|s| matches!(s.kind(), ShapeKind::ControlPoint { .. }))
        })
        .collect();

    for id in control_points {
        let Some(key) = tree.get(id).map(|s| s.doc()) else {
            continue;
        };
        let origin = doc
            .control_origin(key)
            .and_then(|k| tree.shape_for(k))
            .filter(|&o| tree.get(o).is_some_and(|s| s.kind() == ShapeKind::Node));
        if let Some(shape) = tree.get_mut(id) {
            shape.kind = ShapeKind::ControlPoint { origin };
        }
    }
}
