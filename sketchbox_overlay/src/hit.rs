// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen-point hit testing.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use kurbo::Point;

use crate::shape::{ShapeFilter, ShapeId};
use crate::tree::DisplayTree;

/// Result of a hit test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hit {
    /// The matched shape.
    pub shape: ShapeId,
    /// Path from the top level to the shape (inclusive).
    pub path: Vec<ShapeId>,
}

/// Find the shape under `point`.
///
/// Candidates are shapes passing `filter` whose bounds contain `point`.
/// Deeper shapes win; among equally deep shapes the one drawn last (later in
/// [`DisplayTree::all_items`]) wins.
pub fn hit_test_point<K>(tree: &DisplayTree<K>, point: Point, filter: ShapeFilter) -> Option<Hit>
where
    K: Copy + Eq + Hash + Debug,
{
    let mut best: Option<Hit> = None;
    for id in tree.all_items() {
        let Some(shape) = tree.get(id) else {
            continue;
        };
        if !filter.matches(shape.kind()) || !shape.bounds().contains(point) {
            continue;
        }
        let path = tree.path_to(id);
        if best.as_ref().is_none_or(|b| path.len() >= b.path.len()) {
            best = Some(Hit { shape: id, path });
        }
    }
    best
}
