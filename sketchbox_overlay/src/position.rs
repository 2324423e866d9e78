// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position adjuster: document coordinates to screen positions and bounds.

use core::fmt::Debug;
use core::hash::Hash;

use kurbo::{Affine, Point, Rect};
use sketchbox_doc::Document;

use crate::config::OverlayConfig;
use crate::shape::ShapeId;
use crate::tree::DisplayTree;

/// Maps document-space coordinates to screen space.
pub trait ToScreen {
    /// Map one point.
    fn to_screen(&self, point: Point) -> Point;
}

impl ToScreen for Affine {
    fn to_screen(&self, point: Point) -> Point {
        *self * point
    }
}

/// Adapts a closure to [`ToScreen`].
///
/// ```rust
/// use kurbo::Point;
/// use sketchbox_overlay::{FnTransform, ToScreen};
///
/// let flip = FnTransform(|p: Point| Point::new(p.x, -p.y));
/// assert_eq!(flip.to_screen(Point::new(1.0, 2.0)), Point::new(1.0, -2.0));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnTransform<F>(pub F);

impl<F: Fn(Point) -> Point> ToScreen for FnTransform<F> {
    fn to_screen(&self, point: Point) -> Point {
        (self.0)(point)
    }
}

/// Screen extent of a leaf shape at `position`.
pub(crate) fn leaf_bounds(position: Point, radius: f64) -> Rect {
    Rect::from_center_size(position, (2.0 * radius, 2.0 * radius))
}

/// Union of `children`, inflated by `padding`; `None` when there are no children.
pub(crate) fn fit_scope(children: impl IntoIterator<Item = Rect>, padding: f64) -> Option<Rect> {
    children
        .into_iter()
        .reduce(|acc, r| acc.union(r))
        .map(|r| r.inflate(padding, padding))
}

/// Recompute the position of `id` and, for scopes, of its whole subtree.
///
/// Leaves take `transform(coordinate)` of their document node. A node that no
/// longer declares an editable coordinate keeps its previous position. Scopes
/// refit their bounds after their children have moved. Stale ids are ignored.
pub fn adjust<D, T>(
    tree: &mut DisplayTree<D::Key>,
    id: ShapeId,
    doc: &D,
    transform: &T,
    config: &OverlayConfig,
) where
    D: Document,
    T: ToScreen + ?Sized,
{
    let Some(shape) = tree.get(id) else {
        return;
    };
    if shape.is_scope() {
        let children = shape.children().to_vec();
        for child in children {
            adjust(tree, child, doc, transform, config);
        }
        refit(tree, id, config);
        return;
    }

    let key = shape.doc();
    let Some(coordinate) = doc.coordinate(key) else {
        tracing::trace!(?key, "no editable coordinate; keeping previous position");
        return;
    };
    let position = transform.to_screen(coordinate);
    if let Some(shape) = tree.get_mut(id) {
        tracing::trace!(?key, x = position.x, y = position.y, "position updated");
        shape.position = position;
        shape.bounds = leaf_bounds(position, config.hit_radius);
    }
}

/// Refit a scope's bounds and position from its children.
pub(crate) fn refit<K>(tree: &mut DisplayTree<K>, id: ShapeId, config: &OverlayConfig)
where
    K: Copy + Eq + Hash + Debug,
{
    let fitted = fit_scope(
        tree.children_of(id)
            .iter()
            .filter_map(|&c| tree.get(c).map(|s| s.bounds)),
        config.scope_padding,
    );
    if let Some(bounds) = fitted
        && let Some(shape) = tree.get_mut(id)
        && shape.is_scope()
    {
        shape.bounds = bounds;
        shape.position = bounds.center();
    }
}

/// Refit every scope enclosing `id`, innermost first.
pub(crate) fn refit_ancestors<K>(tree: &mut DisplayTree<K>, id: ShapeId, config: &OverlayConfig)
where
    K: Copy + Eq + Hash + Debug,
{
    let mut current = tree.parent_of(id);
    while let Some(scope) = current {
        refit(tree, scope, config);
        current = tree.parent_of(scope);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::build;
    use alloc::vec::Vec;
    use sketchbox_doc::{Item, ParseTree};

    #[test]
    fn leaf_bounds_is_centred_square() {
        let r = leaf_bounds(Point::new(10.0, 20.0), 4.0);
        assert_eq!(r, Rect::new(6.0, 16.0, 14.0, 24.0));
    }

    #[test]
    fn fit_scope_unions_and_pads() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(8.0, 4.0, 10.0, 6.0);
        let fitted = fit_scope([a, b], 1.0);
        assert_eq!(fitted, Some(Rect::new(-1.0, -1.0, 11.0, 7.0)));
        assert_eq!(fit_scope(core::iter::empty(), 1.0), None);
    }

    #[test]
    fn adjust_follows_coordinate_and_refits_scope() {
        let mut doc = ParseTree::new(Item::container("", ""));
        let root = doc.root_id();
        let scope = doc.append(root, Item::scope("{", "}")).unwrap();
        let a = doc
            .append(scope, Item::coordinate("(0,0)", Some(Point::ZERO)))
            .unwrap();
        let b = doc
            .append(scope, Item::coordinate("(1,1)", Some(Point::new(1.0, 1.0))))
            .unwrap();

        let config = OverlayConfig::new().hit_radius(1.0).scope_padding(0.0);
        let transform = Affine::scale(10.0);
        let mut tree = DisplayTree::new();
        let built = build(&doc, root, &transform, &config).unwrap();
        tree.attach(None, built);

        doc.set_coordinate(b, "(3,2)", Some(Point::new(3.0, 2.0))).unwrap();
        let scope_id = tree.shape_for(scope).unwrap();
        adjust(&mut tree, scope_id, &doc, &transform, &config);

        let b_id = tree.shape_for(b).unwrap();
        assert_eq!(tree.get(b_id).unwrap().position(), Point::new(30.0, 20.0));
        let a_id = tree.shape_for(a).unwrap();
        assert_eq!(tree.get(a_id).unwrap().position(), Point::ZERO);
        let scope_shape = tree.get(scope_id).unwrap();
        assert_eq!(scope_shape.bounds(), Rect::new(-1.0, -1.0, 31.0, 21.0));
        assert_eq!(scope_shape.position(), Point::new(15.0, 10.0));
    }

    #[test]
    fn lost_coordinate_keeps_previous_position() {
        let mut doc = ParseTree::new(Item::container("", ""));
        let root = doc.root_id();
        let a = doc
            .append(root, Item::coordinate("(2,3)", Some(Point::new(2.0, 3.0))))
            .unwrap();
        let config = OverlayConfig::default();
        let mut tree = DisplayTree::new();
        tree.attach(None, build(&doc, root, &Affine::IDENTITY, &config).unwrap());

        doc.set_coordinate(a, "(x,y)", None).unwrap();
        let id = tree.shape_for(a).unwrap();
        adjust(&mut tree, id, &doc, &Affine::IDENTITY, &config);
        assert_eq!(tree.get(id).unwrap().position(), Point::new(2.0, 3.0));
    }

    #[test]
    fn refit_ancestors_walks_to_top_level() {
        let mut doc = ParseTree::new(Item::container("", ""));
        let root = doc.root_id();
        let outer = doc.append(root, Item::scope("{", "}")).unwrap();
        let inner = doc.append(outer, Item::scope("{", "}")).unwrap();
        let a = doc
            .append(inner, Item::coordinate("a", Some(Point::ZERO)))
            .unwrap();
        let config = OverlayConfig::new().hit_radius(1.0).scope_padding(1.0);
        let mut tree = DisplayTree::new();
        tree.attach(None, build(&doc, root, &Affine::IDENTITY, &config).unwrap());

        let a_id = tree.shape_for(a).unwrap();
        if let Some(shape) = tree.get_mut(a_id) {
            shape.position = Point::new(10.0, 0.0);
            shape.bounds = leaf_bounds(shape.position, 1.0);
        }
        refit_ancestors(&mut tree, a_id, &config);

        let centres: Vec<Point> = [inner, outer]
            .iter()
            .map(|&k| tree.get(tree.shape_for(k).unwrap()).unwrap().position())
            .collect();
        assert_eq!(centres, [Point::new(10.0, 0.0), Point::new(10.0, 0.0)]);
        let outer_bounds = tree.get(tree.shape_for(outer).unwrap()).unwrap().bounds();
        assert_eq!(outer_bounds, Rect::new(7.0, -3.0, 13.0, 3.0));
    }
}
