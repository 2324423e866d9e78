// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for display shapes: identifiers, kinds, filters.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::{Point, Rect};

/// Identifier for a shape in a [`DisplayTree`](crate::DisplayTree) (generational).
///
/// Identifiers are never reused for a different shape: once a shape is
/// dropped, its id stays stale even if the slot is recycled.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ShapeId(pub(crate) u32, pub(crate) u32);

impl ShapeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Variant of a display shape.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    /// Visual group owning at least one child shape.
    Scope,
    /// A displayed coordinate.
    Node,
    /// A Bezier control handle.
    ControlPoint {
        /// The [`ShapeKind::Node`] shape this handle curves from or to.
        ///
        /// `None` until binding runs, or when that endpoint is not displayed.
        origin: Option<ShapeId>,
    },
}

impl ShapeKind {
    /// Whether this is [`ShapeKind::Scope`].
    pub const fn is_scope(self) -> bool {
        matches!(self, Self::Scope)
    }

    /// The filter flag selecting this kind.
    pub const fn flag(self) -> ShapeFilter {
        match self {
            Self::Scope => ShapeFilter::SCOPES,
            Self::Node => ShapeFilter::NODES,
            Self::ControlPoint { .. } => ShapeFilter::CONTROL_POINTS,
        }
    }
}

bitflags::bitflags! {
    /// Shape kinds taking part in a query.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ShapeFilter: u8 {
        /// Include scopes.
        const SCOPES         = 0b0000_0001;
        /// Include nodes.
        const NODES          = 0b0000_0010;
        /// Include control points.
        const CONTROL_POINTS = 0b0000_0100;
    }
}

impl Default for ShapeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ShapeFilter {
    /// Check whether a shape of `kind` passes this filter.
    pub fn matches(self, kind: ShapeKind) -> bool {
        self.contains(kind.flag())
    }
}

/// A display shape: the view-model of one document node.
#[derive(Clone, Debug)]
pub struct Shape<K> {
    pub(crate) generation: u32,
    pub(crate) kind: ShapeKind,
    pub(crate) doc: K,
    pub(crate) position: Point,
    pub(crate) bounds: Rect,
    pub(crate) tooltip: Option<String>,
    pub(crate) parent: Option<ShapeId>,
    pub(crate) children: Vec<ShapeId>,
}

impl<K: Copy> Shape<K> {
    /// Variant of this shape.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Key of the document node this shape visualizes.
    pub fn doc(&self) -> K {
        self.doc
    }

    /// Screen-space position. For scopes, the centre of [`Shape::bounds`].
    pub fn position(&self) -> Point {
        self.position
    }

    /// Screen-space extent.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Tooltip text, when the node declares a resolvable name.
    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    /// Bound origin of a control point; `None` for other kinds.
    pub fn origin(&self) -> Option<ShapeId> {
        match self.kind {
            ShapeKind::ControlPoint { origin } => origin,
            _ => None,
        }
    }

    /// Whether this shape is a scope.
    pub fn is_scope(&self) -> bool {
        self.kind.is_scope()
    }

    /// Enclosing scope, or `None` at top level.
    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    /// Ordered children (scopes only).
    pub fn children(&self) -> &[ShapeId] {
        &self.children
    }
}
