// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the parse tree: node identifiers and item payloads.

use alloc::string::String;
use kurbo::Point;

use crate::document::NodeKind;

/// Identifier for a node in a [`ParseTree`](crate::ParseTree) (generational).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Payload of a parse tree node.
///
/// A node serializes as `open`, then its children, then `close`. Leaves keep
/// all of their text in `open`.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    /// Node kind.
    pub kind: NodeKind,
    /// Text preceding the children (the whole text for leaves).
    pub open: String,
    /// Text following the children.
    pub close: String,
    /// Editable coordinate in document space.
    pub coordinate: Option<Point>,
    /// Name this node declares, e.g. `a` in `\node (a) at (1,2)`.
    pub name: Option<String>,
}

impl Item {
    fn new(kind: NodeKind, open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            kind,
            open: open.into(),
            close: close.into(),
            coordinate: None,
            name: None,
        }
    }

    /// A scope such as `\begin{scope}` … `\end{scope}`.
    pub fn scope(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self::new(NodeKind::Scope, open, close)
    }

    /// A transparent container such as a picture body or a `\draw … ;` statement.
    pub fn container(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self::new(NodeKind::Container, open, close)
    }

    /// A Bezier `controls` clause.
    pub fn controls(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self::new(NodeKind::Controls, open, close)
    }

    /// A coordinate item; `coordinate` is `None` when it is not editable
    /// (for example a reference to a named node).
    pub fn coordinate(text: impl Into<String>, coordinate: Option<Point>) -> Self {
        Self {
            coordinate,
            ..Self::new(NodeKind::Coordinate, text, "")
        }
    }

    /// A path operation such as `--` or `cycle`.
    pub fn path(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Path, text, "")
    }

    /// Declare a name for this node.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Length of the node's own text, excluding children.
    pub fn own_len(&self) -> usize {
        self.open.len() + self.close.len()
    }
}
