// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events reported to whoever renders the display tree.

use alloc::string::String;
use alloc::vec::Vec;

use crate::shape::ShapeId;

/// Event emitted by an [`Overlay`](crate::Overlay) operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum OverlayEvent {
    /// Every shape was dropped.
    Cleared,
    /// Shapes became present.
    Inserted {
        /// Exactly the new shapes, in pre-order: the whole tree after a
        /// rebuild, the spliced subtrees after an incremental insert.
        items: Vec<ShapeId>,
    },
    /// Building failed; the display tree is empty.
    Error {
        /// Human-readable description of the failure.
        message: String,
    },
}
