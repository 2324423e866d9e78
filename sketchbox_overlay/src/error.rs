// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.

/// Failure while building shapes from a document subtree.
///
/// The controller never returns these; it clears the display tree and reports
/// them as [`OverlayEvent::Error`](crate::OverlayEvent::Error).
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BuildError {
    /// A node encloses itself.
    #[error("cyclic document structure: a node encloses itself at depth {depth}")]
    Cycle {
        /// Nesting depth at which the repeated node was met.
        depth: usize,
    },
    /// A node is reachable through more than one parent.
    #[error("document node is reachable through more than one parent")]
    SharedNode,
    /// Nesting deeper than [`OverlayConfig::max_depth`](crate::OverlayConfig::max_depth).
    #[error("document nesting exceeds the limit of {limit} levels")]
    DepthLimit {
        /// The configured limit.
        limit: usize,
    },
    /// The document does not know a key it handed out.
    #[error("document node is not live")]
    MissingNode,
}

/// Failure returned to the sender of a document change.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SyncError {
    /// Removal-driven incremental update is not implemented; rebind or rebuild instead.
    #[error("removal-driven incremental update is not supported")]
    UnsupportedRemoval,
}
