// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sketchbox_overlay --heading-base-level=0

//! Sketchbox Overlay: a display tree of editable shapes kept in step with a drawing document.
//!
//! A drawing editor shows draggable handles over its canvas: one per coordinate that can be
//! edited, one per Bezier control point, and a box around each scope that holds any of them.
//! This crate derives that display tree from a [`sketchbox_doc::Document`] and keeps it
//! synchronized as the document changes, without owning the document.
//!
//! - Builds shapes from the document structure. Transparent nodes (statements, option lists)
//!   contribute their children's shapes directly; path operations hide their subtree; scopes
//!   without anything to display are pruned.
//! - Follows [`DocumentChange`](sketchbox_doc::DocumentChange) messages: text edits move shapes,
//!   inserts splice new shapes in, removals are refused.
//! - Binds each control point to the displayed endpoint of its curve.
//! - Maps text offsets and screen points back to shapes.
//!
//! ## API overview
//!
//! - [`Overlay`]: the controller. Binds a document, rebuilds, applies change messages, and
//!   returns the [`OverlayEvent`]s a renderer needs.
//! - [`DisplayTree`]: the shape arena with its top-level list and document-key index.
//! - [`Shape`], [`ShapeKind`], [`ShapeId`]: display shapes and their generational handles.
//! - [`ToScreen`]: document-to-screen mapping. Implemented by [`kurbo::Affine`] and
//!   [`FnTransform`].
//! - [`OverlayConfig`]: depth limit, leaf size, scope padding.
//!
//! The building blocks are public as well, for hosts driving a [`DisplayTree`] directly:
//! [`build()`] and [`build_at()`], [`bind()`], [`adjust()`], [`locate()`], and
//! [`hit_test_point()`].
//!
//! ## Errors
//!
//! Malformed documents (cycles, nodes with two parents, runaway nesting) never escape as
//! errors: the overlay clears itself and reports [`OverlayEvent::Error`]. The only error a
//! caller sees is [`SyncError::UnsupportedRemoval`], returned for every removal message.
//!
//! ## Logging
//!
//! Rebuilds, inserts, and ignored messages are logged with [`tracing`] at `debug` level;
//! per-shape position updates at `trace`; build failures at `error`. No subscriber is installed.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`, `tracing`, `thiserror`, and
//!   `sketchbox_doc`.
//! - `libm`: `no_std` float math for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bind;
mod build;
mod config;
mod error;
mod event;
mod hit;
mod locate;
mod overlay;
mod position;
mod shape;
mod tree;

#[cfg(test)]
mod test_util;

pub use bind::bind;
pub use build::{BuiltShape, build, build_at};
pub use config::OverlayConfig;
pub use error::{BuildError, SyncError};
pub use event::OverlayEvent;
pub use hit::{Hit, hit_test_point};
pub use locate::locate;
pub use overlay::Overlay;
pub use position::{FnTransform, ToScreen, adjust};
pub use shape::{Shape, ShapeFilter, ShapeId, ShapeKind};
pub use tree::{AllItems, DisplayTree};
