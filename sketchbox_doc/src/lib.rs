// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=sketchbox_doc --heading-base-level=0

//! Sketchbox Doc: the document side of a Sketchbox overlay.
//!
//! Drawing markup (pictures, scopes, path statements, coordinates, Bezier
//! `controls` clauses) is edited as a tree. Overlay engines such as
//! `sketchbox_overlay` never own that tree; they read it through the
//! [`Document`] trait and follow its edits through [`DocumentChange`] messages.
//!
//! - [`Document`]: read access by node key (kind, parent, children, offsets,
//!   editable coordinate, names, control-point origins).
//! - [`DocumentId`]: identity of a document instance, used by consumers to
//!   ignore messages from documents they are not bound to.
//! - [`DocumentChange`]: `TextChanged`, `Inserted`, and `Removed` messages.
//! - [`ParseTree`]: a small arena-backed reference implementation with
//!   generational [`NodeId`]s and a change queue. It does not parse text;
//!   callers assemble it from [`Item`]s.
//!
//! ## Offsets
//!
//! Offsets are byte positions in the serialized text. A node spans
//! `start_offset..start_offset + text_len`.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`, `tracing`, and `thiserror`.
//! - `libm`: `no_std` float math for `kurbo`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod document;
mod tree;
mod types;

pub use document::{Ancestors, Document, DocumentChange, DocumentId, NodeKind};
pub use tree::{ParseTree, TreeError};
pub use types::{Item, NodeId};
