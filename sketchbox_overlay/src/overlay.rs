// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization controller.

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashSet;
use kurbo::{Affine, Point};
use sketchbox_doc::{Document, DocumentChange, DocumentId, NodeKind};

use crate::bind::bind;
use crate::build::{BuiltShape, build, build_at};
use crate::config::OverlayConfig;
use crate::error::{BuildError, SyncError};
use crate::event::OverlayEvent;
use crate::hit::{Hit, hit_test_point};
use crate::locate::locate;
use crate::position::{ToScreen, adjust, refit, refit_ancestors};
use crate::shape::{Shape, ShapeFilter, ShapeId};
use crate::tree::{AllItems, DisplayTree};

/// Keeps a [`DisplayTree`] in step with one bound document.
///
/// The overlay never holds the document itself, only its [`DocumentId`].
/// Every operation that reads the document borrows it for the duration of the
/// call, and every operation returns the [`OverlayEvent`]s it produced.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use sketchbox_doc::{Item, ParseTree};
/// use sketchbox_overlay::{Overlay, OverlayEvent};
///
/// let mut doc = ParseTree::new(Item::container("", ""));
/// let root = doc.root_id();
/// let scope = doc.append(root, Item::scope("{", "}")).unwrap();
/// doc.append(scope, Item::coordinate("(0,0)", Some(Point::ZERO))).unwrap();
/// doc.take_changes();
///
/// let mut overlay = Overlay::new();
/// let events = overlay.set_document(Some(&doc));
/// assert!(matches!(
///     &events[..],
///     [OverlayEvent::Cleared, OverlayEvent::Inserted { items }] if items.len() == 2
/// ));
///
/// let b = doc
///     .append(scope, Item::coordinate("(1,0)", Some(Point::new(1.0, 0.0))))
///     .unwrap();
/// for change in doc.take_changes() {
///     overlay.apply(&doc, change).unwrap();
/// }
/// let shape = overlay.shape_for(b).unwrap();
/// assert_eq!(overlay.parent_of(shape), overlay.shape_for(scope));
/// ```
#[derive(Debug)]
pub struct Overlay<K, T = Affine> {
    tree: DisplayTree<K>,
    document: Option<DocumentId>,
    transform: T,
    config: OverlayConfig,
}

impl<K: Copy + Eq + Hash + Debug> Default for Overlay<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> Overlay<K> {
    /// Create an unbound overlay that displays document coordinates unchanged.
    pub fn new() -> Self {
        Self::with_transform(Affine::IDENTITY)
    }
}

impl<K, T> Overlay<K, T>
where
    K: Copy + Eq + Hash + Debug,
    T: ToScreen,
{
    /// Create an unbound overlay mapping document coordinates through `transform`.
    pub fn with_transform(transform: T) -> Self {
        Self {
            tree: DisplayTree::new(),
            document: None,
            transform,
            config: OverlayConfig::default(),
        }
    }

    /// Replace the configuration. Takes effect on the next build or adjustment.
    pub fn with_config(mut self, config: OverlayConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// The document-to-screen transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Replace the transform. Call [`Overlay::adjust_positions`] to apply it.
    pub fn set_transform(&mut self, transform: T) {
        self.transform = transform;
    }

    /// The bound document, if any.
    pub fn document(&self) -> Option<DocumentId> {
        self.document
    }

    /// The display tree.
    pub fn tree(&self) -> &DisplayTree<K> {
        &self.tree
    }

    /// Top-level shapes, see [`DisplayTree::top_level`].
    pub fn top_level(&self) -> &[ShapeId] {
        self.tree.top_level()
    }

    /// Every shape in pre-order, see [`DisplayTree::all_items`].
    pub fn all_items(&self) -> AllItems<'_, K> {
        self.tree.all_items()
    }

    /// Access a live shape.
    pub fn get(&self, id: ShapeId) -> Option<&Shape<K>> {
        self.tree.get(id)
    }

    /// The shape visualizing a document node.
    pub fn shape_for(&self, key: K) -> Option<ShapeId> {
        self.tree.shape_for(key)
    }

    /// Enclosing scope of a shape.
    pub fn parent_of(&self, id: ShapeId) -> Option<ShapeId> {
        self.tree.parent_of(id)
    }

    /// Children of a scope.
    pub fn children_of(&self, id: ShapeId) -> &[ShapeId] {
        self.tree.children_of(id)
    }

    /// See [`DisplayTree::next_depth_first`].
    pub fn next_depth_first(&self, id: ShapeId) -> Option<ShapeId> {
        self.tree.next_depth_first(id)
    }

    /// See [`DisplayTree::prev_depth_first`].
    pub fn prev_depth_first(&self, id: ShapeId) -> Option<ShapeId> {
        self.tree.prev_depth_first(id)
    }

    /// Number of shapes.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Bind a document (or none) and rebuild.
    ///
    /// Binding the already bound document does nothing. Passing `None`
    /// unbinds and clears.
    pub fn set_document<D>(&mut self, doc: Option<&D>) -> Vec<OverlayEvent>
    where
        D: Document<Key = K>,
    {
        let id = doc.map(Document::id);
        if id == self.document {
            return Vec::new();
        }
        tracing::debug!(previous = ?self.document, next = ?id, "binding document");
        self.document = id;
        match doc {
            Some(doc) => self.rebuild(doc),
            None => self.clear(),
        }
    }

    /// Drop every shape. The document stays bound.
    pub fn clear(&mut self) -> Vec<OverlayEvent> {
        self.tree.clear();
        vec![OverlayEvent::Cleared]
    }

    /// Clear, then rebuild the whole display tree from the bound document.
    ///
    /// If `doc` is not the bound document only the clear happens. A build
    /// failure leaves the tree empty and is reported as
    /// [`OverlayEvent::Error`].
    pub fn rebuild<D>(&mut self, doc: &D) -> Vec<OverlayEvent>
    where
        D: Document<Key = K>,
    {
        let mut events = self.clear();
        if !self.is_bound(doc) {
            tracing::debug!(document = ?doc.id(), "rebuild for an unbound document; cleared only");
            return events;
        }
        let Some(root) = doc.root() else {
            events.push(OverlayEvent::Inserted { items: Vec::new() });
            return events;
        };
        match build(doc, root, &self.transform, &self.config) {
            Ok(built) => {
                let items = self.tree.attach(None, built);
                bind(&mut self.tree, doc);
                tracing::debug!(shapes = items.len(), "rebuilt display tree");
                events.push(OverlayEvent::Inserted { items });
            }
            Err(err) => events.extend(self.recover(err)),
        }
        events
    }

    /// Recompute every shape's position from the bound document.
    pub fn adjust_positions<D>(&mut self, doc: &D)
    where
        D: Document<Key = K>,
    {
        if !self.is_bound(doc) {
            tracing::debug!(document = ?doc.id(), "ignoring adjustment for an unbound document");
            return;
        }
        let top_level = self.tree.top_level().to_vec();
        for id in top_level {
            adjust(&mut self.tree, id, doc, &self.transform, &self.config);
        }
    }

    /// Follow one change message from `doc`.
    ///
    /// Removals always fail with [`SyncError::UnsupportedRemoval`]; the
    /// display tree is left as it was and callers may [`Overlay::rebuild`].
    /// Changes from a document other than the bound one are ignored.
    pub fn apply<D>(
        &mut self,
        doc: &D,
        change: DocumentChange<K>,
    ) -> Result<Vec<OverlayEvent>, SyncError>
    where
        D: Document<Key = K>,
    {
        match change {
            DocumentChange::Removed(node) => {
                tracing::debug!(?node, "removal cannot be applied incrementally");
                Err(SyncError::UnsupportedRemoval)
            }
            _ if !self.is_bound(doc) => {
                tracing::debug!(
                    document = ?doc.id(),
                    ?change,
                    "ignoring change from an unbound document"
                );
                Ok(Vec::new())
            }
            DocumentChange::TextChanged(node) => {
                self.text_changed(doc, node);
                Ok(Vec::new())
            }
            DocumentChange::Inserted(node) => Ok(self.inserted(doc, node)),
        }
    }

    /// The deepest shape whose document span contains `offset`.
    pub fn locate<D>(&self, doc: &D, offset: usize) -> Option<ShapeId>
    where
        D: Document<Key = K>,
    {
        locate(&self.tree, doc, offset, self.tree.top_level())
    }

    /// The shape under a screen point, see [`hit_test_point`](crate::hit_test_point()).
    pub fn hit_test_point(&self, point: Point, filter: ShapeFilter) -> Option<Hit> {
        hit_test_point(&self.tree, point, filter)
    }

    fn is_bound<D: Document>(&self, doc: &D) -> bool {
        self.document == Some(doc.id())
    }

    fn text_changed<D>(&mut self, doc: &D, node: K)
    where
        D: Document<Key = K>,
    {
        // Adjusting a shape covers its subtree, so collect the outermost
        // displayed shapes at or below `node` and stop descending there.
        let mut outermost = Vec::new();
        let mut seen = HashSet::new();
        let mut pending = vec![(node, 0)];
        while let Some((key, depth)) = pending.pop() {
            if !seen.insert(key) {
                continue;
            }
            if let Some(id) = self.tree.shape_for(key) {
                outermost.push(id);
            } else if depth < self.config.max_depth {
                pending.extend(doc.children(key).iter().rev().map(|&c| (c, depth + 1)));
            }
        }
        tracing::debug!(?node, shapes = outermost.len(), "text changed");
        for id in outermost {
            adjust(&mut self.tree, id, doc, &self.transform, &self.config);
            refit_ancestors(&mut self.tree, id, &self.config);
        }
    }

    fn inserted<D>(&mut self, doc: &D, node: K) -> Vec<OverlayEvent>
    where
        D: Document<Key = K>,
    {
        if doc.kind(node).is_none() {
            tracing::debug!(?node, "inserted node is no longer live");
            return Vec::new();
        }
        if self.tree.shape_for(node).is_some() {
            tracing::debug!(?node, "inserted node is already displayed");
            return Vec::new();
        }

        let mut target = node;
        let mut parent = None;
        for ancestor in doc.ancestors(node) {
            let kind = doc.kind(ancestor);
            if kind == Some(NodeKind::Path) {
                tracing::debug!(?node, ?ancestor, "inserted below a path; nothing to display");
                return Vec::new();
            }
            if let Some(id) = self.tree.shape_for(ancestor) {
                if self.tree.get(id).is_some_and(Shape::is_scope) {
                    parent = Some(id);
                    break;
                }
                tracing::warn!(?node, ?ancestor, "inserted below a leaf shape; rebuilding");
                return self.rebuild(doc);
            }
            if kind == Some(NodeKind::Scope) {
                target = ancestor;
            }
        }

        // A rebuild starts at the root, so the target is built at its full depth.
        let mut chain = doc.ancestors(target);
        let depth = chain.by_ref().count();
        if chain.is_cyclic() {
            return self.recover(BuildError::Cycle { depth });
        }
        let built = match build_at(doc, target, depth, &self.transform, &self.config) {
            Ok(built) => built,
            Err(err) => return self.recover(err),
        };
        if built.is_empty() {
            tracing::debug!(?node, "inserted subtree has nothing to display");
            return Vec::new();
        }
        if self.overlaps_index(&built) {
            tracing::warn!(?node, "inserted subtree is already partly displayed; rebuilding");
            return self.rebuild(doc);
        }

        let items = self.tree.attach(parent, built);
        if let Some(p) = parent {
            refit(&mut self.tree, p, &self.config);
            refit_ancestors(&mut self.tree, p, &self.config);
        }
        bind(&mut self.tree, doc);
        tracing::debug!(?node, ?target, shapes = items.len(), "spliced inserted subtree");
        vec![OverlayEvent::Inserted { items }]
    }

    fn overlaps_index(&self, built: &[BuiltShape<K>]) -> bool {
        built
            .iter()
            .any(|b| self.tree.shape_for(b.doc).is_some() || self.overlaps_index(&b.children))
    }

    fn recover(&mut self, err: BuildError) -> Vec<OverlayEvent> {
        tracing::error!(%err, "building display shapes failed; display cleared");
        let mut events = Vec::new();
        if !self.tree.is_empty() {
            events.extend(self.clear());
        }
        events.push(OverlayEvent::Error {
            message: err.to_string(),
        });
        events
    }
}
