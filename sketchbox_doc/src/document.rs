// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The read interface an overlay engine needs from a document tree, plus the
//! change messages a document emits when it is edited.

use core::fmt::Debug;
use core::hash::Hash;
use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashSet;
use kurbo::Point;

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a document instance.
///
/// Two handles to the same document compare equal; a document created later
/// never reuses an earlier identifier.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Wrap a caller-chosen identifier.
    ///
    /// Prefer [`DocumentId::next`] unless the identifier comes from an external registry.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Allocate a fresh, process-unique identifier.
    pub fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw identifier value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Kind discriminator for document nodes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// Groups its children visually; displayed only while it has a displayed descendant.
    Scope,
    /// Transparent grouping (a picture body, a path statement, an option list).
    Container,
    /// Bezier `controls` clause; its child coordinates are control points.
    Controls,
    /// Item that may declare an editable coordinate.
    Coordinate,
    /// Path operation; never displayed, nor is anything beneath it.
    Path,
}

impl NodeKind {
    /// Whether nodes of this kind may own children.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Scope | Self::Container | Self::Controls)
    }
}

/// Change message emitted by a document after an edit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DocumentChange<K> {
    /// Text inside the node's span changed; the tree structure did not.
    TextChanged(K),
    /// The node (with whatever subtree it holds) was inserted.
    Inserted(K),
    /// The node and its subtree were removed. The key is no longer live.
    Removed(K),
}

impl<K: Copy> DocumentChange<K> {
    /// The node the change refers to.
    pub fn node(&self) -> K {
        match *self {
            Self::TextChanged(k) | Self::Inserted(k) | Self::Removed(k) => k,
        }
    }
}

/// Read access to a document tree.
///
/// Keys are small copyable handles. Methods receiving a key the document no
/// longer knows return empty or `None` results rather than panicking.
pub trait Document {
    /// Node handle.
    type Key: Copy + Eq + Hash + Debug;

    /// Identity of this document.
    fn id(&self) -> DocumentId;

    /// Root node, if the document has one.
    fn root(&self) -> Option<Self::Key>;

    /// Kind of a live node; `None` for stale keys.
    fn kind(&self, node: Self::Key) -> Option<NodeKind>;

    /// Enclosing container of a node; `None` for the root and stale keys.
    fn parent(&self, node: Self::Key) -> Option<Self::Key>;

    /// Ordered children of a container; empty for leaves and stale keys.
    fn children(&self, node: Self::Key) -> &[Self::Key];

    /// Position of the node's first character in the serialized text.
    fn start_offset(&self, node: Self::Key) -> usize;

    /// Length of the node's serialized text.
    fn text_len(&self, node: Self::Key) -> usize;

    /// Editable coordinate in document space, if the node declares one.
    fn coordinate(&self, node: Self::Key) -> Option<Point>;

    /// Name declared by the node, if any.
    fn name(&self, node: Self::Key) -> Option<&str>;

    /// Look up a referenceable node by name.
    fn find_by_name(&self, name: &str) -> Option<Self::Key>;

    /// The curve endpoint a control point is attached to.
    ///
    /// Returns `None` for nodes that are not control points or whose curve
    /// has no endpoint on that side.
    fn control_origin(&self, node: Self::Key) -> Option<Self::Key>;

    /// Exclusive end offset of the node's serialized text.
    fn end_offset(&self, node: Self::Key) -> usize {
        self.start_offset(node) + self.text_len(node)
    }

    /// Iterate the ancestors of `node`, nearest first, excluding `node`.
    ///
    /// Iteration stops early if the parent chain revisits a node.
    fn ancestors(&self, node: Self::Key) -> Ancestors<'_, Self>
    where
        Self: Sized,
    {
        Ancestors::new(self, node)
    }

    /// Whether `ancestor` is `node` or encloses it.
    fn is_ancestor_or_self(&self, ancestor: Self::Key, node: Self::Key) -> bool
    where
        Self: Sized,
    {
        ancestor == node || self.ancestors(node).any(|a| a == ancestor)
    }
}

/// Iterator over a node's parent chain, see [`Document::ancestors`].
pub struct Ancestors<'a, D: Document> {
    doc: &'a D,
    next: Option<D::Key>,
    seen: HashSet<D::Key>,
    cyclic: bool,
}

impl<'a, D: Document> Ancestors<'a, D> {
    fn new(doc: &'a D, node: D::Key) -> Self {
        let mut seen = HashSet::new();
        seen.insert(node);
        Self {
            doc,
            next: doc.parent(node),
            seen,
            cyclic: false,
        }
    }

    /// Whether iteration stopped because the parent chain loops.
    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }
}

impl<D: Document> Debug for Ancestors<'_, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ancestors")
            .field("next", &self.next)
            .field("visited", &self.seen.len())
            .field("cyclic", &self.cyclic)
            .finish_non_exhaustive()
    }
}

impl<D: Document> Iterator for Ancestors<'_, D> {
    type Item = D::Key;

    fn next(&mut self) -> Option<D::Key> {
        let current = self.next.take()?;
        if !self.seen.insert(current) {
            self.cyclic = true;
            return None;
        }
        self.next = self.doc.parent(current);
        Some(current)
    }
}
