// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reference parse tree: structure, edits, change queue, offsets.

use alloc::string::String;
use alloc::vec::Vec;
use kurbo::Point;

use crate::document::{Document, DocumentChange, DocumentId, NodeKind};
use crate::types::{Item, NodeId};

/// Errors returned by [`ParseTree`] edits.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// The identifier does not refer to a live node.
    #[error("node {0:?} is not live in this document")]
    StaleNode(NodeId),
    /// Children were inserted into a leaf.
    #[error("node {0:?} cannot hold children")]
    NotAContainer(NodeId),
    /// Insertion index past the end of the child list.
    #[error("child index {index} is out of bounds for a node with {len} children")]
    IndexOutOfBounds {
        /// Requested index.
        index: usize,
        /// Number of children the parent has.
        len: usize,
    },
    /// The root node was passed to [`ParseTree::remove`].
    #[error("the document root cannot be removed")]
    RootRemoval,
}

/// A mutable document tree.
///
/// Every edit queues a [`DocumentChange`]; hosts forward the drained queue
/// (see [`ParseTree::take_changes`]) to whatever derives state from the tree.
///
/// Offsets are derived from serialization: a node's text is its `open` text,
/// followed by its children, followed by its `close` text.
///
/// ## Example
///
/// ```rust
/// use kurbo::Point;
/// use sketchbox_doc::{Document, DocumentChange, Item, ParseTree};
///
/// let mut tree = ParseTree::new(Item::container("", ""));
/// let root = tree.root_id();
/// let draw = tree.append(root, Item::container("\\draw ", ";")).unwrap();
/// let a = tree
///     .append(draw, Item::coordinate("(0,0)", Some(Point::ZERO)))
///     .unwrap();
///
/// assert_eq!(tree.serialize(), "\\draw (0,0);");
/// assert_eq!(tree.start_offset(a), 6);
/// assert_eq!(
///     tree.take_changes(),
///     [DocumentChange::Inserted(draw), DocumentChange::Inserted(a)]
/// );
/// ```
pub struct ParseTree {
    id: DocumentId,
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
    pending: Vec<DocumentChange<NodeId>>,
}

impl core::fmt::Debug for ParseTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("ParseTree")
            .field("id", &self.id)
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    item: Item,
}

impl ParseTree {
    /// Create a tree holding only `root`.
    ///
    /// Creating the root does not queue a change; hosts bind the whole tree
    /// instead.
    pub fn new(root: Item) -> Self {
        let root_id = NodeId::new(0, 1);
        Self {
            id: DocumentId::next(),
            nodes: alloc::vec![Some(Node {
                generation: 1,
                parent: None,
                children: Vec::new(),
                item: root,
            })],
            generations: alloc::vec![1],
            free_list: Vec::new(),
            root: root_id,
            pending: Vec::new(),
        }
    }

    /// The root node.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.slot(id).is_some()
    }

    /// Payload of a live node.
    pub fn item(&self, id: NodeId) -> Option<&Item> {
        self.slot(id).map(|n| &n.item)
    }

    /// Append `item` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, item: Item) -> Result<NodeId, TreeError> {
        let len = self
            .slot(parent)
            .ok_or(TreeError::StaleNode(parent))?
            .children
            .len();
        self.insert(parent, len, item)
    }

    /// Insert `item` as the child of `parent` at `index`.
    pub fn insert(
        &mut self,
        parent: NodeId,
        index: usize,
        item: Item,
    ) -> Result<NodeId, TreeError> {
        let p = self.slot(parent).ok_or(TreeError::StaleNode(parent))?;
        if !p.item.kind.is_container() {
            return Err(TreeError::NotAContainer(parent));
        }
        if index > p.children.len() {
            return Err(TreeError::IndexOutOfBounds {
                index,
                len: p.children.len(),
            });
        }

        let node = Node {
            generation: 0,
            parent: Some(parent),
            children: Vec::new(),
            item,
        };
        let id = self.alloc(node);
        if let Some(p) = self.slot_mut(parent) {
            p.children.insert(index, id);
        }
        tracing::trace!(?id, ?parent, index, "inserted parse tree node");
        self.pending.push(DocumentChange::Inserted(id));
        Ok(id)
    }

    /// Remove a node and its subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        let parent = self.slot(id).ok_or(TreeError::StaleNode(id))?.parent;
        if let Some(p) = parent.and_then(|p| self.slot_mut(p)) {
            p.children.retain(|c| *c != id);
        }
        self.free_subtree(id);
        tracing::trace!(?id, "removed parse tree node");
        self.pending.push(DocumentChange::Removed(id));
        Ok(())
    }

    /// Replace the `open` text of a node.
    pub fn set_text(&mut self, id: NodeId, open: impl Into<String>) -> Result<(), TreeError> {
        let n = self.slot_mut(id).ok_or(TreeError::StaleNode(id))?;
        n.item.open = open.into();
        self.pending.push(DocumentChange::TextChanged(id));
        Ok(())
    }

    /// Replace the text and editable coordinate of a node.
    pub fn set_coordinate(
        &mut self,
        id: NodeId,
        text: impl Into<String>,
        coordinate: Option<Point>,
    ) -> Result<(), TreeError> {
        let n = self.slot_mut(id).ok_or(TreeError::StaleNode(id))?;
        n.item.open = text.into();
        n.item.coordinate = coordinate;
        self.pending.push(DocumentChange::TextChanged(id));
        Ok(())
    }

    /// Drain the queued change messages, oldest first.
    pub fn take_changes(&mut self) -> Vec<DocumentChange<NodeId>> {
        core::mem::take(&mut self.pending)
    }

    /// Render the full document text.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        self.serialize_into(self.root, &mut out);
        out
    }

    fn serialize_into(&self, id: NodeId, out: &mut String) {
        let Some(n) = self.slot(id) else {
            return;
        };
        out.push_str(&n.item.open);
        for &child in &n.children {
            self.serialize_into(child, out);
        }
        out.push_str(&n.item.close);
    }

    fn slot(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn alloc(&mut self, mut node: Node) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            node.generation = generation;
            self.nodes[idx] = Some(node);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new(idx as u32, generation)
        } else {
            node.generation = 1;
            self.nodes.push(Some(node));
            self.generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            NodeId::new((self.nodes.len() - 1) as u32, 1)
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = alloc::vec![id];
        while let Some(id) = stack.pop() {
            if let Some(n) = self.nodes.get_mut(id.idx()).and_then(Option::take) {
                stack.extend(n.children);
                self.free_list.push(id.idx());
            }
        }
    }

    fn subtree_len(&self, id: NodeId) -> usize {
        self.slot(id).map_or(0, |n| {
            let children: usize = n.children.iter().map(|&c| self.subtree_len(c)).sum();
            n.item.own_len() + children
        })
    }

    fn nearest_coordinate<'a>(
        &self,
        mut siblings: impl Iterator<Item = &'a NodeId>,
    ) -> Option<NodeId> {
        siblings
            .find(|&&s| self.slot(s).is_some_and(|n| n.item.kind == NodeKind::Coordinate))
            .copied()
    }
}

impl Document for ParseTree {
    type Key = NodeId;

    fn id(&self) -> DocumentId {
        self.id
    }

    fn root(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.slot(node).map(|n| n.item.kind)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.slot(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.slot(node).map_or(&[], |n| &n.children)
    }

    fn start_offset(&self, node: NodeId) -> usize {
        let mut offset = 0;
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            let Some(p) = self.slot(parent) else {
                break;
            };
            offset += p.item.open.len();
            offset += p
                .children
                .iter()
                .take_while(|&&c| c != current)
                .map(|&c| self.subtree_len(c))
                .sum::<usize>();
            current = parent;
        }
        offset
    }

    fn text_len(&self, node: NodeId) -> usize {
        self.subtree_len(node)
    }

    fn coordinate(&self, node: NodeId) -> Option<Point> {
        self.slot(node).and_then(|n| n.item.coordinate)
    }

    fn name(&self, node: NodeId) -> Option<&str> {
        self.slot(node).and_then(|n| n.item.name.as_deref())
    }

    fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut stack = alloc::vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(n) = self.slot(id) else {
                continue;
            };
            if n.item.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(n.children.iter().rev());
        }
        None
    }

    fn control_origin(&self, node: NodeId) -> Option<NodeId> {
        let controls = self.parent(node)?;
        let c = self.slot(controls)?;
        if c.item.kind != NodeKind::Controls {
            return None;
        }
        let index = c.children.iter().position(|&ch| ch == node)?;
        let siblings = self.children(self.parent(controls)?);
        let pos = siblings.iter().position(|&s| s == controls)?;
        if index == 0 {
            // First control point leaves the curve's start.
            self.nearest_coordinate(siblings[..pos].iter().rev())
        } else {
            self.nearest_coordinate(siblings[pos + 1..].iter())
        }
    }
}
