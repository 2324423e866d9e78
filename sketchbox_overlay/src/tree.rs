// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display tree storage: slots, top-level order, key index, traversal.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::build::BuiltShape;
use crate::shape::{Shape, ShapeId};

/// The display tree: an ordered list of top-level shapes, scopes owning their
/// children, and an index from document key to shape.
///
/// Shapes live in generational slots. Dropping the tree's contents with
/// [`DisplayTree::clear`] makes every previously handed-out [`ShapeId`] stale.
///
/// Most callers reach the tree through [`Overlay`](crate::Overlay). It can be
/// driven directly with [`build`](crate::build()), [`DisplayTree::attach`] and
/// [`bind`](crate::bind()) when no document notifications are involved.
pub struct DisplayTree<K> {
    /// slots
    nodes: Vec<Option<Shape<K>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    top_level: Vec<ShapeId>,
    index: HashMap<K, ShapeId>,
}

impl<K> Debug for DisplayTree<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DisplayTree")
            .field("nodes_total", &self.nodes.len())
            .field("nodes_alive", &self.index.len())
            .field("free_list", &self.free_list.len())
            .field("top_level", &self.top_level.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug> Default for DisplayTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash + Debug> DisplayTree<K> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            top_level: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Number of live shapes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the tree holds no shapes.
    pub fn is_empty(&self) -> bool {
        self.top_level.is_empty()
    }

    /// Top-level shapes, in document order.
    pub fn top_level(&self) -> &[ShapeId] {
        &self.top_level
    }

    /// Returns true if `id` refers to a live shape.
    pub fn is_alive(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Access a live shape.
    pub fn get(&self, id: ShapeId) -> Option<&Shape<K>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape<K>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// The shape visualizing the document node `key`, if any.
    pub fn shape_for(&self, key: K) -> Option<ShapeId> {
        self.index.get(&key).copied()
    }

    /// Returns the parent of a shape if live, or `None` for top-level shapes and stale ids.
    pub fn parent_of(&self, id: ShapeId) -> Option<ShapeId> {
        self.get(id).and_then(|s| s.parent)
    }

    /// Get the children of a shape, or an empty slice if the shape is stale.
    pub fn children_of(&self, id: ShapeId) -> &[ShapeId] {
        self.get(id).map_or(&[], |s| &s.children)
    }

    /// Path from the top level down to `id` (inclusive); empty for stale ids.
    pub fn path_to(&self, id: ShapeId) -> Vec<ShapeId> {
        let mut path = Vec::new();
        if !self.is_alive(id) {
            return path;
        }
        let mut current = Some(id);
        while let Some(c) = current {
            path.push(c);
            current = self.parent_of(c);
        }
        path.reverse();
        path
    }

    /// Iterate every shape in pre-order: top-level shapes in order, each
    /// followed by its descendants.
    pub fn all_items(&self) -> AllItems<'_, K> {
        AllItems {
            tree: self,
            stack: self.top_level.iter().rev().copied().collect(),
        }
    }

    /// Get the next shape in depth-first traversal order.
    ///
    /// Returns `None` if no next shape exists or if the current shape is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn next_depth_first(&self, current: ShapeId) -> Option<ShapeId> {
        if let Some(&first_child) = self.get(current)?.children.first() {
            return Some(first_child);
        }

        let mut node = current;
        loop {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = self.parent_of(node)?;
        }
    }

    /// Get the previous shape in reverse depth-first traversal order.
    ///
    /// Returns `None` if no previous shape exists or if the current shape is stale.
    /// This is a standard tree traversal that does not wrap around.
    pub fn prev_depth_first(&self, current: ShapeId) -> Option<ShapeId> {
        if !self.is_alive(current) {
            return None;
        }
        if let Some(prev_sibling) = self.prev_sibling(current) {
            return Some(self.last_in_subtree(prev_sibling));
        }
        self.parent_of(current)
    }

    /// Attach built shapes as the last children of `parent` (or at top level
    /// if `None`) and return every new id in pre-order.
    ///
    /// `parent` must be a live scope; otherwise nothing is attached.
    pub fn attach(&mut self, parent: Option<ShapeId>, built: Vec<BuiltShape<K>>) -> Vec<ShapeId> {
        let mut added = Vec::new();
        if let Some(p) = parent
            && !self.get(p).is_some_and(Shape::is_scope)
        {
            tracing::warn!(?p, "refusing to attach shapes below a stale or non-scope shape");
            return added;
        }
        for b in built {
            self.attach_one(parent, b, &mut added);
        }
        added
    }

    /// Drop every shape.
    pub fn clear(&mut self) {
        for (idx, slot) in self.nodes.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.top_level.clear();
        self.index.clear();
    }

    fn attach_one(
        &mut self,
        parent: Option<ShapeId>,
        built: BuiltShape<K>,
        added: &mut Vec<ShapeId>,
    ) {
        let BuiltShape {
            kind,
            doc,
            position,
            bounds,
            tooltip,
            children,
        } = built;
        let id = self.alloc(Shape {
            generation: 0,
            kind,
            doc,
            position,
            bounds,
            tooltip,
            parent,
            children: Vec::with_capacity(children.len()),
        });
        if let Some(previous) = self.index.insert(doc, id) {
            tracing::warn!(?doc, ?previous, "document node is displayed twice");
        }
        match parent.and_then(|p| self.get_mut(p)) {
            Some(p) => p.children.push(id),
            None => self.top_level.push(id),
        }
        added.push(id);
        for child in children {
            self.attach_one(Some(id), child, added);
        }
    }

    fn alloc(&mut self, mut shape: Shape<K>) -> ShapeId {
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            shape.generation = generation;
            self.nodes[idx] = Some(shape);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ShapeId uses 32-bit indices by design."
            )]
            ShapeId::new(idx as u32, generation)
        } else {
            shape.generation = 1;
            self.nodes.push(Some(shape));
            self.generations.push(1);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "ShapeId uses 32-bit indices by design."
            )]
            ShapeId::new((self.nodes.len() - 1) as u32, 1)
        }
    }

    fn siblings(&self, id: ShapeId) -> &[ShapeId] {
        match self.parent_of(id) {
            Some(parent) => self.children_of(parent),
            None => &self.top_level,
        }
    }

    fn next_sibling(&self, id: ShapeId) -> Option<ShapeId> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings.get(pos + 1).copied()
    }

    fn prev_sibling(&self, id: ShapeId) -> Option<ShapeId> {
        let siblings = self.siblings(id);
        let pos = siblings.iter().position(|&s| s == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    fn last_in_subtree(&self, mut id: ShapeId) -> ShapeId {
        while let Some(&last) = self.children_of(id).last() {
            id = last;
        }
        id
    }
}

/// Pre-order iterator over a [`DisplayTree`], see [`DisplayTree::all_items`].
pub struct AllItems<'a, K> {
    tree: &'a DisplayTree<K>,
    stack: Vec<ShapeId>,
}

impl<K> Debug for AllItems<'_, K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AllItems")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash + Debug> Iterator for AllItems<'_, K> {
    type Item = ShapeId;

    fn next(&mut self) -> Option<ShapeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children_of(id).iter().rev().copied());
        Some(id)
    }
}
