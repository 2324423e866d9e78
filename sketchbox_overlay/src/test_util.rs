// Copyright 2025 the Sketchbox Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hand-written documents for shapes `ParseTree` refuses to produce.

use alloc::vec::Vec;
use kurbo::Point;
use sketchbox_doc::{Document, DocumentId, NodeKind};

/// Adjacency-list document. Node `0` is the root; every `Coordinate` sits at
/// `(index, 0)`. Children may repeat or loop.
pub(crate) struct Graph {
    id: DocumentId,
    nodes: Vec<(NodeKind, Vec<usize>)>,
}

impl Graph {
    pub(crate) fn new(nodes: Vec<(NodeKind, Vec<usize>)>) -> Self {
        Self {
            id: DocumentId::next(),
            nodes,
        }
    }
}

impl Document for Graph {
    type Key = usize;

    fn id(&self) -> DocumentId {
        self.id
    }

    fn root(&self) -> Option<usize> {
        (!self.nodes.is_empty()).then_some(0)
    }

    fn kind(&self, node: usize) -> Option<NodeKind> {
        self.nodes.get(node).map(|n| n.0)
    }

    fn parent(&self, node: usize) -> Option<usize> {
        self.nodes.iter().position(|n| n.1.contains(&node))
    }

    fn children(&self, node: usize) -> &[usize] {
        self.nodes.get(node).map_or(&[], |n| &n.1)
    }

    fn start_offset(&self, node: usize) -> usize {
        node
    }

    fn text_len(&self, _node: usize) -> usize {
        1
    }

    fn coordinate(&self, node: usize) -> Option<Point> {
        (self.kind(node) == Some(NodeKind::Coordinate)).then(|| Point::new(node as f64, 0.0))
    }

    fn name(&self, _node: usize) -> Option<&str> {
        None
    }

    fn find_by_name(&self, _name: &str) -> Option<usize> {
        None
    }

    fn control_origin(&self, _node: usize) -> Option<usize> {
        None
    }
}
