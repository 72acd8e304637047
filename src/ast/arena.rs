use std::ops::Index;
use std::rc::Rc;

use crate::Span;

use super::node::{Node, NodeKind};

/// Index of a node inside an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Flat storage for AST nodes.
///
/// Nodes live in a growable table and reference their children by
/// [`NodeId`], so deeply nested programs never build deep chains of owning
/// pointers. Ids are only meaningful for the arena that issued them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn new() -> Self {
        Arena { nodes: vec![] }
    }

    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { kind, span });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Index<NodeId> for Arena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

/// A fully parsed source unit: the node arena plus the ordered top-level
/// statements. Immutable once parsing completes; dropping the program
/// frees the whole tree at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub arena: Arena,
    pub roots: Vec<NodeId>,
    pub file: Rc<String>,
}

impl Program {
    pub fn node(&self, id: NodeId) -> &Node {
        self.arena.get(id)
    }
}
