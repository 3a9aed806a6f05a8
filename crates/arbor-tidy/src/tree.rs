use crate::{Error, Result};

pub type NodeIndex = usize;

/// Rooted, ordered tree stored as parent/children index lists.
///
/// Index `0` is the root; nodes are appended with [`Tree::add_child`], so a node's index is
/// always greater than its parent's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    parents: Vec<Option<NodeIndex>>,
    children: Vec<Vec<NodeIndex>>,
}

impl Tree {
    /// A tree holding only a root node.
    pub fn new() -> Self {
        Self {
            parents: vec![None],
            children: vec![Vec::new()],
        }
    }

    pub fn root(&self) -> NodeIndex {
        0
    }

    pub fn add_child(&mut self, parent: NodeIndex) -> Result<NodeIndex> {
        if parent >= self.len() {
            return Err(Error::UnknownNode { index: parent });
        }
        let index = self.len();
        self.parents.push(Some(parent));
        self.children.push(Vec::new());
        self.children[parent].push(index);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.parents.get(index).copied().flatten()
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn depth(&self, mut index: NodeIndex) -> usize {
        let mut depth = 0;
        while let Some(parent) = self.parent(index) {
            depth += 1;
            index = parent;
        }
        depth
    }

    /// Pre-order, children left to right.
    pub fn pre_order(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.len());
        if self.is_empty() {
            return out;
        }
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        out
    }

    /// Post-order, children left to right.
    pub fn post_order(&self) -> Vec<NodeIndex> {
        let mut out = self.pre_order_right_to_left();
        out.reverse();
        out
    }

    fn pre_order_right_to_left(&self) -> Vec<NodeIndex> {
        let mut out = Vec::with_capacity(self.len());
        if self.is_empty() {
            return out;
        }
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter());
        }
        out
    }
}
