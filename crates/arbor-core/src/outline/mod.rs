mod parse;
mod utils;


pub use parse::{OutlineNames, OutlineParser, parse_outline};
pub use utils::{heading, heading_level, split_lines};

use serde::{Deserialize, Serialize};

/// One node of a parsed outline.
///
/// Trees are rebuilt from scratch on every text change and carry no persistent state; anything
/// that must survive a re-parse refers to nodes by [`OutlineNode::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub id: String,
    /// Index of the source line, `None` for the synthetic grouping root.
    pub line_index: Option<usize>,
    pub name: String,
    #[serde(default)]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(id: impl Into<String>, line_index: Option<usize>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            line_index,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(OutlineNode::node_count).sum::<usize>()
    }

    /// Pre-order traversal.
    pub fn descendants(&self) -> Vec<&OutlineNode> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn find(&self, id: &str) -> Option<&OutlineNode> {
        self.descendants().into_iter().find(|n| n.id == id)
    }

    /// Names and nesting only, for comparisons that should ignore ids and line numbers.
    pub fn shape(&self) -> OutlineShape {
        OutlineShape {
            name: self.name.clone(),
            children: self.children.iter().map(OutlineNode::shape).collect(),
        }
    }
}

/// The structural part of an [`OutlineNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineShape {
    pub name: String,
    pub children: Vec<OutlineShape>,
}
