use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::ids::{EMPTY_ROOT_ID, IdPolicy, SlugPathIds, VIRTUAL_ROOT_ID};
use crate::{ArborConfig, Result};

use super::OutlineNode;
use super::utils::{heading, split_lines};

/// Display names for the sentinel and placeholder nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutlineNames {
    pub placeholder_name: String,
    pub empty_name: String,
    pub untitled_name: String,
}

impl Default for OutlineNames {
    fn default() -> Self {
        Self {
            placeholder_name: "Start Typing...".to_string(),
            empty_name: "Empty".to_string(),
            untitled_name: "Untitled".to_string(),
        }
    }
}

/// Outline text -> [`OutlineNode`] tree.
///
/// Parsing never fails: blank input becomes a placeholder node, headings that skip levels
/// attach to the nearest shallower ancestor, and bare text nests under whatever is open.
#[derive(Clone)]
pub struct OutlineParser {
    names: OutlineNames,
    ids: Arc<dyn IdPolicy + Send + Sync>,
}

impl Default for OutlineParser {
    fn default() -> Self {
        Self {
            names: OutlineNames::default(),
            ids: Arc::new(SlugPathIds),
        }
    }
}

impl std::fmt::Debug for OutlineParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutlineParser")
            .field("names", &self.names)
            .finish_non_exhaustive()
    }
}

impl OutlineParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ArborConfig) -> Result<Self> {
        Ok(Self {
            names: config.section("outline")?,
            ..Self::default()
        })
    }

    pub fn with_names(mut self, names: OutlineNames) -> Self {
        self.names = names;
        self
    }

    pub fn with_id_policy(mut self, ids: Arc<dyn IdPolicy + Send + Sync>) -> Self {
        self.ids = ids;
        self
    }

    pub fn names(&self) -> &OutlineNames {
        &self.names
    }

    pub fn parse(&self, text: &str) -> OutlineNode {
        if text.trim().is_empty() {
            return OutlineNode::new(EMPTY_ROOT_ID, Some(0), self.names.placeholder_name.clone());
        }

        // Arena of (node, child indices); index 0 is the synthetic root.
        let mut arena: Vec<(OutlineNode, Vec<usize>)> = vec![(
            OutlineNode::new(VIRTUAL_ROOT_ID, None, "Virtual Root"),
            Vec::new(),
        )];
        let mut stack: Vec<(usize, usize)> = vec![(0, 0)];
        let mut used = FxHashSet::default();

        for (index, line) in split_lines(text).enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (level, name) = match heading(line) {
                Some((level, "")) => (level, self.names.untitled_name.as_str()),
                Some((level, text)) => (level, text),
                None => {
                    let open = stack.last().map_or(0, |(_, level)| *level);
                    (open + 1, trimmed)
                }
            };

            while stack.len() > 1 && stack.last().is_some_and(|(_, top)| *top >= level) {
                stack.pop();
            }
            let parent = stack.last().map_or(0, |(idx, _)| *idx);

            let id = self.ids.derive_id(name, &arena[parent].0.id, &mut used);
            let node_idx = arena.len();
            arena.push((OutlineNode::new(id, Some(index), name), Vec::new()));
            arena[parent].1.push(node_idx);
            stack.push((node_idx, level));
        }

        let mut root = assemble(&mut arena, 0);
        tracing::trace!(
            lines = text.lines().count(),
            nodes = root.node_count() - 1,
            "parsed outline"
        );

        match root.children.len() {
            0 => OutlineNode::new(EMPTY_ROOT_ID, Some(0), self.names.empty_name.clone()),
            1 => root.children.remove(0),
            _ => root,
        }
    }
}

fn assemble(arena: &mut [(OutlineNode, Vec<usize>)], idx: usize) -> OutlineNode {
    let child_ids = std::mem::take(&mut arena[idx].1);
    let mut node = std::mem::replace(&mut arena[idx].0, OutlineNode::new("", None, ""));
    node.children = child_ids
        .into_iter()
        .map(|child| assemble(arena, child))
        .collect();
    node
}

/// Parses with default names and the default id policy.
pub fn parse_outline(text: &str) -> OutlineNode {
    OutlineParser::default().parse(text)
}
