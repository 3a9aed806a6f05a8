//! Declarative enter / update / exit patches between two frames.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::model::{Frame, LayoutLink, Point};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeChange {
    pub id: String,
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkEnds {
    pub source: Point,
    pub target: Point,
}

impl LinkEnds {
    /// Both ends on one point: a link with no length.
    pub fn collapsed_at(p: Point) -> Self {
        Self {
            source: p,
            target: p,
        }
    }
}

/// A link keyed by its target node id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkChange {
    pub id: String,
    pub from: LinkEnds,
    pub to: LinkEnds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch<T> {
    pub enter: Vec<T>,
    pub update: Vec<T>,
    pub exit: Vec<T>,
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self {
            enter: Vec::new(),
            update: Vec::new(),
            exit: Vec::new(),
        }
    }
}

impl<T> Patch<T> {
    pub fn is_empty(&self) -> bool {
        self.enter.is_empty() && self.update.is_empty() && self.exit.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenePatch {
    pub nodes: Patch<NodeChange>,
    pub links: Patch<LinkChange>,
}

/// Where an element leaving the scene should go: the new position of its closest old ancestor
/// that is still visible, or the origin.
pub fn exit_target(previous: &Frame, next: &Frame, id: &str) -> Point {
    let mut cur = previous.node(id).and_then(|n| n.parent.as_deref());
    while let Some(ancestor) = cur {
        if let Some(node) = next.node(ancestor).filter(|n| n.visible) {
            return node.position();
        }
        cur = previous.node(ancestor).and_then(|n| n.parent.as_deref());
    }
    Point::ORIGIN
}

/// Diffs the visible elements of `next` against `previous`.
///
/// `next` must already carry its start positions (`x0`/`y0`); entering elements animate from
/// there. Updated elements animate from where `previous` left them.
pub fn diff_frames(previous: Option<&Frame>, next: &Frame) -> ScenePatch {
    let mut patch = ScenePatch::default();

    for node in next.visible_nodes() {
        match previous.and_then(|p| p.node(&node.id)).filter(|n| n.visible) {
            Some(old) => patch.nodes.update.push(NodeChange {
                id: node.id.clone(),
                from: old.position(),
                to: node.position(),
            }),
            None => patch.nodes.enter.push(NodeChange {
                id: node.id.clone(),
                from: node.start_position(),
                to: node.position(),
            }),
        }
    }

    let position = |frame: &Frame, id: &str| frame.node(id).map_or(Point::ORIGIN, |n| n.position());
    let old_links: FxHashMap<&str, &LayoutLink> = previous
        .map(|p| p.links.iter().map(|l| (l.id.as_str(), l)).collect())
        .unwrap_or_default();
    for link in &next.links {
        let to = LinkEnds {
            source: position(next, &link.source),
            target: position(next, &link.target),
        };
        match (previous, old_links.get(link.id.as_str())) {
            (Some(prev), Some(old)) => patch.links.update.push(LinkChange {
                id: link.id.clone(),
                from: LinkEnds {
                    source: position(prev, &old.source),
                    target: position(prev, &old.target),
                },
                to,
            }),
            _ => {
                let start = next
                    .node(&link.target)
                    .map_or(Point::ORIGIN, |n| n.start_position());
                patch.links.enter.push(LinkChange {
                    id: link.id.clone(),
                    from: LinkEnds::collapsed_at(start),
                    to,
                });
            }
        }
    }

    let Some(previous) = previous else {
        return patch;
    };

    for old in previous.visible_nodes() {
        if next.is_visible(&old.id) {
            continue;
        }
        patch.nodes.exit.push(NodeChange {
            id: old.id.clone(),
            from: old.position(),
            to: exit_target(previous, next, &old.id),
        });
    }

    let next_links: FxHashSet<&str> = next.links.iter().map(|l| l.id.as_str()).collect();
    for old in &previous.links {
        if next_links.contains(old.id.as_str()) {
            continue;
        }
        patch.links.exit.push(LinkChange {
            id: old.id.clone(),
            from: LinkEnds {
                source: position(previous, &old.source),
                target: position(previous, &old.target),
            },
            to: LinkEnds::collapsed_at(exit_target(previous, next, &old.target)),
        });
    }

    patch
}
