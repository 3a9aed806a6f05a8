use serde::{Deserialize, Serialize};

use crate::tree::{NodeIndex, Tree};

/// Spacing between adjacent nodes on the breadth axis, in `node_size.breadth` units.
pub trait Separation {
    fn separation(&self, tree: &Tree, a: NodeIndex, b: NodeIndex) -> f64;
}

impl<F> Separation for F
where
    F: Fn(&Tree, NodeIndex, NodeIndex) -> f64,
{
    fn separation(&self, tree: &Tree, a: NodeIndex, b: NodeIndex) -> f64 {
        self(tree, a, b)
    }
}

/// One factor for siblings, another for nodes with different parents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiblingSeparation {
    pub siblings: f64,
    pub cousins: f64,
}

impl Default for SiblingSeparation {
    fn default() -> Self {
        Self {
            siblings: 1.0,
            cousins: 2.0,
        }
    }
}

impl Separation for SiblingSeparation {
    fn separation(&self, tree: &Tree, a: NodeIndex, b: NodeIndex) -> f64 {
        if tree.parent(a) == tree.parent(b) {
            self.siblings
        } else {
            self.cousins
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSize {
    pub breadth: f64,
    pub depth: f64,
}

impl NodeSize {
    pub fn new(breadth: f64, depth: f64) -> Self {
        Self { breadth, depth }
    }
}

impl Default for NodeSize {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Positions indexed like the input [`Tree`]. `x` is the breadth axis, `y` the depth axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TidyLayout {
    pub positions: Vec<Point>,
}

/// Walker state. Index 0 is a synthetic parent of the tree root, node `i` of the input
/// tree lives at `i + 1`.
#[derive(Debug, Clone, Default)]
struct WalkNode {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Default ancestor, used by the parent while apportioning its children.
    default_ancestor: Option<usize>,
    ancestor: usize,
    prelim: f64,
    modifier: f64,
    change: f64,
    shift: f64,
    thread: Option<usize>,
    number: usize,
}

struct Walker<'a, S: ?Sized> {
    tree: &'a Tree,
    separation: &'a S,
    nodes: Vec<WalkNode>,
}

/// Lays out `tree` with a fixed node size. The root is placed at the origin.
pub fn layout<S>(tree: &Tree, node_size: NodeSize, separation: &S) -> TidyLayout
where
    S: Separation + ?Sized,
{
    if tree.is_empty() {
        return TidyLayout::default();
    }

    let mut walker = Walker::new(tree, separation);
    for node in tree.post_order() {
        walker.first_walk(node + 1);
    }
    let root = tree.root() + 1;
    walker.nodes[0].modifier = -walker.nodes[root].prelim;

    let mut positions = vec![Point::default(); tree.len()];
    let mut depths = vec![0usize; tree.len()];
    for node in tree.pre_order() {
        let x = walker.second_walk(node + 1);
        if let Some(parent) = tree.parent(node) {
            depths[node] = depths[parent] + 1;
        }
        positions[node] = Point {
            x: x * node_size.breadth,
            y: depths[node] as f64 * node_size.depth,
        };
    }
    TidyLayout { positions }
}

impl<'a, S> Walker<'a, S>
where
    S: Separation + ?Sized,
{
    fn new(tree: &'a Tree, separation: &'a S) -> Self {
        let mut nodes = vec![WalkNode::default(); tree.len() + 1];
        nodes[0].children = vec![tree.root() + 1];
        for index in 0..tree.len() {
            let w = index + 1;
            nodes[w].ancestor = w;
            nodes[w].parent = Some(tree.parent(index).map_or(0, |p| p + 1));
            nodes[w].children = tree.children(index).iter().map(|c| c + 1).collect();
            for (number, child) in tree.children(index).iter().enumerate() {
                nodes[child + 1].number = number;
            }
        }
        Self {
            tree,
            separation,
            nodes,
        }
    }

    fn separation(&self, a: usize, b: usize) -> f64 {
        self.separation.separation(self.tree, a - 1, b - 1)
    }

    fn next_left(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .first()
            .copied()
            .or(self.nodes[v].thread)
    }

    fn next_right(&self, v: usize) -> Option<usize> {
        self.nodes[v]
            .children
            .last()
            .copied()
            .or(self.nodes[v].thread)
    }

    fn left_sibling(&self, v: usize) -> Option<usize> {
        let parent = self.nodes[v].parent?;
        let number = self.nodes[v].number;
        (number > 0).then(|| self.nodes[parent].children[number - 1])
    }

    fn first_walk(&mut self, v: usize) {
        let Some(parent) = self.nodes[v].parent else {
            return;
        };
        let left = self.left_sibling(v);

        if let (Some(&first), Some(&last)) =
            (self.nodes[v].children.first(), self.nodes[v].children.last())
        {
            self.execute_shifts(v);
            let midpoint = (self.nodes[first].prelim + self.nodes[last].prelim) / 2.0;
            if let Some(w) = left {
                self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
                self.nodes[v].modifier = self.nodes[v].prelim - midpoint;
            } else {
                self.nodes[v].prelim = midpoint;
            }
        } else if let Some(w) = left {
            self.nodes[v].prelim = self.nodes[w].prelim + self.separation(v, w);
        }

        let default_ancestor = self.nodes[parent]
            .default_ancestor
            .unwrap_or(self.nodes[parent].children[0]);
        let ancestor = self.apportion(v, left, default_ancestor);
        self.nodes[parent].default_ancestor = Some(ancestor);
    }

    fn second_walk(&mut self, v: usize) -> f64 {
        let parent_modifier = self.nodes[v]
            .parent
            .map_or(0.0, |p| self.nodes[p].modifier);
        self.nodes[v].modifier += parent_modifier;
        self.nodes[v].prelim + parent_modifier
    }

    /// Pushes the subtree of `v` right until it clears the contour of its left siblings,
    /// threading the shorter side onto the longer one.
    fn apportion(&mut self, v: usize, left: Option<usize>, mut ancestor: usize) -> usize {
        let Some(w) = left else {
            return ancestor;
        };
        let Some(parent) = self.nodes[v].parent else {
            return ancestor;
        };

        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = self.nodes[parent].children[0];
        let mut sip = self.nodes[vip].modifier;
        let mut sop = self.nodes[vop].modifier;
        let mut sim = self.nodes[vim].modifier;
        let mut som = self.nodes[vom].modifier;

        let (next_vim, next_vip) = loop {
            let next_vim = self.next_right(vim);
            let next_vip = self.next_left(vip);
            let (Some(nvim), Some(nvip)) = (next_vim, next_vip) else {
                break (next_vim, next_vip);
            };
            vim = nvim;
            vip = nvip;
            if let Some(next) = self.next_left(vom) {
                vom = next;
            }
            if let Some(next) = self.next_right(vop) {
                vop = next;
            }
            self.nodes[vop].ancestor = v;

            let shift = self.nodes[vim].prelim + sim - self.nodes[vip].prelim - sip
                + self.separation(vim, vip);
            if shift > 0.0 {
                let from = self.next_ancestor(vim, v, ancestor);
                self.move_subtree(from, v, shift);
                sip += shift;
                sop += shift;
            }
            sim += self.nodes[vim].modifier;
            sip += self.nodes[vip].modifier;
            som += self.nodes[vom].modifier;
            sop += self.nodes[vop].modifier;
        };

        if let Some(vim) = next_vim.filter(|_| self.next_right(vop).is_none()) {
            self.nodes[vop].thread = Some(vim);
            self.nodes[vop].modifier += sim - sop;
        }
        if let Some(vip) = next_vip.filter(|_| self.next_left(vom).is_none()) {
            self.nodes[vom].thread = Some(vip);
            self.nodes[vom].modifier += sip - som;
            ancestor = v;
        }
        ancestor
    }

    fn next_ancestor(&self, vim: usize, v: usize, ancestor: usize) -> usize {
        let candidate = self.nodes[vim].ancestor;
        if self.nodes[candidate].parent == self.nodes[v].parent {
            candidate
        } else {
            ancestor
        }
    }

    fn move_subtree(&mut self, wm: usize, wp: usize, shift: f64) {
        let subtrees = self.nodes[wp].number as f64 - self.nodes[wm].number as f64;
        let change = shift / subtrees;
        self.nodes[wp].change -= change;
        self.nodes[wp].shift += shift;
        self.nodes[wm].change += change;
        self.nodes[wp].prelim += shift;
        self.nodes[wp].modifier += shift;
    }

    /// Applies the shifts accumulated by `move_subtree` to the children of `v`.
    fn execute_shifts(&mut self, v: usize) {
        let mut shift = 0.0;
        let mut change = 0.0;
        for i in (0..self.nodes[v].children.len()).rev() {
            let w = self.nodes[v].children[i];
            let node = &mut self.nodes[w];
            node.prelim += shift;
            node.modifier += shift;
            change += node.change;
            shift += node.shift + change;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: NodeSize = NodeSize {
        breadth: 80.0,
        depth: 260.0,
    };

    #[test]
    fn single_node_sits_at_origin() {
        let tree = Tree::new();
        let out = layout(&tree, SIZE, &SiblingSeparation::default());
        assert_eq!(out.positions, vec![Point { x: 0.0, y: 0.0 }]);
    }

    #[test]
    fn two_leaves_are_centered_under_the_root() {
        let mut tree = Tree::new();
        let a = tree.add_child(0).unwrap();
        let b = tree.add_child(0).unwrap();
        let sep = SiblingSeparation {
            siblings: 1.1,
            cousins: 1.3,
        };
        let out = layout(&tree, SIZE, &sep);
        let (pa, pb) = (out.positions[a], out.positions[b]);
        assert!((pa.x + 44.0).abs() < 1e-9);
        assert!((pb.x - 44.0).abs() < 1e-9);
        assert_eq!(pa.y, 260.0);
        assert_eq!(out.positions[0], Point { x: 0.0, y: 0.0 });
    }

    #[test]
    fn closures_work_as_separation() {
        let mut tree = Tree::new();
        let a = tree.add_child(0).unwrap();
        let b = tree.add_child(0).unwrap();
        let out = layout(&tree, NodeSize::default(), &|_: &Tree, _, _| 3.0);
        assert!((out.positions[b].x - out.positions[a].x - 3.0).abs() < 1e-9);
    }
}
