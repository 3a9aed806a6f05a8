use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A position in diagram space. `x` grows to the right, `y` downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut it = points.into_iter();
        let (x0, y0) = it.next()?;
        let mut b = Self {
            min_x: x0,
            min_y: y0,
            max_x: x0,
            max_y: y0,
        };
        for (x, y) in it {
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        Some(b)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn padded(&self, padding: f64) -> Self {
        Self {
            min_x: self.min_x - padding,
            min_y: self.min_y - padding,
            max_x: self.max_x + padding,
            max_y: self.max_y + padding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAnchor {
    Start,
    End,
}

impl LabelAnchor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// Label placement relative to the node center, with lines already wrapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelLayout {
    pub anchor: LabelAnchor,
    pub offset_x: f64,
    pub font_size: f64,
    pub font_weight: u16,
    pub lines: Vec<String>,
    /// Widest line, as measured when wrapping.
    pub width: f64,
}

/// One outline node placed in diagram space.
///
/// `children` lists the visible children; when the node is collapsed they are moved to
/// `collapsed_children` and `children` is empty. Nodes under a collapsed ancestor are kept in
/// the frame with `visible == false`. They sit at their drag override when they have one;
/// otherwise reconciliation leaves them where they were last drawn, and a node that was never
/// drawn sits on its parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    pub line_index: Option<usize>,
    pub name: String,
    pub depth: usize,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub collapsed_children: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub x0: f64,
    pub y0: f64,
    pub visible: bool,
    pub color: String,
    pub radius: f64,
    pub link_width: f64,
    pub label: LabelLayout,
}

impl LayoutNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn start_position(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn collapsed(&self) -> bool {
        !self.collapsed_children.is_empty()
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty() || !self.collapsed_children.is_empty()
    }

    /// Visible and collapsed children, in outline order.
    pub fn all_children(&self) -> impl Iterator<Item = &String> {
        self.children.iter().chain(self.collapsed_children.iter())
    }
}

/// A visible parent -> child edge, keyed by the child id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutLink {
    pub id: String,
    pub source: String,
    pub target: String,
    pub width: f64,
    pub color: String,
}

/// The positioned result of one layout pass, keyed by node id in pre-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub root_id: String,
    pub nodes: IndexMap<String, LayoutNode>,
    pub links: Vec<LayoutLink>,
}

impl Frame {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut LayoutNode> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<&LayoutNode> {
        self.nodes.get(&self.root_id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &LayoutNode> {
        self.nodes.values().filter(|n| n.visible)
    }

    /// `id` itself when visible, otherwise its nearest visible ancestor.
    pub fn visible_ancestor(&self, id: &str) -> Option<&LayoutNode> {
        let mut cur = self.nodes.get(id)?;
        while !cur.visible {
            cur = self.nodes.get(cur.parent.as_deref()?)?;
        }
        Some(cur)
    }

    /// `id` and every node below it, visible or not, in pre-order.
    pub fn subtree_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes.get(&cur) else {
                continue;
            };
            let children: Vec<&String> = node.all_children().collect();
            stack.extend(children.into_iter().rev().cloned());
            out.push(cur);
        }
        out
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.visible_nodes().map(|n| (n.x, n.y)))
    }
}
