use serde::{Deserialize, Serialize};

use crate::model::{Bounds, Frame, LabelAnchor, LabelLayout, LayoutLink, LayoutNode, Point};
use crate::settings::ThemeSettings;
use crate::text::LINE_HEIGHT_EM;

/// Opacity of link strokes at rest.
pub const LINK_OPACITY: f64 = 0.3;
/// Height the pin marker rises above the node center.
pub const PIN_MARKER_RISE: f64 = 24.0;

/// A node as drawn at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    pub radius: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
    pub text_color: String,
    pub label: LabelLayout,
    pub has_children: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneLink {
    pub id: String,
    pub source: Point,
    pub target: Point,
    pub width: f64,
    pub color: String,
    pub opacity: f64,
}

/// A drawable snapshot: final layout positions, or interpolated ones mid-animation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub links: Vec<SceneLink>,
}

impl SceneNode {
    pub fn from_layout(
        node: &LayoutNode,
        position: Point,
        opacity: f64,
        theme: &ThemeSettings,
        pinned: bool,
    ) -> Self {
        // Collapsed nodes are drawn hollow, ringed in their branch color.
        let (fill, stroke, stroke_width) = if node.collapsed() {
            (theme.collapsed_fill.clone(), node.color.clone(), 3.0)
        } else {
            (node.color.clone(), theme.collapsed_fill.clone(), 2.0)
        };
        Self {
            id: node.id.clone(),
            x: position.x,
            y: position.y,
            opacity,
            radius: node.radius,
            fill,
            stroke,
            stroke_width,
            text_color: theme.text_color.clone(),
            label: node.label.clone(),
            has_children: node.has_children(),
            pinned,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Circle, label box and pin marker.
    pub fn bounds(&self) -> Bounds {
        let r = self.radius;
        let label_height = self.label.lines.len().max(1) as f64 * self.label.font_size * LINE_HEIGHT_EM;
        let label_x = self.x + self.label.offset_x;
        let (label_min_x, label_max_x) = match self.label.anchor {
            LabelAnchor::Start => (label_x, label_x + self.label.width),
            LabelAnchor::End => (label_x - self.label.width, label_x),
        };
        let top = if self.pinned {
            self.y - PIN_MARKER_RISE
        } else {
            self.y - r
        };
        Bounds {
            min_x: (self.x - r).min(label_min_x),
            min_y: top.min(self.y - label_height / 2.0),
            max_x: (self.x + r).max(label_max_x),
            max_y: (self.y + r).max(self.y + label_height / 2.0),
        }
    }
}

impl SceneLink {
    pub fn from_layout(link: &LayoutLink, source: Point, target: Point, opacity: f64) -> Self {
        Self {
            id: link.id.clone(),
            source,
            target,
            width: link.width,
            color: link.color.clone(),
            opacity,
        }
    }
}

impl Scene {
    /// The resting scene of `frame`: visible nodes at their final positions.
    pub fn from_frame(frame: &Frame, theme: &ThemeSettings, is_pinned: impl Fn(&str) -> bool) -> Self {
        let nodes = frame
            .visible_nodes()
            .map(|n| SceneNode::from_layout(n, n.position(), 1.0, theme, is_pinned(&n.id)))
            .collect();
        let links = frame
            .links
            .iter()
            .filter_map(|l| {
                let source = frame.node(&l.source)?.position();
                let target = frame.node(&l.target)?.position();
                Some(SceneLink::from_layout(l, source, target, LINK_OPACITY))
            })
            .collect();
        Self { nodes, links }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Union of node bounds; links never reach outside their endpoints.
    pub fn bounds(&self) -> Option<Bounds> {
        let boxes: Vec<Bounds> = self.nodes.iter().map(SceneNode::bounds).collect();
        Bounds::from_points(
            boxes
                .iter()
                .flat_map(|b| [(b.min_x, b.min_y), (b.max_x, b.max_y)]),
        )
    }
}
