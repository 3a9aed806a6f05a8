//! Pointer gestures and the context menu model.

use arbor_core::{ArborConfig, EditAction, EditRequest};
use arbor_render::Camera;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InteractionSettings {
    /// Cumulative pointer travel, in diagram units, before a press becomes a drag.
    pub drag_threshold: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            drag_threshold: 4.0,
        }
    }
}

impl InteractionSettings {
    pub fn from_config(config: &ArborConfig) -> arbor_core::Result<Self> {
        config.section("interaction")
    }
}

/// What a press landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressTarget {
    Node(String),
    Canvas,
}

/// One press-move-release sequence.
///
/// Movement is accumulated until the travelled distance exceeds the threshold; the held-back
/// delta is released in one step at that moment so the total displacement matches the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    target: PressTarget,
    travelled: f64,
    pending: (f64, f64),
    dragging: bool,
}

impl Gesture {
    pub fn new(target: PressTarget) -> Self {
        Self {
            target,
            travelled: 0.0,
            pending: (0.0, 0.0),
            dragging: false,
        }
    }

    pub fn target(&self) -> &PressTarget {
        &self.target
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn travelled(&self) -> f64 {
        self.travelled
    }

    /// Records a pointer movement and returns the delta to apply now, if any.
    pub fn moved(&mut self, dx: f64, dy: f64, threshold: f64) -> Option<(f64, f64)> {
        self.travelled += dx.hypot(dy);
        if self.dragging {
            return Some((dx, dy));
        }
        self.pending.0 += dx;
        self.pending.1 += dy;
        if self.travelled > threshold {
            self.dragging = true;
            return Some(std::mem::take(&mut self.pending));
        }
        None
    }
}

/// How a released gesture resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// Released under the threshold on a node; `toggled` is the new collapse state, or `None`
    /// for a leaf.
    Click {
        node_id: String,
        toggled: Option<bool>,
    },
    Drag {
        node_id: String,
    },
    Pan,
    /// A canvas press that never moved, or a release with no press.
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuTarget {
    pub node_id: String,
    /// `None` for the synthetic root, which has no source line.
    pub line_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MenuItem {
    Rename,
    AddChild,
    Delete,
    Collapse,
    Expand,
    AddPin,
    RemovePin,
    ZoomIn,
    ZoomOut,
    Recenter,
}

impl MenuItem {
    pub const VIEW: [MenuItem; 3] = [MenuItem::ZoomIn, MenuItem::ZoomOut, MenuItem::Recenter];

    pub fn label(self) -> &'static str {
        match self {
            Self::Rename => "Rename",
            Self::AddChild => "Add Child",
            Self::Delete => "Delete",
            Self::Collapse => "Collapse",
            Self::Expand => "Expand",
            Self::AddPin => "Add Pin",
            Self::RemovePin => "Remove Pin",
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
            Self::Recenter => "Recenter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMenu {
    pub target: Option<MenuTarget>,
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    pub fn canvas() -> Self {
        Self {
            target: None,
            items: MenuItem::VIEW.to_vec(),
        }
    }

    pub fn contains(&self, item: MenuItem) -> bool {
        self.items.contains(&item)
    }
}

/// The result of picking a menu item.
///
/// Structural items never touch the outline: they either ask the host for text first or hand
/// back an [`EditRequest`] for the text owner to apply.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuOutcome {
    NeedsText {
        action: EditAction,
        line_index: usize,
        suggested: String,
    },
    Edit(EditRequest),
    Toggled {
        node_id: String,
        collapsed: bool,
    },
    NeedsPinLabel {
        node_id: String,
    },
    PinsRemoved {
        node_id: String,
        count: usize,
    },
    Camera(Camera),
    /// The item was not offered by the menu.
    Ignored,
}
