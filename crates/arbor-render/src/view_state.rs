use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::model::Point;

/// Per-document view state that survives re-parses. Everything is keyed by node id.
///
/// Entries for ids that are not in the current outline are kept and ignored; they apply again
/// if the id reappears.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewState {
    pub position_overrides: IndexMap<String, Point>,
    pub collapsed_ids: IndexSet<String>,
    pub camera: Camera,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed_ids.contains(id)
    }

    pub fn set_collapsed(&mut self, id: &str, collapsed: bool) {
        if collapsed {
            self.collapsed_ids.insert(id.to_string());
        } else {
            self.collapsed_ids.shift_remove(id);
        }
    }

    /// Flips the collapse flag of `id` and returns the new state.
    pub fn toggle_collapsed(&mut self, id: &str) -> bool {
        let collapsed = !self.is_collapsed(id);
        self.set_collapsed(id, collapsed);
        collapsed
    }

    pub fn override_for(&self, id: &str) -> Option<Point> {
        self.position_overrides.get(id).copied()
    }

    pub fn set_override(&mut self, id: &str, position: Point) {
        self.position_overrides.insert(id.to_string(), position);
    }

    pub fn clear_overrides(&mut self) {
        self.position_overrides.clear();
    }

    pub fn has_overrides(&self) -> bool {
        !self.position_overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_round_trips() {
        let mut view = ViewState::new();
        assert!(view.toggle_collapsed("root-a"));
        assert!(view.is_collapsed("root-a"));
        assert!(!view.toggle_collapsed("root-a"));
        assert!(view.collapsed_ids.is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let mut view = ViewState::new();
        view.set_override("a", Point::new(1.0, 2.0));
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["positionOverrides"]["a"]["x"], 1.0);
        assert_eq!(value["camera"]["scale"], 1.0);
        let back: ViewState = serde_json::from_value(value).unwrap();
        assert_eq!(back, view);
    }
}
