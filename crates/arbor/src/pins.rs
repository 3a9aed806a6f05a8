use serde::{Deserialize, Serialize};

/// A navigation marker attached to a node id.
///
/// The reference is weak: after an edit that renames the node (and so changes its derived id)
/// the pin dangles until the id reappears. Pins are never removed automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pin {
    pub id: String,
    pub node_id: String,
    pub label: String,
}

/// Ordered pin list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinBoard {
    pins: Vec<Pin>,
}

impl PinBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node_id: impl Into<String>, label: impl Into<String>) -> Pin {
        let pin = Pin {
            id: uuid::Uuid::new_v4().to_string(),
            node_id: node_id.into(),
            label: label.into(),
        };
        self.pins.push(pin.clone());
        pin
    }

    /// Removes every pin on `node_id`; returns how many were removed.
    pub fn remove_node(&mut self, node_id: &str) -> usize {
        let before = self.pins.len();
        self.pins.retain(|p| p.node_id != node_id);
        before - self.pins.len()
    }

    pub fn remove(&mut self, pin_id: &str) -> Option<Pin> {
        let idx = self.pins.iter().position(|p| p.id == pin_id)?;
        Some(self.pins.remove(idx))
    }

    pub fn get(&self, pin_id: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.id == pin_id)
    }

    pub fn has_pin(&self, node_id: &str) -> bool {
        self.pins.iter().any(|p| p.node_id == node_id)
    }

    pub fn list(&self) -> &[Pin] {
        &self.pins
    }

    pub fn len(&self) -> usize {
        self.pins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}
