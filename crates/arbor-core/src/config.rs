use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::{Error, Result};

/// Branch colors used when no palette is configured.
pub const DEFAULT_PALETTE: [&str; 10] = [
    "#FF7F50", "#4ECDC4", "#FF6B6B", "#FFE66D", "#1A535C", "#F7FFF7", "#A8DADC", "#457B9D",
    "#E63946", "#2A9D8F",
];

/// A JSON-object configuration tree addressed by dotted paths (`layout.nodeSize`).
///
/// `ArborConfig::default()` carries every built-in default; user overrides are merged on top
/// with [`ArborConfig::with_overrides`], and typed views are decoded per section with
/// [`ArborConfig::section`].
#[derive(Debug, Clone, PartialEq)]
pub struct ArborConfig(Value);

impl Default for ArborConfig {
    fn default() -> Self {
        Self(default_config_value())
    }
}

fn default_config_value() -> Value {
    json!({
        "outline": {
            "placeholderName": "Start Typing...",
            "emptyName": "Empty",
            "untitledName": "Untitled"
        },
        "layout": {
            "nodeSize": [80.0, 260.0],
            "siblingSeparation": 1.1,
            "cousinSeparation": 1.3,
            "orientation": "leftToRight"
        },
        "animation": {
            "durationMs": 500.0
        },
        "interaction": {
            "dragThreshold": 4.0
        },
        "camera": {
            "minScale": 0.1,
            "maxScale": 4.0,
            "zoomInFactor": 1.2,
            "zoomOutFactor": 0.8,
            "zoomDurationMs": 250.0,
            "focusScale": 1.2,
            "focusDurationMs": 1200.0,
            "resetDurationMs": 750.0
        },
        "export": {
            "padding": 60.0
        },
        "theme": {
            "rootColor": "#4A5568",
            "collapsedFill": "#E0E5EC",
            "textColor": "#475569"
        },
        "palette": DEFAULT_PALETTE,
    })
}

impl ArborConfig {
    /// Defaults with `overrides` deep-merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut cfg = Self::default();
        merge_onto(&mut cfg.0, overrides);
        cfg
    }

    /// Parses a JSON document and merges it onto the defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(text)?;
        if !overrides.is_object() {
            return Err(Error::InvalidConfig {
                path: String::new(),
                message: "config root must be a JSON object".to_string(),
            });
        }
        Ok(Self::with_overrides(&overrides))
    }

    pub fn get(&self, dotted_path: &str) -> Option<&Value> {
        dotted_path
            .split('.')
            .try_fold(&self.0, |cur, segment| cur.as_object()?.get(segment))
    }

    /// Decodes the object at `dotted_path` into a typed view.
    ///
    /// A missing section decodes as `T::default()`.
    pub fn section<T>(&self, dotted_path: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(value) = self.get(dotted_path) else {
            return Ok(T::default());
        };
        serde_json::from_value(value.clone()).map_err(|e| Error::InvalidConfig {
            path: dotted_path.to_string(),
            message: e.to_string(),
        })
    }
}

/// Objects merge key by key; any other override replaces the slot, arrays included.
fn merge_onto(slot: &mut Value, overrides: &Value) {
    match (slot, overrides) {
        (Value::Object(fields), Value::Object(incoming)) => {
            for (key, value) in incoming {
                merge_onto(fields.entry(key.as_str()).or_insert(Value::Null), value);
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_addressable_by_dotted_path() {
        let cfg = ArborConfig::default();
        assert_eq!(cfg.get("interaction.dragThreshold"), Some(&json!(4.0)));
        assert_eq!(cfg.get("outline.untitledName"), Some(&json!("Untitled")));
        assert_eq!(cfg.get("palette").and_then(Value::as_array).map(Vec::len), Some(10));
        assert_eq!(cfg.get("palette.0"), None);
    }

    #[test]
    fn overrides_keep_sibling_defaults() {
        let cfg = ArborConfig::with_overrides(&json!({ "camera": { "focusScale": 2.0 } }));
        assert_eq!(cfg.get("camera.focusScale"), Some(&json!(2.0)));
        assert_eq!(cfg.get("camera.maxScale"), Some(&json!(4.0)));
    }

    #[test]
    fn overrides_replace_arrays_and_add_new_sections() {
        let cfg = ArborConfig::with_overrides(&json!({
            "palette": ["#000000"],
            "extra": { "flag": true }
        }));
        assert_eq!(cfg.get("palette"), Some(&json!(["#000000"])));
        assert_eq!(cfg.get("extra.flag"), Some(&json!(true)));
    }

    #[test]
    fn non_object_json_config_is_rejected() {
        let err = ArborConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn section_reports_the_failing_path() {
        #[derive(Debug, Default, serde::Deserialize)]
        struct Export {
            #[allow(dead_code)]
            padding: f64,
        }

        let cfg = ArborConfig::with_overrides(&json!({ "export": { "padding": "wide" } }));
        let err = cfg.section::<Export>("export").unwrap_err();
        assert!(err.to_string().contains("`export`"));
    }
}
