use arbor_core::ArborConfig;
use arbor_core::config::DEFAULT_PALETTE;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    /// Depth grows to the right; siblings stack vertically.
    #[default]
    LeftToRight,
    /// Depth grows downwards; siblings spread horizontally.
    TopToBottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    /// `[breadth, depth]` footprint of one node.
    pub node_size: [f64; 2],
    pub sibling_separation: f64,
    pub cousin_separation: f64,
    pub orientation: Orientation,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            node_size: [80.0, 260.0],
            sibling_separation: 1.1,
            cousin_separation: 1.3,
            orientation: Orientation::LeftToRight,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationSettings {
    pub duration_ms: f64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self { duration_ms: 500.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraSettings {
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub zoom_duration_ms: f64,
    pub focus_scale: f64,
    pub focus_duration_ms: f64,
    pub reset_duration_ms: f64,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 4.0,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.8,
            zoom_duration_ms: 250.0,
            focus_scale: 1.2,
            focus_duration_ms: 1200.0,
            reset_duration_ms: 750.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportSettings {
    pub padding: f64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self { padding: 60.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    pub root_color: String,
    pub collapsed_fill: String,
    pub text_color: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            root_color: "#4A5568".to_string(),
            collapsed_fill: "#E0E5EC".to_string(),
            text_color: "#475569".to_string(),
        }
    }
}

/// Ordered branch colors, indexed modulo their length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<String>);

const OCEAN: &[&str] = &[
    "#00B4D8", "#90E0EF", "#0077B6", "#03045E", "#48CAE4", "#ADE8F4", "#023E8A", "#CAF0F8",
];
const FOREST: &[&str] = &[
    "#606C38", "#283618", "#FEFAE0", "#DDA15E", "#BC6C25", "#2A9D8F", "#E9C46A",
];
const SUNSET: &[&str] = &[
    "#F72585", "#7209B7", "#3A0CA3", "#4361EE", "#4CC9F0", "#F72585",
];
const MONOCHROME: &[&str] = &["#64748B", "#94A3B8", "#475569", "#CBD5E1", "#334155"];

impl Default for Palette {
    fn default() -> Self {
        Self::from_colors(DEFAULT_PALETTE)
    }
}

impl Palette {
    pub const NAMES: [&'static str; 5] = ["default", "ocean", "forest", "sunset", "monochrome"];

    pub fn new(colors: Vec<String>) -> Self {
        Self(colors)
    }

    fn from_colors<'a>(colors: impl IntoIterator<Item = &'a str>) -> Self {
        Self(colors.into_iter().map(str::to_string).collect())
    }

    pub fn named(name: &str) -> Option<Self> {
        let colors: &[&str] = match name.trim().to_ascii_lowercase().as_str() {
            "default" => &DEFAULT_PALETTE,
            "ocean" => OCEAN,
            "forest" => FOREST,
            "sunset" => SUNSET,
            "monochrome" | "mono" => MONOCHROME,
            _ => return None,
        };
        Some(Self::from_colors(colors.iter().copied()))
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The color at `index` modulo the palette length; `None` for an empty palette.
    pub fn color(&self, index: usize) -> Option<&str> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0[index % self.0.len()].as_str())
    }
}

/// Everything the layout, reconciliation and rendering steps read from config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    pub layout: LayoutSettings,
    pub animation: AnimationSettings,
    pub camera: CameraSettings,
    pub export: ExportSettings,
    pub theme: ThemeSettings,
    pub palette: Palette,
}

impl RenderSettings {
    pub fn from_config(config: &ArborConfig) -> Result<Self> {
        Ok(Self {
            layout: config.section("layout")?,
            animation: config.section("animation")?,
            camera: config.section("camera")?,
            export: config.section("export")?,
            theme: config.section("theme")?,
            palette: palette_from_config(config)?,
        })
    }
}

/// `palette` may be a color list or the name of a built-in palette.
fn palette_from_config(config: &ArborConfig) -> Result<Palette> {
    match config.get("palette") {
        None => Ok(Palette::default()),
        Some(serde_json::Value::String(name)) => {
            Palette::named(name).ok_or_else(|| Error::UnknownPalette { name: name.clone() })
        }
        Some(_) => Ok(config.section("palette")?),
    }
}
