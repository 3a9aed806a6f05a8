//! Standalone SVG export of the current scene.
//!
//! Raster encoding is left to the host; this module only decides what area to capture and
//! produces a self-contained document with a background and no camera transform.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::model::Bounds;
use crate::scene::Scene;
use crate::settings::{ExportSettings, Orientation};
use crate::svg::{SVG_ROOT_ID, escape_xml, fmt, write_scene_body};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    /// Bounding box of the drawn content.
    pub content: Bounds,
    /// `content` grown by the export padding; becomes the document viewBox.
    pub view_box: Bounds,
    pub background: String,
}

impl ExportPlan {
    pub fn width(&self) -> f64 {
        self.view_box.width()
    }

    pub fn height(&self) -> f64 {
        self.view_box.height()
    }
}

/// `None` (with a warning) when the scene has no area to capture.
pub fn plan_export(scene: &Scene, background: &str, settings: &ExportSettings) -> Option<ExportPlan> {
    let content = scene
        .bounds()
        .filter(|b| b.width() > 0.0 && b.height() > 0.0);
    let Some(content) = content else {
        tracing::warn!("Map is empty, nothing to export");
        return None;
    };
    Some(ExportPlan {
        content,
        view_box: content.padded(settings.padding),
        background: background.to_string(),
    })
}

pub fn export_svg(scene: &Scene, plan: &ExportPlan, orientation: Orientation) -> String {
    let vb = &plan.view_box;
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg id="{SVG_ROOT_ID}" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        fmt(vb.width()),
        fmt(vb.height()),
        fmt(vb.min_x),
        fmt(vb.min_y),
        fmt(vb.width()),
        fmt(vb.height())
    );
    let _ = write!(
        out,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
        fmt(vb.min_x),
        fmt(vb.min_y),
        fmt(vb.width()),
        fmt(vb.height()),
        escape_xml(&plan.background)
    );
    out.push_str("<g>");
    write_scene_body(&mut out, scene, orientation);
    out.push_str("</g></svg>");
    out
}
