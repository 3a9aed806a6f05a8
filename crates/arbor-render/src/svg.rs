//! SVG markup for a [`Scene`].
//!
//! The document is an `<svg id="mindmap-svg">` root holding a single `<g>` that carries the
//! camera transform; links are drawn first so nodes sit on top of them.

use std::fmt::Write as _;

use crate::camera::{Camera, Viewport};
use crate::model::Point;
use crate::scene::{PIN_MARKER_RISE, Scene, SceneLink, SceneNode};
use crate::settings::Orientation;
use crate::text::{BASELINE_EM, LINE_HEIGHT_EM, first_line_dy_em};

pub const SVG_ROOT_ID: &str = "mindmap-svg";

const PIN_ICON_PATH: &str = "M12 2C8.13 2 5 5.13 5 9c0 5.25 7 13 7 13s7-7.75 7-13c0-3.87-3.13-7-7-7zm0 9.5c-1.38 0-2.5-1.12-2.5-2.5s1.12-2.5 2.5-2.5 2.5 1.12 2.5 2.5-1.12 2.5-2.5 2.5z";
const PIN_COLOR: &str = "#EF4444";
const PIN_STROKE: &str = "#ffffff";
const FONT_FAMILY: &str = "'Inter', sans-serif";

#[derive(Debug, Clone, Default)]
pub struct SvgOptions {
    pub viewport: Viewport,
    pub orientation: Orientation,
}

/// Number formatting for attributes: no `-0`, no float noise on integers.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == -0.0 {
        v = 0.0;
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Cubic curve leaving the source and entering the target along the depth axis.
pub fn diagonal_path(source: Point, target: Point, orientation: Orientation) -> String {
    match orientation {
        Orientation::LeftToRight => {
            let mid = (source.x + target.x) / 2.0;
            format!(
                "M {} {} C {} {}, {} {}, {} {}",
                fmt(source.x),
                fmt(source.y),
                fmt(mid),
                fmt(source.y),
                fmt(mid),
                fmt(target.y),
                fmt(target.x),
                fmt(target.y)
            )
        }
        Orientation::TopToBottom => {
            let mid = (source.y + target.y) / 2.0;
            format!(
                "M {} {} C {} {}, {} {}, {} {}",
                fmt(source.x),
                fmt(source.y),
                fmt(source.x),
                fmt(mid),
                fmt(target.x),
                fmt(mid),
                fmt(target.x),
                fmt(target.y)
            )
        }
    }
}

/// Renders the live view: viewport-sized, centered viewBox, camera transform on the group.
pub fn render_scene_svg(scene: &Scene, camera: &Camera, options: &SvgOptions) -> String {
    let [x, y, w, h] = options.viewport.view_box();
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg id="{SVG_ROOT_ID}" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
        fmt(w),
        fmt(h),
        fmt(x),
        fmt(y),
        fmt(w),
        fmt(h)
    );
    let _ = write!(out, r#"<g transform="{}">"#, camera.transform_attr());
    write_scene_body(&mut out, scene, options.orientation);
    out.push_str("</g></svg>");
    out
}

pub(crate) fn write_scene_body(out: &mut String, scene: &Scene, orientation: Orientation) {
    for link in &scene.links {
        write_link(out, link, orientation);
    }
    for node in &scene.nodes {
        write_node(out, node);
    }
}

fn write_link(out: &mut String, link: &SceneLink, orientation: Orientation) {
    let _ = write!(
        out,
        r#"<path class="link" data-id="{}" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}"/>"#,
        escape_xml(&link.id),
        diagonal_path(link.source, link.target, orientation),
        escape_xml(&link.color),
        fmt(link.width),
        fmt(link.opacity)
    );
}

fn write_node(out: &mut String, node: &SceneNode) {
    let _ = write!(
        out,
        r#"<g class="node" data-id="{}" transform="translate({},{})" opacity="{}">"#,
        escape_xml(&node.id),
        fmt(node.x),
        fmt(node.y),
        fmt(node.opacity)
    );
    let _ = write!(
        out,
        r#"<circle class="node-circle" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
        fmt(node.radius),
        escape_xml(&node.fill),
        escape_xml(&node.stroke),
        fmt(node.stroke_width)
    );
    if node.pinned {
        let _ = write!(
            out,
            r#"<g class="pin-group" transform="translate(-6,-{}) scale(0.5)"><path d="{PIN_ICON_PATH}" fill="{PIN_COLOR}" stroke="{PIN_STROKE}" stroke-width="2"/></g>"#,
            fmt(PIN_MARKER_RISE)
        );
    }

    let label = &node.label;
    let _ = write!(
        out,
        r#"<text text-anchor="{}" style="font-family: {FONT_FAMILY}; font-size: {}px; font-weight: {}; fill: {};">"#,
        label.anchor.as_str(),
        fmt(label.font_size),
        label.font_weight,
        escape_xml(&node.text_color)
    );
    for (i, line) in label.lines.iter().enumerate() {
        let dy = if label.lines.len() == 1 {
            BASELINE_EM
        } else if i == 0 {
            first_line_dy_em(label.lines.len())
        } else {
            LINE_HEIGHT_EM
        };
        let _ = write!(
            out,
            r#"<tspan x="{}" dy="{}em">{}</tspan>"#,
            fmt(label.offset_x),
            fmt(dy),
            escape_xml(line)
        );
    }
    out.push_str("</text></g>");
}
