use serde::{Deserialize, Serialize};

use crate::model::Point;

/// Size of the drawing surface. The SVG viewBox is centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// `min-x min-y width height`
    pub fn view_box(&self) -> [f64; 4] {
        [-self.width / 2.0, -self.height / 2.0, self.width, self.height]
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// `translate(translate_x, translate_y) scale(scale)` applied to the diagram group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Camera {
    pub const IDENTITY: Camera = Camera {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
    };

    pub fn new(translate_x: f64, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_x,
            translate_y,
            scale,
        }
    }

    /// Root slightly left of center at scale 1.
    pub fn default_framing(viewport: Viewport) -> Self {
        Self::new(-viewport.width / 4.0, 0.0, 1.0)
    }

    /// Centers `point` at `scale`.
    pub fn focus_on(point: Point, scale: f64) -> Self {
        Self::new(-point.x * scale, -point.y * scale, scale)
    }

    /// Scales about the viewport center, keeping the scale within `[min_scale, max_scale]`.
    pub fn scaled_by(self, factor: f64, min_scale: f64, max_scale: f64) -> Self {
        let scale = (self.scale * factor).clamp(min_scale, max_scale);
        let ratio = scale / self.scale;
        Self::new(self.translate_x * ratio, self.translate_y * ratio, scale)
    }

    /// Diagram space -> viewBox space.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    pub fn transform_attr(&self) -> String {
        format!(
            "translate({},{}) scale({})",
            crate::svg::fmt(self.translate_x),
            crate::svg::fmt(self.translate_y),
            crate::svg::fmt(self.scale)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_centers_the_point() {
        let cam = Camera::focus_on(Point::new(260.0, -40.0), 1.2);
        let on_screen = cam.apply(Point::new(260.0, -40.0));
        assert!(on_screen.x.abs() < 1e-9 && on_screen.y.abs() < 1e-9);
    }

    #[test]
    fn zoom_keeps_the_center_fixed_and_clamps() {
        let cam = Camera::new(100.0, -50.0, 1.0);
        let center = Point::new(-100.0, 50.0);
        assert_eq!(cam.apply(center), Point::ORIGIN);
        let zoomed = cam.scaled_by(1.2, 0.1, 4.0);
        let back = zoomed.apply(center);
        assert!(back.x.abs() < 1e-9 && back.y.abs() < 1e-9);

        let max = Camera::new(0.0, 0.0, 3.9).scaled_by(1.2, 0.1, 4.0);
        assert_eq!(max.scale, 4.0);
        let min = Camera::new(0.0, 0.0, 0.11).scaled_by(0.8, 0.1, 4.0);
        assert_eq!(min.scale, 0.1);
    }

    #[test]
    fn default_framing_shifts_left_by_a_quarter() {
        let cam = Camera::default_framing(Viewport::new(1000.0, 600.0));
        assert_eq!(cam, Camera::new(-250.0, 0.0, 1.0));
    }
}
