#![forbid(unsafe_code)]

//! Headless layout + reconciliation for arbor mind maps.
//!
//! The pipeline is `OutlineNode` -> [`layout::layout_outline`] -> [`Frame`], then
//! [`reconcile::reconcile`] matches the new frame against the previous one by node id and
//! emits a declarative [`ScenePatch`]. Nothing here owns a clock or a display surface:
//! [`transition`] interpolates on host-supplied timestamps and [`svg`] turns a [`Scene`] into
//! markup.

pub mod camera;
pub mod color;
pub mod diff;
pub mod export;
pub mod layout;
pub mod model;
pub mod reconcile;
pub mod scene;
pub mod settings;
pub mod svg;
pub mod text;
pub mod transition;
pub mod view_state;

pub use camera::{Camera, Viewport};
pub use diff::{LinkChange, LinkEnds, NodeChange, Patch, ScenePatch};
pub use export::{ExportPlan, export_svg, plan_export};
pub use layout::layout_outline;
pub use model::{Bounds, Frame, LabelAnchor, LabelLayout, LayoutLink, LayoutNode, Point};
pub use reconcile::{ReconcileMode, Reconciled, reconcile};
pub use scene::{Scene, SceneLink, SceneNode};
pub use settings::{
    AnimationSettings, CameraSettings, ExportSettings, LayoutSettings, Orientation, Palette,
    RenderSettings, ThemeSettings,
};
pub use svg::render_scene_svg;
pub use transition::{Animator, CameraAnimation, Easing, Interpolate, Transition};
pub use view_state::ViewState;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown palette: {name} (expected one of: default, ocean, forest, sunset, monochrome)")]
    UnknownPalette { name: String },
    #[error(transparent)]
    Config(#[from] arbor_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
