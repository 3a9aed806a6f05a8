#![forbid(unsafe_code)]

//! `arbor` turns an indented heading outline into an interactive, animated mind map.
//!
//! The outline text stays the single source of truth. Every edit re-parses it, re-lays the
//! tree out and reconciles the result against the previous frame by node id, so nodes that
//! survive an edit glide to their new place instead of jumping.
//!
//! - [`arbor_core`] (re-exported here): parser, ids, organizer, reference text edits, config
//! - [`render`]: layout, reconciliation, transitions, SVG
//! - [`MindMap`]: the controller tying text, view state, pins and gestures together

pub use arbor_core::*;

pub mod interaction;
pub mod mindmap;
pub mod pins;

pub use interaction::{
    ContextMenu, Gesture, GestureOutcome, InteractionSettings, MenuItem, MenuOutcome, MenuTarget,
    PressTarget,
};
pub use mindmap::{MindMap, MindMapOptions, NodeVisual};
pub use pins::{Pin, PinBoard};

pub mod render {
    pub use arbor_render::camera::{Camera, Viewport};
    pub use arbor_render::diff::{LinkChange, LinkEnds, NodeChange, Patch, ScenePatch};
    pub use arbor_render::export::{ExportPlan, export_svg, plan_export};
    pub use arbor_render::model::{Bounds, Frame, LayoutLink, LayoutNode, Point};
    pub use arbor_render::scene::{Scene, SceneLink, SceneNode};
    pub use arbor_render::settings::{Orientation, Palette, RenderSettings};
    pub use arbor_render::svg::{SvgOptions, render_scene_svg};
    pub use arbor_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use arbor_render::transition::{Animator, CameraAnimation, Easing, Transition};
    pub use arbor_render::view_state::ViewState;
    pub use arbor_render::{ReconcileMode, Reconciled, layout_outline, reconcile};
}

#[derive(Debug, thiserror::Error)]
pub enum HeadlessError {
    #[error(transparent)]
    Core(#[from] arbor_core::Error),
    #[error(transparent)]
    Render(#[from] arbor_render::Error),
}

pub type Result<T> = std::result::Result<T, HeadlessError>;
