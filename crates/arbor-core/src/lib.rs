#![forbid(unsafe_code)]

//! Outline grammar + node identity for arbor mind maps (headless).
//!
//! - [`outline`]: text -> [`OutlineNode`] tree with content-derived ids
//! - [`organize`]: sort / normalize an outline, text -> text
//! - [`edit`]: reference implementation of line-addressed structural edits
//! - [`config`]: JSON configuration tree with built-in defaults

pub mod config;
pub mod edit;
pub mod error;
pub mod ids;
pub mod organize;
pub mod outline;

pub use config::ArborConfig;
pub use edit::{EditAction, EditRequest, apply_edit, line_label};
pub use error::{Error, Result};
pub use ids::{IdPolicy, SlugPathIds, derive_id};
pub use organize::{OrganizeMode, organize};
pub use outline::{OutlineNode, OutlineParser, OutlineShape, parse_outline};
