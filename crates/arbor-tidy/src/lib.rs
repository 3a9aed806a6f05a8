#![forbid(unsafe_code)]

//! Tidy tree layout.
//!
//! A linear-time Reingold-Tilford layout with Walker's improvements as refined by Buchheim,
//! Jünger and Leipert, matching the placements of `d3-hierarchy`'s `tree()` with a fixed
//! `nodeSize`: the root sits at `x = 0`, depth maps to `y = depth * node_size.depth`, and the
//! breadth axis is measured in separation units times `node_size.breadth`.

pub mod error;
pub mod layout;
pub mod tree;

pub use error::{Error, Result};
pub use layout::{NodeSize, Point, Separation, SiblingSeparation, TidyLayout, layout};
pub use tree::{NodeIndex, Tree};
