//! Branch coloring.
//!
//! A node takes the palette color of the top-level branch it belongs to: the index, among the
//! root's children, of its depth-1 ancestor, modulo the palette length. The root is neutral.

use arbor_core::OutlineNode;
use rustc_hash::FxHashMap;

use crate::settings::{Palette, ThemeSettings};

/// Colors for every node of `root`, collapsed subtrees included.
pub fn branch_colors(
    root: &OutlineNode,
    palette: &Palette,
    theme: &ThemeSettings,
) -> FxHashMap<String, String> {
    let mut out = FxHashMap::default();
    out.insert(root.id.clone(), theme.root_color.clone());
    for (branch, child) in root.children.iter().enumerate() {
        let color = palette.color(branch).unwrap_or(&theme.root_color);
        for node in child.descendants() {
            out.insert(node.id.clone(), color.to_string());
        }
    }
    out
}
