//! Node identity.
//!
//! Ids are derived from content and position: a slug of the node text prefixed with the
//! parent's id, de-duplicated against the ids already handed out during the same parse.
//! Renaming a node or moving it under another parent therefore changes its id, and anything
//! keyed by the old id (pins, drag overrides, collapse state) stops matching it.

use rustc_hash::FxHashSet;

/// Id of the synthetic root that groups multiple top-level nodes.
pub const VIRTUAL_ROOT_ID: &str = "virtual-root";

/// Id of the sentinel returned for empty input.
pub const EMPTY_ROOT_ID: &str = "root";

/// Slug used when the text has no ASCII alphanumerics.
pub const FALLBACK_SLUG: &str = "node";

/// Strategy for turning `(text, parent id)` into a unique node id.
pub trait IdPolicy {
    fn derive_id(&self, text: &str, parent_id: &str, used: &mut FxHashSet<String>) -> String;
}

/// The default policy: `<parent>-<slug>` with numeric `-N` suffixes on collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugPathIds;

impl IdPolicy for SlugPathIds {
    fn derive_id(&self, text: &str, parent_id: &str, used: &mut FxHashSet<String>) -> String {
        derive_id(text, parent_id, used)
    }
}

pub fn slugify(text: &str) -> String {
    let slug: String = text
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

pub fn derive_id(text: &str, parent_id: &str, used: &mut FxHashSet<String>) -> String {
    let slug = slugify(text);
    let base = if parent_id == VIRTUAL_ROOT_ID {
        slug
    } else {
        format!("{parent_id}-{slug}")
    };

    let mut candidate = base.clone();
    let mut count = 1usize;
    while used.contains(&candidate) {
        candidate = format!("{base}-{count}");
        count += 1;
    }
    used.insert(candidate.clone());
    candidate
}
