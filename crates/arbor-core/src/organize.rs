//! Batch text -> text transforms over the outline grammar.
//!
//! The organizer builds its own lightweight tree (no ids, no line numbers) using the same
//! nesting rules as the parser, optionally reorders siblings, and re-serializes every node as
//! a canonical `<#'s> <text>` heading line.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::Error;
use crate::outline::{heading, split_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrganizeMode {
    /// Normalize heading levels and fold text/bullet lines into headings; keep order.
    Smart,
    /// Sort siblings ascending, recursively.
    Az,
    /// Sort siblings descending, recursively.
    Za,
}

impl FromStr for OrganizeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "smart" => Ok(Self::Smart),
            "az" | "a-z" => Ok(Self::Az),
            "za" | "z-a" => Ok(Self::Za),
            _ => Err(Error::UnknownOrganizeMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for OrganizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Smart => "smart",
            Self::Az => "az",
            Self::Za => "za",
        })
    }
}

#[derive(Debug, Default)]
struct OrgNode {
    content: String,
    children: Vec<OrgNode>,
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+]\s+").expect("valid bullet regex"))
}

/// Applies `mode` to `text`. Text with no non-blank lines is returned unchanged.
pub fn organize(text: &str, mode: OrganizeMode) -> String {
    let mut root = build_tree(text);
    if root.children.is_empty() {
        return text.to_string();
    }

    match mode {
        OrganizeMode::Smart => {}
        OrganizeMode::Az => sort_recursive(&mut root, |a, b| locale_cmp(a, b)),
        OrganizeMode::Za => sort_recursive(&mut root, |a, b| locale_cmp(b, a)),
    }

    let mut out: Vec<String> = Vec::new();
    for child in &root.children {
        serialize(child, 1, &mut out);
    }
    tracing::trace!(%mode, lines = out.len(), "organized outline");
    out.join("\n")
}

fn build_tree(text: &str) -> OrgNode {
    // Index-based arena while building; the stack holds (path of child positions, level).
    let mut root = OrgNode::default();
    let mut stack: Vec<(Vec<usize>, usize)> = vec![(Vec::new(), 0)];

    for line in split_lines(text) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // An indented `#` run is text, as in the parser.
        let (level, content) = match heading(line) {
            Some((level, text)) => (level, text.to_string()),
            None => {
                let open = stack.last().map_or(0, |(_, level)| *level);
                let content = bullet_re().replace(trimmed, "").trim().to_string();
                (open + 1, content)
            }
        };

        while stack.len() > 1 && stack.last().is_some_and(|(_, top)| *top >= level) {
            stack.pop();
        }
        let parent_path = stack.last().map(|(path, _)| path.clone()).unwrap_or_default();

        let parent = node_at_mut(&mut root, &parent_path);
        parent.children.push(OrgNode {
            content,
            children: Vec::new(),
        });
        let mut path = parent_path;
        path.push(parent.children.len() - 1);
        stack.push((path, level));
    }

    root
}

fn node_at_mut<'a>(root: &'a mut OrgNode, path: &[usize]) -> &'a mut OrgNode {
    let mut cur = root;
    for &i in path {
        cur = &mut cur.children[i];
    }
    cur
}

fn sort_recursive(node: &mut OrgNode, cmp: fn(&str, &str) -> Ordering) {
    node.children.sort_by(|a, b| cmp(&a.content, &b.content));
    for child in &mut node.children {
        sort_recursive(child, cmp);
    }
}

fn serialize(node: &OrgNode, level: usize, out: &mut Vec<String>) {
    out.push(format!("{} {}", "#".repeat(level), node.content));
    for child in &node.children {
        serialize(child, level + 1, out);
    }
}

/// Collation close to a default locale compare: case-insensitive first, lowercase before
/// uppercase on ties, then code point order so only identical strings compare equal.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    for (ca, cb) in a.chars().zip(b.chars()) {
        if ca == cb {
            continue;
        }
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return ca.cmp(&cb),
        }
    }
    a.cmp(b)
}
