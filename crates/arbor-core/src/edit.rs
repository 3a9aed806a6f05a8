//! Structural edits expressed against source lines.
//!
//! The diagram never mutates text itself: interactions produce an [`EditRequest`] naming a
//! source line, and the owner of the text applies it (this module is the reference
//! implementation) and feeds the new text back through the parser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::outline::{heading_level, split_lines};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EditAction {
    Rename,
    AddChild,
    Delete,
}

impl EditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rename => "rename",
            Self::AddChild => "addChild",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "rename" => Ok(Self::Rename),
            "addChild" | "add-child" | "add" => Ok(Self::AddChild),
            "delete" | "remove" => Ok(Self::Delete),
            other => Err(Error::UnknownEditAction {
                action: other.to_string(),
            }),
        }
    }
}

/// A structural edit addressed by source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    pub action: EditAction,
    pub line_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl EditRequest {
    pub fn rename(line_index: usize, value: impl Into<String>) -> Self {
        Self {
            action: EditAction::Rename,
            line_index,
            value: Some(value.into()),
        }
    }

    pub fn add_child(line_index: usize, value: impl Into<String>) -> Self {
        Self {
            action: EditAction::AddChild,
            line_index,
            value: Some(value.into()),
        }
    }

    pub fn delete(line_index: usize) -> Self {
        Self {
            action: EditAction::Delete,
            line_index,
            value: None,
        }
    }

    fn required_value(&self) -> Result<&str> {
        self.value
            .as_deref()
            .ok_or(Error::MissingEditValue {
                action: self.action.as_str(),
            })
    }
}

/// Applies `request` to `text` and returns the new text.
pub fn apply_edit(text: &str, request: &EditRequest) -> Result<String> {
    let mut lines: Vec<&str> = split_lines(text).collect();
    let blank_document = lines.len() == 1 && lines[0].trim().is_empty();
    let index = request.line_index;

    match request.action {
        EditAction::Rename => {
            let value = request.required_value()?;
            if blank_document && index == 0 {
                return Ok(format!("# {value}"));
            }
            check_range(index, lines.len())?;
            let level = heading_level(lines[index]);
            let renamed = if level > 0 {
                format!("{} {value}", "#".repeat(level))
            } else {
                value.to_string()
            };
            lines[index] = &renamed;
            Ok(lines.join("\n"))
        }
        EditAction::AddChild => {
            let value = request.required_value()?;
            if blank_document && index == 0 {
                return Ok(format!("# Root\n## {value}"));
            }
            check_range(index, lines.len())?;
            let parent_level = heading_level(lines[index]);
            let child = format!("{} {value}", "#".repeat(parent_level + 1));
            let insert_at = block_end(&lines, index);
            lines.insert(insert_at, &child);
            Ok(lines.join("\n"))
        }
        EditAction::Delete => {
            check_range(index, lines.len())?;
            let end = block_end(&lines, index);
            lines.drain(index..end);
            Ok(lines.join("\n"))
        }
    }
}

/// The editable text of a line, with any heading marker removed.
pub fn line_label(text: &str, line_index: usize) -> Option<String> {
    let line = split_lines(text).nth(line_index)?;
    let level = heading_level(line);
    Some(line[level..].trim_start().to_string())
}

/// One past the last line of the block owned by `index`: following blank lines, text lines
/// and deeper headings.
fn block_end(lines: &[&str], index: usize) -> usize {
    let level = heading_level(lines[index]);
    let mut end = index + 1;
    while end < lines.len() {
        let next = lines[end];
        if next.trim().is_empty() {
            end += 1;
            continue;
        }
        let next_level = heading_level(next);
        if next_level > level || next_level == 0 {
            end += 1;
        } else {
            break;
        }
    }
    end
}

fn check_range(line_index: usize, line_count: usize) -> Result<()> {
    if line_index < line_count {
        Ok(())
    } else {
        Err(Error::LineOutOfRange {
            line_index,
            line_count,
        })
    }
}
