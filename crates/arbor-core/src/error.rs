pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown organize mode: {mode} (expected one of: smart, az, za)")]
    UnknownOrganizeMode { mode: String },

    #[error("Unknown edit action: {action} (expected one of: rename, addChild, delete)")]
    UnknownEditAction { action: String },

    #[error("Line {line_index} is out of range (document has {line_count} lines)")]
    LineOutOfRange {
        line_index: usize,
        line_count: usize,
    },

    #[error("Edit action `{action}` requires a value")]
    MissingEditValue { action: &'static str },

    #[error("Invalid config at `{path}`: {message}")]
    InvalidConfig { path: String, message: String },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
