use serde::{Deserialize, Serialize};

/// One line of porcelain status: the two-character status code and the
/// filename it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: String,
    pub file: String,
}

/// Repository status as reported by `GET /api/git/status`.
///
/// Outside a repository `is_repo` is false and `message` explains why. A
/// failing status invocation sets `error`, which is distinct from an empty
/// file list with `has_changes: false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitStatusResponse {
    pub is_repo: bool,
    #[serde(default)]
    pub files: Vec<StatusEntry>,
    pub has_changes: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
