use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A markdown document addressed by its path relative to the docs root.
///
/// The document has no persistence beyond the file itself: `title` is derived
/// from the first heading line, `last_modified` from filesystem metadata, and
/// the `git_*` fields describe how far the last mutation made it into version
/// control (present only on mutating responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub path: String,
    pub title: Option<String>,
    pub content: String,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_error: Option<bool>,
}

/// List-view projection of a document, without content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub path: String,
    pub name: String,
    pub directory: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Input for creating a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocumentInput {
    /// Root-relative path, e.g. `"engineering/new-page.md"`. A missing `.md`
    /// extension is appended.
    pub path: String,
    pub content: String,
    pub title: Option<String>,
    /// Custom commit message. Defaults to `docs: Add <path>`.
    pub commit_message: Option<String>,
    /// Whether to push the commit to the remote.
    #[serde(default = "super::default_push")]
    pub push: bool,
}

/// Input for updating an existing document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDocumentInput {
    pub content: String,
    pub title: Option<String>,
    pub commit_message: Option<String>,
    #[serde(default = "super::default_push")]
    pub push: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDocumentResponse {
    pub message: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_status: Option<String>,
}

/// A directory under the docs root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub path: String,
    pub name: String,
}

/// Raw text of the navigation manifest file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestResponse {
    pub content: String,
}
