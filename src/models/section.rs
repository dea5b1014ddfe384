use serde::{Deserialize, Serialize};

/// A document reference inside the section structure listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub path: String,
}

/// A directory nested one level under a section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subsection {
    pub name: String,
    pub path: String,
    pub documents: Vec<DocumentRef>,
}

/// A directory directly under the docs root.
///
/// Invariant: every section gets an `index.md` generated at creation time.
/// Markdown files directly under the section are listed in `documents`;
/// files under a subsection are listed on the subsection, recursively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub path: String,
    pub subsections: Vec<Subsection>,
    pub documents: Vec<DocumentRef>,
}

/// The full section tree with aggregate counts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionStructure {
    pub sections: Vec<Section>,
    pub total_sections: usize,
    pub total_documents: usize,
}

/// Input for creating a section or subsection. The name is sanitized into a
/// directory slug; the original display name goes into the generated index
/// heading and the navigation manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionInput {
    pub name: String,
    pub commit_message: Option<String>,
    #[serde(default = "super::default_push")]
    pub push: bool,
}

/// Response for section create/delete operations.
///
/// `navigation_updated` reports whether the manifest bookkeeping kept up with
/// the filesystem change; a `false` here never rolls the change back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResponse {
    pub message: String,
    pub path: String,
    pub navigation_updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_error: Option<bool>,
}
