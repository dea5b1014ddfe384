//! Section Tree Manager: directories with generated index documents.
//!
//! Sections are directories directly under the docs root; subsections nest
//! exactly one level below a section. Both get an `index.md` at creation.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::models::{DocumentRef, Section, SectionStructure, Subsection};

/// Asset directories that are never treated as sections.
const RESERVED_DIRS: [&str; 2] = ["assets", "overrides"];

#[derive(Debug, Error)]
pub enum SectionError {
    #[error("Invalid section name")]
    InvalidName,
    #[error("Section '{0}' already exists")]
    AlreadyExists(String),
    #[error("Parent section '{0}' does not exist")]
    ParentNotFound(String),
    #[error("Path '{0}' does not exist")]
    NotFound(String),
    #[error("Path '{0}' is not a directory")]
    NotADirectory(String),
    #[error("Access denied: Path outside docs directory")]
    OutsideRoot,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A freshly created section or subsection directory.
#[derive(Debug, Clone)]
pub struct CreatedSection {
    /// Sanitized final path component.
    pub slug: String,
    /// Directory path relative to the docs root, forward slashes.
    pub rel_dir: String,
    pub dir: PathBuf,
    pub index_file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SectionStore {
    root: PathBuf,
}

impl SectionStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create a top-level section from a display name.
    ///
    /// The directory uses the sanitized slug; the generated index keeps the
    /// original display name as its heading.
    pub fn create_section(&self, display_name: &str) -> Result<CreatedSection, SectionError> {
        let slug = sanitize_name(display_name);
        if slug.is_empty() {
            return Err(SectionError::InvalidName);
        }

        let dir = self.root.join(&slug);
        if dir.exists() {
            return Err(SectionError::AlreadyExists(slug));
        }

        fs::create_dir_all(&dir)?;
        let index_file = dir.join("index.md");
        let index = format!(
            "# {display_name}\n\nWelcome to the {display_name} documentation.\n\n## Overview\n\nAdd your documentation here.\n"
        );
        fs::write(&index_file, index)?;

        Ok(CreatedSection {
            rel_dir: slug.clone(),
            slug,
            dir,
            index_file,
        })
    }

    /// Create a subsection under an existing section.
    pub fn create_subsection(
        &self,
        parent_name: &str,
        display_name: &str,
    ) -> Result<CreatedSection, SectionError> {
        let parent_slug = sanitize_name(parent_name);
        let slug = sanitize_name(display_name);
        if parent_slug.is_empty() || slug.is_empty() {
            return Err(SectionError::InvalidName);
        }

        let parent_dir = self.root.join(&parent_slug);
        if !parent_dir.exists() {
            return Err(SectionError::ParentNotFound(parent_slug));
        }

        let dir = parent_dir.join(&slug);
        if dir.exists() {
            return Err(SectionError::AlreadyExists(format!("{parent_slug}/{slug}")));
        }

        fs::create_dir_all(&dir)?;
        let index_file = dir.join("index.md");
        let index = format!(
            "# {display_name}\n\n## Overview\n\nAdd your {display_name} documentation here.\n"
        );
        fs::write(&index_file, index)?;

        Ok(CreatedSection {
            rel_dir: format!("{parent_slug}/{slug}"),
            slug,
            dir,
            index_file,
        })
    }

    /// Recursively delete a section or subsection directory.
    /// Returns the number of removed entries (files and directories).
    pub fn delete_section(&self, rel_path: &str) -> Result<usize, SectionError> {
        let clean = rel_path.trim_start_matches('/');
        let full = contained_path(&self.root, clean).ok_or(SectionError::OutsideRoot)?;

        if !full.exists() {
            return Err(SectionError::NotFound(clean.to_string()));
        }
        if !full.is_dir() {
            return Err(SectionError::NotADirectory(clean.to_string()));
        }

        let removed = count_entries(&full)?;
        fs::remove_dir_all(&full)?;
        Ok(removed)
    }

    /// Enumerate sections, their subsections, and documents.
    pub fn structure(&self) -> Result<SectionStructure, SectionError> {
        let mut structure = SectionStructure::default();
        if !self.root.exists() {
            return Ok(structure);
        }

        let mut top: Vec<PathBuf> = fs::read_dir(&self.root)?
            .collect::<io::Result<Vec<_>>>()?
            .into_iter()
            .map(|e| e.path())
            .filter(|p| p.is_dir() && is_section_dir(p))
            .collect();
        top.sort();

        for section_dir in top {
            let mut section = Section {
                name: file_name(&section_dir),
                path: crate::docs::rel_string(&section_dir, &self.root),
                subsections: Vec::new(),
                documents: Vec::new(),
            };

            let mut children: Vec<PathBuf> = fs::read_dir(&section_dir)?
                .collect::<io::Result<Vec<_>>>()?
                .into_iter()
                .map(|e| e.path())
                .collect();
            children.sort();

            for child in children {
                if child.is_dir() {
                    let mut docs = Vec::new();
                    collect_doc_refs(&child, &self.root, &mut docs)?;
                    section.subsections.push(Subsection {
                        name: file_name(&child),
                        path: crate::docs::rel_string(&child, &self.root),
                        documents: docs,
                    });
                } else if child.extension().and_then(|e| e.to_str()) == Some("md") {
                    section.documents.push(DocumentRef {
                        name: file_name(&child),
                        path: crate::docs::rel_string(&child, &self.root),
                    });
                }
            }

            structure.total_sections += 1;
            structure.total_documents += section.documents.len();
            for sub in &section.subsections {
                structure.total_documents += sub.documents.len();
            }
            structure.sections.push(section);
        }

        Ok(structure)
    }
}

/// Sanitize a display name into a filesystem-safe slug: trim, spaces to
/// hyphens, strip to `[a-z0-9_-]`, collapse hyphen runs, trim hyphens,
/// lowercase. May yield an empty string if nothing survives.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.trim().chars() {
        let ch = if ch == ' ' { '-' } else { ch };
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
            if ch == '-' && out.ends_with('-') {
                continue;
            }
            out.push(ch.to_ascii_lowercase());
        }
    }
    out.trim_matches('-').to_string()
}

/// Lexically resolve `rel` under `root`, refusing any escape.
fn contained_path(root: &Path, rel: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    let mut depth: usize = 0;
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => {
                clean.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return None;
                }
                clean.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if depth == 0 {
        return None;
    }
    Some(root.join(clean))
}

fn is_section_dir(path: &Path) -> bool {
    let name = file_name(path);
    !name.starts_with('.') && !RESERVED_DIRS.contains(&name.as_str())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn collect_doc_refs(dir: &Path, base: &Path, out: &mut Vec<DocumentRef>) -> io::Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            collect_doc_refs(&path, base, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            out.push(DocumentRef {
                name: file_name(&path),
                path: crate::docs::rel_string(&path, base),
            });
        }
    }
    Ok(())
}

fn count_entries(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        count += 1;
        if entry.path().is_dir() {
            count += count_entries(&entry.path())?;
        }
    }
    Ok(count)
}
