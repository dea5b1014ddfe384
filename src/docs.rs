//! Document store: markdown files under a configured root.
//!
//! Every path coming in from the API is resolved through [`DocStore::resolve`],
//! which rejects anything escaping the root before looking at existence.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{DirectoryEntry, DocumentInfo, DocumentSummary};

#[derive(Debug, Error)]
pub enum DocError {
    #[error("Access denied")]
    AccessDenied,
    #[error("Document not found")]
    NotFound,
    #[error("Document already exists")]
    AlreadyExists,
    #[error("Only markdown files are supported")]
    NotMarkdown,
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct DocStore {
    root: PathBuf,
}

impl DocStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a root-relative path, rejecting anything that escapes the root.
    ///
    /// The check is lexical: absolute paths and `..` components that would
    /// climb above the root are refused. It runs before any existence check,
    /// so create targets are covered too.
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, DocError> {
        let trimmed = raw.trim_start_matches('/');
        let mut clean = PathBuf::new();
        let mut depth: usize = 0;

        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => {
                    clean.push(part);
                    depth += 1;
                }
                Component::CurDir => {}
                Component::ParentDir => {
                    if depth == 0 {
                        return Err(DocError::AccessDenied);
                    }
                    clean.pop();
                    depth -= 1;
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DocError::AccessDenied);
                }
            }
        }

        if depth == 0 {
            return Err(DocError::AccessDenied);
        }
        Ok(self.root.join(clean))
    }

    /// All markdown documents under the root, sorted by path.
    pub fn list(&self) -> Result<Vec<DocumentSummary>, DocError> {
        let mut files = Vec::new();
        if self.root.exists() {
            collect_markdown(&self.root, &mut files)?;
        }

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            let meta = fs::metadata(&file)?;
            let rel = rel_string(&file, &self.root);
            let directory = Path::new(&rel)
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            documents.push(DocumentSummary {
                name: file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: rel,
                directory: if directory.is_empty() {
                    ".".to_string()
                } else {
                    directory
                },
                size: meta.len(),
                last_modified: modified_at(&meta),
            });
        }
        documents.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(documents)
    }

    pub fn read(&self, raw: &str) -> Result<DocumentInfo, DocError> {
        let full = self.resolve(raw)?;
        if !full.exists() {
            return Err(DocError::NotFound);
        }
        if full.extension().and_then(|e| e.to_str()) != Some("md") {
            return Err(DocError::NotMarkdown);
        }

        let content = fs::read_to_string(&full)?;
        let meta = fs::metadata(&full)?;
        Ok(DocumentInfo {
            path: rel_string(&full, &self.root),
            title: extract_title(&content),
            content,
            last_modified: modified_at(&meta),
            git_status: None,
            git_error: None,
        })
    }

    /// Write a new document, creating parent directories as needed.
    /// Returns the final root-relative path and the absolute path.
    pub fn create(&self, raw: &str, content: &str) -> Result<(String, PathBuf), DocError> {
        let mut full = self.resolve(raw)?;
        if full.extension().and_then(|e| e.to_str()) != Some("md") {
            full.set_extension("md");
        }

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        if full.exists() {
            return Err(DocError::AlreadyExists);
        }

        fs::write(&full, content)?;
        Ok((rel_string(&full, &self.root), full))
    }

    pub fn update(&self, raw: &str, content: &str) -> Result<PathBuf, DocError> {
        let full = self.resolve(raw)?;
        if !full.exists() {
            return Err(DocError::NotFound);
        }
        fs::write(&full, content)?;
        Ok(full)
    }

    pub fn delete(&self, raw: &str) -> Result<PathBuf, DocError> {
        let full = self.resolve(raw)?;
        if !full.exists() {
            return Err(DocError::NotFound);
        }
        fs::remove_file(&full)?;
        Ok(full)
    }

    /// All non-hidden directories under the root, sorted by path.
    pub fn list_directories(&self) -> Result<Vec<DirectoryEntry>, DocError> {
        let mut dirs = Vec::new();
        if self.root.exists() {
            collect_directories(&self.root, &mut dirs)?;
        }

        let mut entries: Vec<DirectoryEntry> = dirs
            .into_iter()
            .map(|dir| DirectoryEntry {
                path: rel_string(&dir, &self.root),
                name: dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            })
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

/// First heading line of the content, stripped of leading hashes.
pub fn extract_title(content: &str) -> Option<String> {
    if !content.starts_with('#') {
        return None;
    }
    content
        .lines()
        .next()
        .map(|line| line.trim_start_matches('#').trim().to_string())
}

pub(crate) fn rel_string(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

pub(crate) fn modified_at(meta: &fs::Metadata) -> Option<DateTime<Utc>> {
    meta.modified().ok().map(DateTime::<Utc>::from)
}

fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_markdown(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("md") {
            out.push(path);
        }
    }
    Ok(())
}

fn collect_directories(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if hidden {
            continue;
        }
        out.push(path.clone());
        collect_directories(&path, out)?;
    }
    Ok(())
}
