//! Navigation Store: the ordered manifest mirrored against the docs tree.
//!
//! The manifest is a YAML mapping whose `nav` key holds the entry list. Every
//! mutation rewrites the whole file; key order is preserved as authored (the
//! YAML mapping keeps insertion order), other top-level keys pass through
//! untouched, and unicode is written as-is.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::models::{NavEntry, ValidationReport};

const NAV_KEY: &str = "nav";

#[derive(Debug, Error)]
pub enum NavError {
    #[error("navigation manifest not found")]
    Missing,
    #[error("manifest root must be a mapping")]
    Malformed,
    #[error("Section '{0}' already in navigation")]
    DuplicateSection(String),
    #[error("Sub-section '{0}' already in navigation")]
    DuplicateSubsection(String),
    #[error("Parent section '{0}' not found in navigation")]
    ParentNotFound(String),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct NavStore {
    path: PathBuf,
}

impl NavStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw manifest text, for the bulk-edit UI.
    pub fn raw_text(&self) -> Result<String, NavError> {
        if !self.path.exists() {
            return Err(NavError::Missing);
        }
        Ok(fs::read_to_string(&self.path)?)
    }

    /// The ordered entry list. A missing manifest or missing `nav` key reads
    /// as empty.
    pub fn read(&self) -> Result<Vec<NavEntry>, NavError> {
        let doc = self.load()?;
        Self::entries_of(&doc)
    }

    /// Append a top-level entry `{name: "<dir>/index.md"}`.
    pub fn add_section(&self, name: &str, rel_dir: &str) -> Result<(), NavError> {
        let doc = self.load()?;
        let mut entries = Self::entries_of(&doc)?;

        if entries.iter().any(|e| e.name() == Some(name)) {
            return Err(NavError::DuplicateSection(name.to_string()));
        }

        entries.push(NavEntry::Leaf {
            name: name.to_string(),
            target: format!("{rel_dir}/index.md"),
        });
        self.store(doc, &entries)
    }

    /// Append a child entry under the named parent.
    ///
    /// A parent currently holding a bare reference is first promoted to a
    /// branch whose first child is an "Overview" entry pointing at the
    /// original reference, so the former root document stays reachable.
    pub fn add_subsection(&self, parent: &str, name: &str, rel_dir: &str) -> Result<(), NavError> {
        let doc = self.load()?;
        let mut entries = Self::entries_of(&doc)?;

        let Some(pos) = entries.iter().position(|e| e.name() == Some(parent)) else {
            return Err(NavError::ParentNotFound(parent.to_string()));
        };

        if let NavEntry::Leaf { name, target } = &entries[pos] {
            entries[pos] = NavEntry::Branch {
                name: name.clone(),
                children: vec![NavEntry::Leaf {
                    name: "Overview".to_string(),
                    target: target.clone(),
                }],
            };
        }
        let NavEntry::Branch { children, .. } = &mut entries[pos] else {
            return Err(NavError::ParentNotFound(parent.to_string()));
        };

        if children.iter().any(|c| c.name() == Some(name)) {
            return Err(NavError::DuplicateSubsection(name.to_string()));
        }

        children.push(NavEntry::Leaf {
            name: name.to_string(),
            target: format!("{rel_dir}/index.md"),
        });
        self.store(doc, &entries)
    }

    /// Filter out the named top-level entry. Returns `false` only when the
    /// manifest has no `nav` key at all; removing an already-absent entry is
    /// a no-op reported as `true`.
    pub fn remove_section(&self, name: &str) -> Result<bool, NavError> {
        let doc = self.load()?;
        if doc.get(&Value::from(NAV_KEY)).is_none() {
            return Ok(false);
        }
        let mut entries = Self::entries_of(&doc)?;
        entries.retain(|e| e.name() != Some(name));
        self.store(doc, &entries)?;
        Ok(true)
    }

    /// Filter out a child entry under the named parent. Returns `false` when
    /// the parent is not found.
    pub fn remove_subsection(&self, parent: &str, name: &str) -> Result<bool, NavError> {
        let doc = self.load()?;
        if doc.get(&Value::from(NAV_KEY)).is_none() {
            return Ok(false);
        }
        let mut entries = Self::entries_of(&doc)?;

        let Some(pos) = entries.iter().position(|e| e.name() == Some(parent)) else {
            return Ok(false);
        };
        if let NavEntry::Branch { children, .. } = &mut entries[pos] {
            children.retain(|c| c.name() != Some(name));
        }
        self.store(doc, &entries)?;
        Ok(true)
    }

    /// Overwrite the whole entry list. The caller is responsible for its
    /// internal validity.
    pub fn replace(&self, entries: &[NavEntry]) -> Result<(), NavError> {
        let doc = self.load()?;
        self.store(doc, entries)
    }

    /// Walk the manifest and flag every reference that does not resolve to a
    /// file under `docs_root`. Named entries with missing targets are hard
    /// errors (and listed in `orphaned`); bare references only warn.
    pub fn validate(&self, docs_root: &Path) -> ValidationReport {
        let mut report = ValidationReport::default();

        let entries = match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                report.valid = false;
                report.errors.push(format!("Validation error: {e}"));
                return report;
            }
        };

        for entry in &entries {
            validate_entry(entry, docs_root, &mut report);
        }
        report
    }

    fn load(&self) -> Result<Mapping, NavError> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(Mapping::new());
        }
        match serde_yaml::from_str::<Value>(&text)? {
            Value::Mapping(doc) => Ok(doc),
            _ => Err(NavError::Malformed),
        }
    }

    fn entries_of(doc: &Mapping) -> Result<Vec<NavEntry>, NavError> {
        match doc.get(&Value::from(NAV_KEY)) {
            Some(value) => Ok(serde_yaml::from_value(value.clone())?),
            None => Ok(Vec::new()),
        }
    }

    /// Rewrite the manifest with the given entry list, keeping every other
    /// top-level key in its authored position.
    fn store(&self, mut doc: Mapping, entries: &[NavEntry]) -> Result<(), NavError> {
        doc.insert(Value::from(NAV_KEY), serde_yaml::to_value(entries)?);
        let text = serde_yaml::to_string(&Value::Mapping(doc))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

fn validate_entry(entry: &NavEntry, docs_root: &Path, report: &mut ValidationReport) {
    match entry {
        NavEntry::Doc(target) => {
            if !docs_root.join(target).exists() {
                report.warnings.push(format!("File not found: {target}"));
            }
        }
        NavEntry::Leaf { name, target } => {
            if !docs_root.join(target).exists() {
                report.valid = false;
                report.errors.push(format!(
                    "Navigation item '{name}' points to non-existent file: {target}"
                ));
                report.orphaned.push(target.clone());
            }
        }
        NavEntry::Branch { children, .. } => {
            for child in children {
                validate_entry(child, docs_root, report);
            }
        }
    }
}
