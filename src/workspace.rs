//! Sync Orchestrator: drives every mutating operation through the same
//! sequence (filesystem change, then manifest change, then commit+push)
//! and composes a response that reports how far the sync got.
//!
//! There is no transaction across the three stores. A navigation or git
//! failure after a successful filesystem change is logged and surfaced in
//! the response, never rolled back: user content is not discarded because an
//! unrelated subsystem hiccuped. Operations are fully sequential within one
//! request; no lock serializes concurrent requests (last-writer-wins on the
//! manifest).

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::config::Config;
use crate::docs::{extract_title, DocError, DocStore};
use crate::git::{ChangeKind, GitRepo, SyncOutcome};
use crate::models::*;
use crate::nav::{NavError, NavStore};
use crate::sections::{SectionError, SectionStore};

#[derive(Clone)]
pub struct Workspace {
    config: Arc<Config>,
    docs: DocStore,
    sections: SectionStore,
    nav: NavStore,
    git: GitRepo,
}

impl Workspace {
    /// Build a workspace from configuration, creating the docs root if it
    /// does not exist yet.
    pub fn open(config: Config) -> anyhow::Result<Self> {
        std::fs::create_dir_all(&config.docs_dir)?;
        Ok(Self {
            docs: DocStore::new(config.docs_dir.clone()),
            sections: SectionStore::new(config.docs_dir.clone()),
            nav: NavStore::new(config.nav_file.clone()),
            git: GitRepo::new(
                config.repo_root.clone(),
                config.git_remote.clone(),
                config.git_branch.clone(),
            ),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ============================================================
    // Documents
    // ============================================================

    pub fn list_documents(&self) -> Result<Vec<DocumentSummary>, DocError> {
        self.docs.list()
    }

    pub fn get_document(&self, path: &str) -> Result<DocumentInfo, DocError> {
        self.docs.read(path)
    }

    pub async fn create_document(
        &self,
        input: CreateDocumentInput,
    ) -> Result<DocumentInfo, DocError> {
        let (rel, full) = self.docs.create(&input.path, &input.content)?;

        let sync = self
            .sync_file(
                full,
                ChangeKind::Create,
                input.commit_message.as_deref(),
                input.push,
            )
            .await;

        let mut info = DocumentInfo {
            path: rel,
            title: input.title.or_else(|| extract_title(&input.content)),
            content: input.content,
            last_modified: Some(Utc::now()),
            git_status: None,
            git_error: None,
        };
        apply_sync(&mut info.git_status, &mut info.git_error, sync, "created");
        Ok(info)
    }

    pub async fn update_document(
        &self,
        path: &str,
        input: UpdateDocumentInput,
    ) -> Result<DocumentInfo, DocError> {
        let full = self.docs.update(path, &input.content)?;

        let sync = self
            .sync_file(
                full,
                ChangeKind::Update,
                input.commit_message.as_deref(),
                input.push,
            )
            .await;

        let mut info = DocumentInfo {
            path: path.trim_start_matches('/').to_string(),
            title: input.title.or_else(|| extract_title(&input.content)),
            content: input.content,
            last_modified: Some(Utc::now()),
            git_status: None,
            git_error: None,
        };
        apply_sync(&mut info.git_status, &mut info.git_error, sync, "updated");
        Ok(info)
    }

    /// Delete a document. Deletions are always pushed.
    pub async fn delete_document(&self, path: &str) -> Result<DeleteDocumentResponse, DocError> {
        let full = self.docs.delete(path)?;

        let sync = self.sync_file(full, ChangeKind::Delete, None, true).await;

        let mut response = DeleteDocumentResponse {
            message: "Document deleted successfully".to_string(),
            path: path.trim_start_matches('/').to_string(),
            git_status: None,
        };
        let mut git_error = None;
        apply_sync(&mut response.git_status, &mut git_error, sync, "deleted");
        Ok(response)
    }

    pub fn list_directories(&self) -> Result<Vec<DirectoryEntry>, DocError> {
        self.docs.list_directories()
    }

    // ============================================================
    // Sections
    // ============================================================

    pub fn section_structure(&self) -> Result<SectionStructure, SectionError> {
        self.sections.structure()
    }

    pub async fn create_section(
        &self,
        input: CreateSectionInput,
    ) -> Result<SectionResponse, SectionError> {
        let created = self.sections.create_section(&input.name)?;

        let navigation_updated = match self.nav.add_section(&input.name, &created.rel_dir) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("section created but navigation update failed: {e}");
                false
            }
        };

        let message = input
            .commit_message
            .clone()
            .unwrap_or_else(|| format!("docs: Add section '{}'", input.name));
        let sync = self
            .sync_files(
                vec![created.index_file.clone(), self.nav.path().to_path_buf()],
                &message,
                input.push,
            )
            .await;

        let mut response = SectionResponse {
            message: format!("Section '{}' created successfully", created.slug),
            path: created.rel_dir,
            navigation_updated,
            git_status: None,
            git_error: None,
        };
        apply_sync(
            &mut response.git_status,
            &mut response.git_error,
            sync,
            "created",
        );
        Ok(response)
    }

    pub async fn create_subsection(
        &self,
        section: &str,
        input: CreateSectionInput,
    ) -> Result<SectionResponse, SectionError> {
        let created = self.sections.create_subsection(section, &input.name)?;

        let navigation_updated =
            match self
                .nav
                .add_subsection(section, &input.name, &created.rel_dir)
            {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("sub-section created but navigation update failed: {e}");
                    false
                }
            };

        let message = input.commit_message.clone().unwrap_or_else(|| {
            format!("docs: Add subsection '{}' to '{section}'", input.name)
        });
        let sync = self
            .sync_files(
                vec![created.index_file.clone(), self.nav.path().to_path_buf()],
                &message,
                input.push,
            )
            .await;

        let mut response = SectionResponse {
            message: format!("Sub-section '{}' created successfully", created.slug),
            path: created.rel_dir,
            navigation_updated,
            git_status: None,
            git_error: None,
        };
        apply_sync(
            &mut response.git_status,
            &mut response.git_error,
            sync,
            "created",
        );
        Ok(response)
    }

    /// Delete a section or subsection directory, drop its manifest entry, and
    /// commit the whole working-tree delta.
    pub async fn delete_section(&self, path: &str) -> Result<SectionResponse, SectionError> {
        let removed = self.sections.delete_section(path)?;

        let clean = path.trim_matches('/');
        let parts: Vec<&str> = clean.split('/').collect();
        let nav_result = if parts.len() > 1 {
            self.nav.remove_subsection(parts[0], parts[1])
        } else {
            self.nav.remove_section(parts[0])
        };
        let navigation_updated = match nav_result {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!("section deleted but navigation update failed: {e}");
                false
            }
        };

        let sync = if self.git.is_repo().await {
            Some(self.delete_sync(clean).await)
        } else {
            None
        };

        let mut response = SectionResponse {
            message: format!("Section '{clean}' deleted successfully ({removed} files removed)"),
            path: clean.to_string(),
            navigation_updated,
            git_status: None,
            git_error: None,
        };
        apply_sync(
            &mut response.git_status,
            &mut response.git_error,
            sync,
            "deleted",
        );
        Ok(response)
    }

    // ============================================================
    // Navigation
    // ============================================================

    pub fn navigation(&self) -> Result<NavigationResponse, NavError> {
        Ok(NavigationResponse {
            navigation: self.nav.read()?,
            manifest_path: self.nav.path().display().to_string(),
        })
    }

    pub fn manifest_text(&self) -> Result<String, NavError> {
        self.nav.raw_text()
    }

    pub async fn replace_navigation(
        &self,
        input: ReplaceNavigationInput,
    ) -> Result<NavUpdateResponse, NavError> {
        self.nav.replace(&input.navigation)?;

        let message = input
            .commit_message
            .as_deref()
            .unwrap_or("docs: Update navigation structure");
        let sync = self
            .sync_files(vec![self.nav.path().to_path_buf()], message, input.push)
            .await;

        let mut response = NavUpdateResponse {
            message: "Navigation updated successfully".to_string(),
            git_status: None,
            git_error: None,
        };
        apply_sync(
            &mut response.git_status,
            &mut response.git_error,
            sync,
            "updated",
        );
        Ok(response)
    }

    pub fn validate_navigation(&self) -> ValidationReport {
        self.nav.validate(self.docs.root())
    }

    // ============================================================
    // Git
    // ============================================================

    pub async fn git_status(&self) -> GitStatusResponse {
        if !self.git.is_repo().await {
            return GitStatusResponse {
                is_repo: false,
                files: Vec::new(),
                has_changes: false,
                message: Some("Not a git repository".to_string()),
                error: None,
            };
        }

        match self.git.status().await {
            Ok(files) => GitStatusResponse {
                is_repo: true,
                has_changes: !files.is_empty(),
                files,
                message: None,
                error: None,
            },
            Err(e) => GitStatusResponse {
                is_repo: true,
                files: Vec::new(),
                has_changes: false,
                message: None,
                error: Some(e.to_string()),
            },
        }
    }

    async fn sync_file(
        &self,
        file: PathBuf,
        change: ChangeKind,
        custom_message: Option<&str>,
        push: bool,
    ) -> Option<SyncOutcome> {
        if !self.git.is_repo().await {
            return None;
        }
        Some(
            self.git
                .commit_and_push(&[file], change, custom_message, push)
                .await,
        )
    }

    async fn sync_files(
        &self,
        files: Vec<PathBuf>,
        message: &str,
        push: bool,
    ) -> Option<SyncOutcome> {
        if !self.git.is_repo().await {
            return None;
        }
        Some(
            self.git
                .commit_and_push(&files, ChangeKind::Update, Some(message), push)
                .await,
        )
    }

    /// Section deletes stage the whole working-tree delta: the removed files
    /// and the rewritten manifest in one commit.
    async fn delete_sync(&self, path: &str) -> SyncOutcome {
        if let Err(e) = self.git.stage_all().await {
            return SyncOutcome::Failed(e.to_string());
        }
        let committed = match self
            .git
            .commit(&format!("docs: Delete section '{path}'"), None)
            .await
        {
            Ok(m) => m,
            Err(e) => return SyncOutcome::Failed(e.to_string()),
        };
        match self.git.push().await {
            Ok(pushed) => SyncOutcome::Synced(format!("{committed}. {pushed}")),
            Err(e) => SyncOutcome::PushFailed(format!("{committed}. Push failed: {e}")),
        }
    }
}

/// Fold a sync outcome into the response fields. `None` means the docs root
/// is not under version control and the git step was skipped entirely.
fn apply_sync(
    status: &mut Option<String>,
    error: &mut Option<bool>,
    sync: Option<SyncOutcome>,
    action: &str,
) {
    let Some(outcome) = sync else {
        return;
    };
    if outcome.is_error() {
        tracing::warn!("content {action} but git sync failed: {}", outcome.message());
        *error = Some(true);
    } else {
        tracing::info!("git operation: {}", outcome.message());
    }
    *status = Some(outcome.status_line());
}
