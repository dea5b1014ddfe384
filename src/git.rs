//! Version-Control Adapter: wraps the `git` binary, no state of its own.
//!
//! Every invocation is bounded by a timeout; a timed-out or failed spawn
//! becomes a structured failure rather than a fault. Commit treats "nothing
//! to commit" as success so repeated or no-op operations never error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

use crate::models::StatusEntry;

/// Bound on any single git invocation.
const GIT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GitError {
    #[error("{0}")]
    Failed(String),
}

/// The change category of a mutating operation, used for generated commit
/// messages and to pick add vs remove-from-index staging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Create,
    Update,
    Delete,
}

impl ChangeKind {
    fn verb(self) -> &'static str {
        match self {
            ChangeKind::Create => "Add",
            ChangeKind::Update => "Update",
            ChangeKind::Delete => "Delete",
        }
    }
}

/// Outcome of a stage/commit/push sequence.
///
/// `PushFailed` is the partial-success case: the commit exists locally but
/// did not reach the remote. Callers must surface that distinction rather
/// than collapse it into full success or full failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced(String),
    PushFailed(String),
    Failed(String),
}

impl SyncOutcome {
    pub fn message(&self) -> &str {
        match self {
            SyncOutcome::Synced(m) | SyncOutcome::PushFailed(m) | SyncOutcome::Failed(m) => m,
        }
    }

    /// True only when no commit was recorded at all.
    pub fn is_error(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_))
    }

    /// The `git_status` response field: the success narrative, or an explicit
    /// warning when the history sync failed outright.
    pub fn status_line(&self) -> String {
        match self {
            SyncOutcome::Failed(m) => format!("Warning: {m}"),
            other => other.message().to_string(),
        }
    }
}

struct Invocation {
    ok: bool,
    stdout: String,
    stderr: String,
}

#[derive(Debug, Clone)]
pub struct GitRepo {
    root: PathBuf,
    remote: String,
    branch: Option<String>,
}

impl GitRepo {
    pub fn new(root: PathBuf, remote: String, branch: Option<String>) -> Self {
        Self {
            root,
            remote,
            branch,
        }
    }

    pub async fn is_repo(&self) -> bool {
        self.run(&["rev-parse", "--git-dir"]).await.ok
    }

    /// Configured user name and email, each absent when unset.
    pub async fn user_identity(&self) -> (Option<String>, Option<String>) {
        let name = self.run(&["config", "user.name"]).await;
        let email = self.run(&["config", "user.email"]).await;
        let pick = |inv: Invocation| (inv.ok && !inv.stdout.is_empty()).then_some(inv.stdout);
        (pick(name), pick(email))
    }

    /// Stage files for commit. Paths may be absolute (inside the working
    /// tree) or already relative to it.
    pub async fn stage(&self, paths: &[PathBuf]) -> Result<(), GitError> {
        for path in paths {
            let rel = self.rel(path);
            let rel = rel.to_string_lossy();
            let inv = self.run(&["add", rel.as_ref()]).await;
            if !inv.ok {
                return Err(GitError::Failed(format!(
                    "Failed to stage {rel}: {}",
                    inv.stderr
                )));
            }
        }
        Ok(())
    }

    /// Stage a deletion with a remove-from-index operation.
    pub async fn stage_deletion(&self, path: &Path) -> Result<(), GitError> {
        let rel = self.rel(path);
        let rel = rel.to_string_lossy();
        let inv = self.run(&["rm", rel.as_ref()]).await;
        if !inv.ok {
            return Err(GitError::Failed(format!(
                "Failed to stage deletion: {}",
                inv.stderr
            )));
        }
        Ok(())
    }

    /// Stage every change in the working tree.
    pub async fn stage_all(&self) -> Result<(), GitError> {
        let inv = self.run(&["add", "-A"]).await;
        if !inv.ok {
            return Err(GitError::Failed(format!(
                "Failed to stage changes: {}",
                inv.stderr
            )));
        }
        Ok(())
    }

    /// Create a commit. An empty staged diff is success, not failure.
    pub async fn commit(
        &self,
        message: &str,
        author: Option<(&str, &str)>,
    ) -> Result<String, GitError> {
        let inv = match author {
            Some((name, email)) => {
                let author = format!("{name} <{email}>");
                self.run(&["commit", "-m", message, "--author", &author])
                    .await
            }
            None => self.run(&["commit", "-m", message]).await,
        };

        if inv.ok {
            return Ok(format!("Committed: {message}"));
        }
        let nothing_staged = inv.stderr.to_lowercase().contains("nothing to commit")
            || inv.stdout.to_lowercase().contains("nothing to commit");
        if nothing_staged {
            return Ok("No changes to commit".to_string());
        }
        Err(GitError::Failed(format!(
            "Failed to commit: {}",
            inv.stderr
        )))
    }

    /// Push to the configured remote. The branch comes from config, or from
    /// the current checkout when not explicit.
    pub async fn push(&self) -> Result<String, GitError> {
        let branch = match &self.branch {
            Some(branch) => branch.clone(),
            None => {
                let inv = self.run(&["branch", "--show-current"]).await;
                if inv.ok && !inv.stdout.is_empty() {
                    inv.stdout
                } else {
                    "main".to_string()
                }
            }
        };

        let inv = self.run(&["push", &self.remote, &branch]).await;
        if inv.ok {
            Ok(format!("Pushed to {}/{branch}", self.remote))
        } else {
            Err(GitError::Failed(format!("Failed to push: {}", inv.stderr)))
        }
    }

    /// Porcelain status parsed into (status code, filename) pairs.
    pub async fn status(&self) -> Result<Vec<StatusEntry>, GitError> {
        let inv = self.run(&["status", "--porcelain"]).await;
        if !inv.ok {
            return Err(GitError::Failed(inv.stderr));
        }

        let mut entries = Vec::new();
        for line in inv.stdout.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let (Some(status), Some(file)) = (line.get(..2), line.get(3..)) else {
                continue;
            };
            entries.push(StatusEntry {
                status: status.to_string(),
                file: file.trim().to_string(),
            });
        }
        Ok(entries)
    }

    /// Stage the given files, commit, and optionally push.
    ///
    /// The commit message defaults to `docs: <verb> <path>` from the first
    /// file unless a custom message is supplied.
    pub async fn commit_and_push(
        &self,
        files: &[PathBuf],
        change: ChangeKind,
        custom_message: Option<&str>,
        push: bool,
    ) -> SyncOutcome {
        if !self.is_repo().await {
            return SyncOutcome::Failed("Not a git repository".to_string());
        }

        let staged = match change {
            ChangeKind::Delete => match files.first() {
                Some(file) => self.stage_deletion(file).await,
                None => Ok(()),
            },
            _ => self.stage(files).await,
        };
        if let Err(e) = staged {
            return SyncOutcome::Failed(e.to_string());
        }

        let subject = files
            .first()
            .map(|f| self.rel(f).to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        let message = match custom_message {
            Some(custom) => custom.to_string(),
            None => format!("docs: {} {subject}", change.verb()),
        };

        let committed = match self.commit(&message, None).await {
            Ok(m) => m,
            Err(e) => return SyncOutcome::Failed(e.to_string()),
        };

        if !push {
            return SyncOutcome::Synced(committed);
        }
        match self.push().await {
            Ok(pushed) => SyncOutcome::Synced(format!("{committed}. {pushed}")),
            Err(e) => SyncOutcome::PushFailed(format!("{committed}. Push failed: {e}")),
        }
    }

    fn rel(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.to_path_buf())
    }

    async fn run(&self, args: &[&str]) -> Invocation {
        let output = tokio::time::timeout(
            GIT_TIMEOUT,
            Command::new("git")
                .args(args)
                .current_dir(&self.root)
                .kill_on_drop(true)
                .output(),
        )
        .await;

        match output {
            Ok(Ok(output)) => Invocation {
                ok: output.status.success(),
                stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            Ok(Err(e)) => {
                tracing::error!("error running git {}: {e}", args.join(" "));
                Invocation {
                    ok: false,
                    stdout: String::new(),
                    stderr: e.to_string(),
                }
            }
            Err(_) => {
                tracing::error!("git command timed out: git {}", args.join(" "));
                Invocation {
                    ok: false,
                    stdout: String::new(),
                    stderr: "Command timed out".to_string(),
                }
            }
        }
    }
}
