//! Service configuration.
//!
//! Roots and git settings are resolved once into an explicit [`Config`] that
//! is passed to each component at construction; there is no process-global
//! state.

use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base directory containing all documents.
    pub docs_dir: PathBuf,
    /// The navigation manifest file.
    pub nav_file: PathBuf,
    /// Root of the git working tree the docs live in.
    pub repo_root: PathBuf,
    /// Remote to push to.
    pub git_remote: String,
    /// Branch to push. `None` resolves the current branch at push time.
    pub git_branch: Option<String>,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. `None` means permissive.
    pub cors_origins: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from `DOCFORGE_*` environment variables.
    ///
    /// Defaults: docs under `./docs`, repo root its parent, manifest at
    /// `<repo_root>/nav.yml`, remote `origin`, branch resolved dynamically.
    pub fn from_env() -> Self {
        let docs_dir = env::var("DOCFORGE_DOCS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("docs"));

        let repo_root = env::var("DOCFORGE_REPO_ROOT")
            .map(PathBuf::from)
            .ok()
            .or_else(|| docs_dir.parent().map(Path::to_path_buf))
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| PathBuf::from("."));

        let nav_file = env::var("DOCFORGE_NAV_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| repo_root.join("nav.yml"));

        let port = env::var("DOCFORGE_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8001);

        let cors_origins = env::var("DOCFORGE_CORS_ORIGINS")
            .ok()
            .filter(|s| s != "*")
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect());

        Self {
            docs_dir,
            nav_file,
            repo_root,
            git_remote: env::var("DOCFORGE_GIT_REMOTE").unwrap_or_else(|_| "origin".to_string()),
            git_branch: env::var("DOCFORGE_GIT_BRANCH").ok(),
            host: env::var("DOCFORGE_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port,
            cors_origins,
        }
    }

    /// Configuration with everything rooted under `root` (for tests).
    pub fn for_root(root: &Path) -> Self {
        Self {
            docs_dir: root.join("docs"),
            nav_file: root.join("nav.yml"),
            repo_root: root.to_path_buf(),
            git_remote: "origin".to_string(),
            git_branch: None,
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: None,
        }
    }
}
