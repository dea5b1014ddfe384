//! Domain models for docforge.
//!
//! # Core Concepts
//!
//! ## The three stores
//!
//! - Documents live as markdown files under the configured docs root and are
//!   addressed by root-relative, forward-slash paths ([`DocumentInfo`]).
//! - [`Section`]s and [`Subsection`]s are one and two levels of directory
//!   nesting under the root, each with a generated `index.md`.
//! - The navigation manifest mirrors the directory tree as an ordered list of
//!   [`NavEntry`] values, best-effort: tree and manifest are updated
//!   independently, with no transaction across them.
//!
//! ## Degraded sync
//!
//! Mutating responses carry `navigation_updated` and `git_status`/`git_error`
//! fields so a caller can always tell "fully synced" apart from "content
//! written, history sync degraded".

mod document;
mod git_status;
mod navigation;
mod section;

pub use document::*;
pub use git_status::*;
pub use navigation::*;
pub use section::*;

pub(crate) fn default_push() -> bool {
    true
}
