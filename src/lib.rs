//! docforge: backend API for a markdown documentation tree.
//!
//! A web client manages documents, hierarchical sections, and a navigation
//! manifest; every change is auto-committed and pushed to a git remote. The
//! filesystem tree, the YAML manifest, and the git history are three
//! loosely-coupled stores with no transaction across them: each mutating
//! operation runs filesystem, then manifest, then history in sequence and
//! reports how far it got ([`workspace::Workspace`]).

pub mod api;
pub mod config;
pub mod docs;
pub mod git;
pub mod models;
pub mod nav;
pub mod sections;
pub mod workspace;
