use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::docs::DocError;
use crate::models::*;
use crate::nav::NavError;
use crate::sections::SectionError;
use crate::workspace::Workspace;

// ============================================================
// Error Handling
// ============================================================

/// Map a document store error to a client-facing status. Validation,
/// conflict, not-found and security errors carry their own message; IO
/// failures are logged server-side and sanitized.
fn doc_error(e: DocError) -> (StatusCode, String) {
    let status = match &e {
        DocError::AccessDenied => StatusCode::FORBIDDEN,
        DocError::NotFound => StatusCode::NOT_FOUND,
        DocError::AlreadyExists => StatusCode::CONFLICT,
        DocError::NotMarkdown => StatusCode::BAD_REQUEST,
        DocError::Io(io) => {
            tracing::error!("document store error: {io}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };
    (status, e.to_string())
}

/// Section failures are all rejected before any mutation; they surface as
/// bad requests with the failure detail, except raw IO errors.
fn section_error(e: SectionError) -> (StatusCode, String) {
    match &e {
        SectionError::Io(io) => {
            tracing::error!("section store error: {io}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
        _ => (StatusCode::BAD_REQUEST, e.to_string()),
    }
}

fn nav_error(e: NavError) -> (StatusCode, String) {
    match &e {
        NavError::Missing => (StatusCode::NOT_FOUND, e.to_string()),
        NavError::DuplicateSection(_)
        | NavError::DuplicateSubsection(_)
        | NavError::ParentNotFound(_) => (StatusCode::BAD_REQUEST, e.to_string()),
        NavError::Malformed | NavError::Yaml(_) | NavError::Io(_) => {
            tracing::error!("navigation store error: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update navigation".to_string(),
            )
        }
    }
}

// ============================================================
// Service info
// ============================================================

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "docforge documentation editor API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Backend API for editing and creating documentation",
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Documents
// ============================================================

pub async fn list_documents(
    State(ws): State<Workspace>,
) -> Result<Json<Vec<DocumentSummary>>, (StatusCode, String)> {
    ws.list_documents().map(Json).map_err(doc_error)
}

pub async fn get_document(
    State(ws): State<Workspace>,
    Path(path): Path<String>,
) -> Result<Json<DocumentInfo>, (StatusCode, String)> {
    ws.get_document(&path).map(Json).map_err(doc_error)
}

pub async fn create_document(
    State(ws): State<Workspace>,
    Json(input): Json<CreateDocumentInput>,
) -> Result<(StatusCode, Json<DocumentInfo>), (StatusCode, String)> {
    ws.create_document(input)
        .await
        .map(|d| (StatusCode::CREATED, Json(d)))
        .map_err(doc_error)
}

pub async fn update_document(
    State(ws): State<Workspace>,
    Path(path): Path<String>,
    Json(input): Json<UpdateDocumentInput>,
) -> Result<Json<DocumentInfo>, (StatusCode, String)> {
    ws.update_document(&path, input)
        .await
        .map(Json)
        .map_err(doc_error)
}

pub async fn delete_document(
    State(ws): State<Workspace>,
    Path(path): Path<String>,
) -> Result<Json<DeleteDocumentResponse>, (StatusCode, String)> {
    ws.delete_document(&path).await.map(Json).map_err(doc_error)
}

pub async fn list_directories(
    State(ws): State<Workspace>,
) -> Result<Json<Vec<DirectoryEntry>>, (StatusCode, String)> {
    ws.list_directories().map(Json).map_err(doc_error)
}

// ============================================================
// Manifest and git
// ============================================================

pub async fn get_manifest(
    State(ws): State<Workspace>,
) -> Result<Json<ManifestResponse>, (StatusCode, String)> {
    ws.manifest_text()
        .map(|content| Json(ManifestResponse { content }))
        .map_err(nav_error)
}

pub async fn get_git_status(State(ws): State<Workspace>) -> Json<GitStatusResponse> {
    Json(ws.git_status().await)
}

// ============================================================
// Sections
// ============================================================

pub async fn list_sections(
    State(ws): State<Workspace>,
) -> Result<Json<SectionStructure>, (StatusCode, String)> {
    ws.section_structure().map(Json).map_err(section_error)
}

pub async fn create_section(
    State(ws): State<Workspace>,
    Json(input): Json<CreateSectionInput>,
) -> Result<(StatusCode, Json<SectionResponse>), (StatusCode, String)> {
    ws.create_section(input)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
        .map_err(section_error)
}

pub async fn create_subsection(
    State(ws): State<Workspace>,
    Path(section): Path<String>,
    Json(input): Json<CreateSectionInput>,
) -> Result<(StatusCode, Json<SectionResponse>), (StatusCode, String)> {
    ws.create_subsection(&section, input)
        .await
        .map(|r| (StatusCode::CREATED, Json(r)))
        .map_err(section_error)
}

pub async fn delete_section(
    State(ws): State<Workspace>,
    Path(path): Path<String>,
) -> Result<Json<SectionResponse>, (StatusCode, String)> {
    ws.delete_section(&path).await.map(Json).map_err(section_error)
}

// ============================================================
// Navigation
// ============================================================

pub async fn get_navigation(
    State(ws): State<Workspace>,
) -> Result<Json<NavigationResponse>, (StatusCode, String)> {
    ws.navigation().map(Json).map_err(nav_error)
}

pub async fn replace_navigation(
    State(ws): State<Workspace>,
    Json(input): Json<ReplaceNavigationInput>,
) -> Result<Json<NavUpdateResponse>, (StatusCode, String)> {
    ws.replace_navigation(input).await.map(Json).map_err(nav_error)
}

pub async fn validate_navigation(State(ws): State<Workspace>) -> Json<ValidationReport> {
    Json(ws.validate_navigation())
}
