mod handlers;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::workspace::Workspace;

pub fn create_router(workspace: Workspace) -> Router {
    let cors = cors_layer(workspace.config().cors_origins.as_deref());

    // matchit (axum's router) rejects "/sections/{*path}" alongside
    // "/sections/{section}/subsections" in the same route tree, so the
    // wildcard delete lives in a fallback router that is consulted only
    // when no other /api path matches.
    let section_delete = Router::new()
        .route("/sections/{*path}", delete(handlers::delete_section))
        .with_state(workspace.clone());

    let api = Router::new()
        // Documents
        .route(
            "/documents",
            get(handlers::list_documents).post(handlers::create_document),
        )
        .route(
            "/documents/{*path}",
            get(handlers::get_document)
                .put(handlers::update_document)
                .delete(handlers::delete_document),
        )
        .route("/directories", get(handlers::list_directories))
        // Manifest and git
        .route("/manifest", get(handlers::get_manifest))
        .route("/git/status", get(handlers::get_git_status))
        // Sections
        .route(
            "/sections",
            get(handlers::list_sections).post(handlers::create_section),
        )
        .route(
            "/sections/{section}/subsections",
            post(handlers::create_subsection),
        )
        // Navigation
        .route(
            "/navigation",
            get(handlers::get_navigation).put(handlers::replace_navigation),
        )
        .route("/navigation/validate", get(handlers::validate_navigation))
        .fallback_service(section_delete);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(workspace)
}

/// Permissive CORS unless origins are configured explicitly.
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        None => CorsLayer::permissive(),
        Some(list) => {
            let parsed: Vec<HeaderValue> = list.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
