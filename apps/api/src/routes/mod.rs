pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::resume::handlers as resume;
use crate::state::AppState;

/// Headroom for multipart framing and text fields around the resume file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Matching API
        .route(
            "/api/v1/match",
            get(matching::handle_list_matches).post(matching::handle_match),
        )
        .route("/api/v1/match/upload", post(matching::handle_match_upload))
        .route("/api/v1/match/:id", get(matching::handle_get_match))
        // Resume API
        .route("/api/v1/resumes/extract", post(resume::handle_extract))
        .route("/api/v1/resumes/structure", post(resume::handle_structure))
        .route("/api/v1/resumes/latex", post(resume::handle_latex))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
