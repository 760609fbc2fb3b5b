//! Axum router: maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    catalog::{api_clinicians, api_disease_detail, api_diseases, api_questions},
    hypotheses::{api_hypotheses, api_hypothesis_detail},
    report::api_report,
    reviews::{api_open_review, api_pending_reviews, api_review_detail, api_submit_review},
};
use crate::sse::sse_handler;
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        // SSE streaming
        .route("/api/events", get(sse_handler))

        // API endpoints
        .route("/api/hypotheses",            get(api_hypotheses))
        .route("/api/hypotheses/{id}",       get(api_hypothesis_detail))
        .route("/api/questions",             get(api_questions))
        .route("/api/clinicians",            get(api_clinicians))
        .route("/api/diseases",              get(api_diseases))
        .route("/api/diseases/{key}",        get(api_disease_detail))
        .route("/api/reviews",               post(api_open_review))
        .route("/api/reviews/pending",       get(api_pending_reviews))
        .route("/api/reviews/{id}",          get(api_review_detail))
        .route("/api/reviews/{id}/submit",   post(api_submit_review))
        .route("/api/report",                get(api_report))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
