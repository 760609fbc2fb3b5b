//! Aggregate review statistics.

use axum::{extract::State, Json};
use repurview_review::ReviewSummary;

use crate::state::SharedState;

/// GET /api/report - Summary over every completed review
pub async fn api_report(State(state): State<SharedState>) -> Json<ReviewSummary> {
    Json(state.workflow.report())
}
