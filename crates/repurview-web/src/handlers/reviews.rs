//! Contextual review requests: open, list, fetch, submit.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use repurview_common::{Answer, ApiError, QuestionId, ReviewRequest, ReviewerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::{AppState, SharedState};

#[derive(Debug, Deserialize)]
pub struct OpenReviewBody {
    pub hypothesis_id: Uuid,
    pub reviewer_id: ReviewerId,
    #[serde(default)]
    pub question_ids: Vec<QuestionId>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitReviewBody {
    #[serde(default)]
    pub answers: HashMap<QuestionId, Answer>,
    pub comment: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct PendingFilter {
    /// Target disease; `all` or empty means no filter.
    pub disease: Option<String>,
}

impl PendingFilter {
    fn disease(&self) -> Option<&str> {
        self.disease
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty() && !d.eq_ignore_ascii_case("all"))
    }
}

// === API Types ===

/// A request joined with what a reviewer needs to see in a queue.
#[derive(Debug, Serialize)]
pub struct ApiReview {
    #[serde(flatten)]
    pub request: ReviewRequest,
    pub drug_name: Option<String>,
    pub target_disease: Option<String>,
    pub current_confidence: Option<u8>,
    pub reviewer_name: Option<String>,
}

impl ApiReview {
    fn build(state: &AppState, request: ReviewRequest) -> Self {
        let hypothesis = state.workflow.store.get(request.hypothesis_id).ok();
        let reviewer_name = state
            .clinicians
            .iter()
            .find(|c| c.id == request.reviewer_id)
            .map(|c| c.name.clone());
        Self {
            drug_name: hypothesis.as_ref().map(|h| h.drug_name.clone()),
            target_disease: hypothesis.as_ref().map(|h| h.target_disease.clone()),
            current_confidence: hypothesis.as_ref().map(|h| h.confidence),
            reviewer_name,
            request,
        }
    }
}

// === API Endpoints ===

/// POST /api/reviews - Open a contextual review request
pub async fn api_open_review(
    State(state): State<SharedState>,
    ApiJson(body): ApiJson<OpenReviewBody>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state
        .workflow
        .requests
        .open(body.hypothesis_id, body.reviewer_id, body.question_ids)?;
    Ok((StatusCode::CREATED, Json(ApiReview::build(&state, request))))
}

/// GET /api/reviews/pending - Pending requests, newest first
pub async fn api_pending_reviews(
    State(state): State<SharedState>,
    ApiQuery(filter): ApiQuery<PendingFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .workflow
        .requests
        .list_pending(filter.disease())
        .into_iter()
        .map(|r| ApiReview::build(&state, r))
        .collect::<Vec<_>>();
    Ok(Json(rows))
}

/// GET /api/reviews/{id} - One request
pub async fn api_review_detail(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = state.workflow.requests.get(id)?;
    Ok(Json(ApiReview::build(&state, request)))
}

/// POST /api/reviews/{id}/submit - Submit the complete answer set
pub async fn api_submit_review(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<SubmitReviewBody>,
) -> Result<impl IntoResponse, ApiError> {
    let closed = state.workflow.engine.submit(id, body.answers, body.comment)?;
    Ok(Json(ApiReview::build(&state, closed)))
}
