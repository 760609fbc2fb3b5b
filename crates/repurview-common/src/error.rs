use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::QuestionId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("Hypothesis not found: {0}")]
    NotFound(Uuid),

    #[error("Unknown hypothesis: {0}")]
    UnknownHypothesis(Uuid),

    #[error("Unknown review request: {0}")]
    UnknownRequest(Uuid),

    #[error("Unknown review question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("Invalid transition: confidence {confidence} is outside 0-100")]
    InvalidTransition { confidence: i32 },

    #[error("Review request must select at least one question")]
    EmptyQuestionSelection,

    #[error("Review request must name a reviewer")]
    MissingReviewer,

    #[error("Incomplete answers: {} selected question(s) unanswered", .missing.len())]
    IncompleteAnswers { missing: Vec<QuestionId> },

    #[error("Review request already completed: {0}")]
    AlreadyCompleted(Uuid),

    #[error("Hypothesis already registered: {0}")]
    DuplicateHypothesis(Uuid),

    #[error("Stale revision for hypothesis {id}: expected {expected}, found {actual}")]
    StaleRevision { id: Uuid, expected: u64, actual: u64 },
}

pub type Result<T> = std::result::Result<T, ReviewError>;

/// Error returned from HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)      => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_)    => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_)      => StatusCode::CONFLICT,
            ApiError::Internal(_)      => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        let msg = err.to_string();
        match err {
            ReviewError::NotFound(_)
            | ReviewError::UnknownHypothesis(_)
            | ReviewError::UnknownRequest(_)
            | ReviewError::UnknownQuestion(_) => ApiError::NotFound(msg),

            ReviewError::InvalidTransition { .. }
            | ReviewError::EmptyQuestionSelection
            | ReviewError::MissingReviewer
            | ReviewError::IncompleteAnswers { .. } => ApiError::Unprocessable(msg),

            ReviewError::AlreadyCompleted(_)
            | ReviewError::DuplicateHypothesis(_) => ApiError::Conflict(msg),

            // the engine retries these; one escaping is a bug
            ReviewError::StaleRevision { .. } => ApiError::Internal(msg),
        }
    }
}

// Extractor rejections keep axum's message but go out in the same JSON shape.

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let msg = rejection.body_text();
        match rejection {
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable(msg),
            _ => ApiError::BadRequest(msg),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
