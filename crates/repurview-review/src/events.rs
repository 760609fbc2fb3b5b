//! Events published by the request manager and submission engine.

use chrono::{DateTime, Utc};
use repurview_common::{OutcomeSnapshot, ReviewRequest, ReviewerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReviewEvent {
    /// A contextual review was requested.
    RequestOpened {
        request_id: Uuid,
        hypothesis_id: Uuid,
        reviewer_id: ReviewerId,
        requested_at: DateTime<Utc>,
    },
    /// A request was closed and the hypothesis outcome rewritten.
    ReviewCompleted {
        request_id: Uuid,
        hypothesis_id: Uuid,
        before: OutcomeSnapshot,
        after: OutcomeSnapshot,
        completed_at: DateTime<Utc>,
    },
}

impl ReviewEvent {
    pub fn opened(request: &ReviewRequest) -> Self {
        ReviewEvent::RequestOpened {
            request_id: request.id,
            hypothesis_id: request.hypothesis_id,
            reviewer_id: request.reviewer_id.clone(),
            requested_at: request.requested_at,
        }
    }

    /// `None` for a request that is still pending.
    pub fn completed(request: &ReviewRequest) -> Option<Self> {
        request.completion.as_ref().map(|c| ReviewEvent::ReviewCompleted {
            request_id: request.id,
            hypothesis_id: request.hypothesis_id,
            before: request.baseline,
            after: c.outcome,
            completed_at: c.completed_at,
        })
    }

    pub fn request_id(&self) -> Uuid {
        match self {
            ReviewEvent::RequestOpened { request_id, .. }
            | ReviewEvent::ReviewCompleted { request_id, .. } => *request_id,
        }
    }
}
