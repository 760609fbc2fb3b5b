//! Hypothesis search and detail.

use axum::{extract::State, response::IntoResponse, Json};
use repurview_common::{ApiError, ConfidenceBand, Hypothesis, HypothesisStatus, ReviewRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::extract::{ApiPath, ApiQuery};
use crate::state::SharedState;

#[derive(Deserialize, Default)]
pub struct HypothesisFilter {
    /// Matched against drug name and target disease.
    pub q: Option<String>,
    /// Comma-separated statuses, e.g. `supported,concerns`.
    pub status: Option<String>,
}

// === API Types ===

#[derive(Debug, Serialize)]
pub struct ApiHypothesis {
    #[serde(flatten)]
    pub hypothesis: Hypothesis,
    pub band: ConfidenceBand,
    pub status_label: &'static str,
}

impl From<Hypothesis> for ApiHypothesis {
    fn from(hypothesis: Hypothesis) -> Self {
        Self {
            band: hypothesis.band(),
            status_label: hypothesis.status.label(),
            hypothesis,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiHypothesisDetail {
    #[serde(flatten)]
    pub hypothesis: ApiHypothesis,
    pub reviews: Vec<ReviewRequest>,
}

fn parse_statuses(raw: Option<&str>) -> Result<Vec<HypothesisStatus>, ApiError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<HypothesisStatus>().map_err(ApiError::BadRequest))
        .collect()
}

// === API Endpoints ===

/// GET /api/hypotheses - Search hypotheses
pub async fn api_hypotheses(
    State(state): State<SharedState>,
    ApiQuery(filter): ApiQuery<HypothesisFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let statuses = parse_statuses(filter.status.as_deref())?;
    let term = filter.q.as_deref().unwrap_or("");

    let rows: Vec<ApiHypothesis> = state
        .workflow
        .store
        .search(term, &statuses)
        .into_iter()
        .map(ApiHypothesis::from)
        .collect();

    Ok(Json(rows))
}

/// GET /api/hypotheses/{id} - One hypothesis with its review history
pub async fn api_hypothesis_detail(
    State(state): State<SharedState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let hypothesis = state.workflow.store.get(id)?;
    let reviews = state.workflow.requests.list_for_hypothesis(id);

    Ok(Json(ApiHypothesisDetail {
        hypothesis: hypothesis.into(),
        reviews,
    }))
}
