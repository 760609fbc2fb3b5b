//! Read-only catalogs: review questions, clinicians and disease context.

use axum::{extract::State, response::IntoResponse, Json};
use repurview_common::{ApiError, Clinician, DiseaseContext, ReviewQuestion};

use crate::extract::ApiPath;
use crate::state::SharedState;

/// GET /api/questions - The review question catalog, in order
pub async fn api_questions(State(state): State<SharedState>) -> Json<Vec<ReviewQuestion>> {
    Json(state.workflow.catalog.list().to_vec())
}

/// GET /api/clinicians - Reviewers that can be asked for a contextual review
pub async fn api_clinicians(State(state): State<SharedState>) -> Json<Vec<Clinician>> {
    Json(state.clinicians.clone())
}

/// GET /api/diseases - Diseases the workspace can focus on, in selector order
pub async fn api_diseases(State(state): State<SharedState>) -> Json<Vec<DiseaseContext>> {
    Json(state.diseases.list().to_vec())
}

/// GET /api/diseases/{key} - Background for one disease
pub async fn api_disease_detail(
    State(state): State<SharedState>,
    ApiPath(key): ApiPath<String>,
) -> Result<impl IntoResponse, ApiError> {
    let disease = state
        .diseases
        .get(&key)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("Unknown disease: {key}")))?;
    Ok(Json(disease))
}
