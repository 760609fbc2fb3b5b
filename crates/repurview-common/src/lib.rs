//! repurview-common: Shared types, errors, and scoring rules used across all Repurview crates.

pub mod error;
pub mod entities;
pub mod confidence;

// Re-export commonly used types
pub use confidence::ScoringRules;
pub use entities::{
    Answer, AnswerSet, AnswerTally, Clinician, Completion, ConfidenceBand, DiseaseContext,
    EvidenceSource, Hypothesis, HypothesisStatus, OutcomeSnapshot, QuestionId, RequestStatus,
    ReviewQuestion, ReviewRequest, ReviewerId,
};
pub use error::{ApiError, Result, ReviewError};
