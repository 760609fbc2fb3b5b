/// Core entity types for the contextual-review workflow.
/// Hypotheses arrive from the upstream generator; review requests and
/// answer sets are produced by the review crate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, ReviewError};

// ---------------------------------------------------------------------------
// Hypothesis
// ---------------------------------------------------------------------------

/// Where the evidence behind a hypothesis was mined from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceSource {
    Literature,
    Trial,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HypothesisStatus {
    Awaiting,
    Supported,
    Concerns,
}

impl HypothesisStatus {
    pub const ALL: [HypothesisStatus; 3] = [
        HypothesisStatus::Awaiting,
        HypothesisStatus::Supported,
        HypothesisStatus::Concerns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HypothesisStatus::Awaiting  => "awaiting",
            HypothesisStatus::Supported => "supported",
            HypothesisStatus::Concerns  => "concerns",
        }
    }

    /// Human-readable badge text.
    pub fn label(&self) -> &'static str {
        match self {
            HypothesisStatus::Awaiting  => "Awaiting validation",
            HypothesisStatus::Supported => "Clinically supported",
            HypothesisStatus::Concerns  => "Feasibility concerns",
        }
    }
}

impl fmt::Display for HypothesisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HypothesisStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "awaiting"  => Ok(HypothesisStatus::Awaiting),
            "supported" => Ok(HypothesisStatus::Supported),
            "concerns"  => Ok(HypothesisStatus::Concerns),
            other       => Err(format!("unknown hypothesis status: {other}")),
        }
    }
}

/// Coarse grouping of a 0–100 confidence score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence >= 70 {
            ConfidenceBand::High
        } else if confidence >= 50 {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

/// An AI-suggested drug/disease repurposing candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hypothesis {
    pub id: Uuid,
    pub drug_name: String,
    pub target_disease: String,
    pub source: EvidenceSource,
    pub confidence: u8,
    pub status: HypothesisStatus,
    pub mechanism: String,
    pub paper_count: u32,
    /// Bumped by the store on every outcome update.
    #[serde(default)]
    pub revision: u64,
}

impl Hypothesis {
    /// A freshly generated hypothesis, awaiting review.
    pub fn new(
        drug_name: impl Into<String>,
        target_disease: impl Into<String>,
        source: EvidenceSource,
        confidence: u8,
        mechanism: impl Into<String>,
        paper_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            drug_name: drug_name.into(),
            target_disease: target_disease.into(),
            source,
            confidence,
            status: HypothesisStatus::Awaiting,
            mechanism: mechanism.into(),
            paper_count,
            revision: 0,
        }
    }

    pub fn with_status(mut self, status: HypothesisStatus) -> Self {
        self.status = status;
        self
    }

    pub fn outcome(&self) -> OutcomeSnapshot {
        OutcomeSnapshot { status: self.status, confidence: self.confidence }
    }

    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::from_confidence(self.confidence)
    }

    pub fn targets_disease(&self, disease: &str) -> bool {
        self.target_disease.trim().to_lowercase() == disease.trim().to_lowercase()
    }
}

/// The mutable part of a hypothesis as seen at one point in time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeSnapshot {
    pub status: HypothesisStatus,
    pub confidence: u8,
}

// ---------------------------------------------------------------------------
// Questions & reviewers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for QuestionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewQuestion {
    pub id: QuestionId,
    pub text: String,
}

impl ReviewQuestion {
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// Identifier from the external clinician registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct ReviewerId(String);

impl ReviewerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReviewerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ReviewerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Display identity resolved from the clinician registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Clinician {
    pub id: ReviewerId,
    pub name: String,
    pub specialty: String,
}

/// Epidemiological background shown next to hypotheses for one disease.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiseaseContext {
    /// Lowercase selector key, e.g. `dengue`.
    pub key: String,
    /// Short selector label.
    pub label: String,
    pub name: String,
    pub region: String,
    /// Unmet clinical need that motivates repurposing.
    pub challenge: String,
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Answer {
    Yes,
    No,
    Unsure,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerTally {
    pub yes: u32,
    pub no: u32,
    pub unsure: u32,
}

impl AnswerTally {
    pub fn record(&mut self, answer: Answer) {
        match answer {
            Answer::Yes    => self.yes += 1,
            Answer::No     => self.no += 1,
            Answer::Unsure => self.unsure += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.yes.saturating_add(self.no).saturating_add(self.unsure)
    }
}

impl<'a> FromIterator<&'a Answer> for AnswerTally {
    fn from_iter<I: IntoIterator<Item = &'a Answer>>(iter: I) -> Self {
        let mut tally = AnswerTally::default();
        for answer in iter {
            tally.record(*answer);
        }
        tally
    }
}

/// A reviewer's complete set of responses, one per selected question.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnswerSet {
    pub answers: BTreeMap<QuestionId, Answer>,
    pub comment: Option<String>,
}

impl AnswerSet {
    pub fn tally(&self) -> AnswerTally {
        self.answers.values().collect()
    }
}

// ---------------------------------------------------------------------------
// Review request
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Completed,
}

/// Written once, when a request is closed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Completion {
    pub answer_set: AnswerSet,
    pub tally: AnswerTally,
    /// Hypothesis status/confidence right after the store update.
    pub outcome: OutcomeSnapshot,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewRequest {
    pub id: Uuid,
    pub hypothesis_id: Uuid,
    pub reviewer_id: ReviewerId,
    pub requested_at: DateTime<Utc>,
    pub question_ids: BTreeSet<QuestionId>,
    pub status: RequestStatus,
    /// Hypothesis status/confidence when the request was opened.
    pub baseline: OutcomeSnapshot,
    pub completion: Option<Completion>,
    /// Open order within the manager; breaks `requested_at` ties.
    pub seq: u64,
}

impl ReviewRequest {
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Close the request. A completed request never changes again.
    pub fn complete(&mut self, completion: Completion) -> Result<()> {
        if self.status == RequestStatus::Completed {
            return Err(ReviewError::AlreadyCompleted(self.id));
        }
        self.status = RequestStatus::Completed;
        self.completion = Some(completion);
        Ok(())
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completion.as_ref().map(|c| c.completed_at)
    }

    /// Confidence after closure minus confidence at open.
    pub fn confidence_delta(&self) -> Option<i32> {
        self.completion
            .as_ref()
            .map(|c| i32::from(c.outcome.confidence) - i32::from(self.baseline.confidence))
    }

    pub fn turnaround(&self) -> Option<Duration> {
        self.completed_at().map(|done| done - self.requested_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_request() -> ReviewRequest {
        ReviewRequest {
            id: Uuid::new_v4(),
            hypothesis_id: Uuid::new_v4(),
            reviewer_id: ReviewerId::from("1"),
            requested_at: Utc::now(),
            question_ids: ["q1", "q2"].into_iter().map(QuestionId::from).collect(),
            status: RequestStatus::Pending,
            baseline: OutcomeSnapshot { status: HypothesisStatus::Awaiting, confidence: 70 },
            completion: None,
            seq: 0,
        }
    }

    fn completion(confidence: u8, after_secs: i64, from: DateTime<Utc>) -> Completion {
        Completion {
            answer_set: AnswerSet::default(),
            tally: AnswerTally::default(),
            outcome: OutcomeSnapshot { status: HypothesisStatus::Supported, confidence },
            completed_at: from + Duration::seconds(after_secs),
        }
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceBand::from_confidence(82), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(70), ConfidenceBand::High);
        assert_eq!(ConfidenceBand::from_confidence(58), ConfidenceBand::Medium);
        assert_eq!(ConfidenceBand::from_confidence(42), ConfidenceBand::Low);
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Supported".parse::<HypothesisStatus>(), Ok(HypothesisStatus::Supported));
        assert!("pending".parse::<HypothesisStatus>().is_err());
    }

    #[test]
    fn test_complete_only_once() {
        let mut request = pending_request();
        let opened = request.requested_at;
        request.complete(completion(72, 30, opened)).unwrap();
        assert_eq!(request.status, RequestStatus::Completed);

        let err = request.complete(completion(10, 60, opened)).unwrap_err();
        assert_eq!(err, ReviewError::AlreadyCompleted(request.id));
        // first closure is preserved
        assert_eq!(request.confidence_delta(), Some(2));
        assert_eq!(request.turnaround(), Some(Duration::seconds(30)));
    }

    #[test]
    fn test_pending_has_no_delta() {
        let request = pending_request();
        assert!(request.is_pending());
        assert_eq!(request.confidence_delta(), None);
        assert_eq!(request.turnaround(), None);
    }

    #[test]
    fn test_answer_tally() {
        let set = AnswerSet {
            answers: [
                (QuestionId::from("q1"), Answer::Yes),
                (QuestionId::from("q2"), Answer::No),
                (QuestionId::from("q3"), Answer::Unsure),
                (QuestionId::from("q4"), Answer::Yes),
            ]
            .into_iter()
            .collect(),
            comment: None,
        };
        let tally = set.tally();
        assert_eq!(tally, AnswerTally { yes: 2, no: 1, unsure: 1 });
        assert_eq!(tally.total(), 4);
    }

    #[test]
    fn test_disease_match_ignores_case() {
        let h = Hypothesis::new("Chloroquine", "Dengue", EvidenceSource::Literature, 78, "", 12);
        assert!(h.targets_disease("dengue"));
        assert!(h.targets_disease(" DENGUE "));
        assert!(!h.targets_disease("zika"));

        let yellow =
            Hypothesis::new("Sofosbuvir", "Fièvre jaune", EvidenceSource::Trial, 50, "", 3);
        assert!(yellow.targets_disease("FIÈVRE JAUNE"));
    }
}
