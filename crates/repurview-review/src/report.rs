//! Aggregate statistics over closed review requests.

use std::collections::BTreeMap;

use repurview_common::{HypothesisStatus, ReviewRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewSummary {
    /// Number of closed reviews, by the status they left the hypothesis in.
    pub count_by_status: BTreeMap<HypothesisStatus, usize>,
    pub avg_confidence_delta: f64,
    pub avg_turnaround_seconds: f64,
    pub reviewed: usize,
}

/// Summarize closed requests. Pending requests in the input are skipped;
/// averages over an empty set are 0.
pub fn summarize(requests: &[ReviewRequest]) -> ReviewSummary {
    let mut count_by_status: BTreeMap<HypothesisStatus, usize> =
        HypothesisStatus::ALL.iter().map(|s| (*s, 0)).collect();
    let mut delta_sum = 0.0_f64;
    let mut turnaround_sum = 0.0_f64;
    let mut reviewed = 0_usize;

    for request in requests {
        let (Some(completion), Some(delta), Some(turnaround)) =
            (request.completion.as_ref(), request.confidence_delta(), request.turnaround())
        else {
            continue;
        };
        *count_by_status.entry(completion.outcome.status).or_insert(0) += 1;
        delta_sum += f64::from(delta);
        turnaround_sum += turnaround.num_milliseconds() as f64 / 1000.0;
        reviewed += 1;
    }

    let mean = |sum: f64| if reviewed == 0 { 0.0 } else { sum / reviewed as f64 };

    ReviewSummary {
        count_by_status,
        avg_confidence_delta: mean(delta_sum),
        avg_turnaround_seconds: mean(turnaround_sum),
        reviewed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use repurview_common::{
        AnswerSet, AnswerTally, Completion, OutcomeSnapshot, QuestionId, RequestStatus, ReviewerId,
    };
    use uuid::Uuid;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn closed(before: u8, after: u8, status: HypothesisStatus, secs: i64) -> ReviewRequest {
        ReviewRequest {
            id: Uuid::new_v4(),
            hypothesis_id: Uuid::new_v4(),
            reviewer_id: ReviewerId::from("1"),
            requested_at: t0(),
            question_ids: [QuestionId::from("q1")].into_iter().collect(),
            status: RequestStatus::Completed,
            baseline: OutcomeSnapshot { status: HypothesisStatus::Awaiting, confidence: before },
            completion: Some(Completion {
                answer_set: AnswerSet::default(),
                tally: AnswerTally::default(),
                outcome: OutcomeSnapshot { status, confidence: after },
                completed_at: t0() + Duration::seconds(secs),
            }),
            seq: 0,
        }
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize(&[]);
        assert_eq!(summary.reviewed, 0);
        assert_eq!(summary.avg_confidence_delta, 0.0);
        assert_eq!(summary.avg_turnaround_seconds, 0.0);
        assert_eq!(summary.count_by_status.len(), 3);
        assert!(summary.count_by_status.values().all(|c| *c == 0));
    }

    #[test]
    fn test_means_and_counts() {
        let requests = vec![
            closed(70, 72, HypothesisStatus::Supported, 60),
            closed(70, 54, HypothesisStatus::Concerns, 120),
            closed(60, 65, HypothesisStatus::Awaiting, 30),
            closed(40, 55, HypothesisStatus::Supported, 30),
        ];
        let summary = summarize(&requests);
        assert_eq!(summary.reviewed, 4);
        assert_eq!(summary.count_by_status[&HypothesisStatus::Supported], 2);
        assert_eq!(summary.count_by_status[&HypothesisStatus::Concerns], 1);
        assert_eq!(summary.count_by_status[&HypothesisStatus::Awaiting], 1);
        // (2 - 16 + 5 + 15) / 4
        assert!((summary.avg_confidence_delta - 1.5).abs() < 1e-9);
        assert!((summary.avg_turnaround_seconds - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_pending_requests_skipped() {
        let mut pending = closed(70, 72, HypothesisStatus::Supported, 60);
        pending.status = RequestStatus::Pending;
        pending.completion = None;
        let summary = summarize(&[pending, closed(50, 40, HypothesisStatus::Concerns, 10)]);
        assert_eq!(summary.reviewed, 1);
        assert!((summary.avg_confidence_delta + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_repeatable() {
        let requests = vec![
            closed(70, 72, HypothesisStatus::Supported, 61),
            closed(70, 54, HypothesisStatus::Concerns, 7),
        ];
        assert_eq!(summarize(&requests), summarize(&requests));
    }
}
