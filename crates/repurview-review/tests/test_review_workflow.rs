//! End-to-end contextual review: open → submit → report, through `ReviewWorkflow`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use repurview_common::{
    Answer, EvidenceSource, Hypothesis, HypothesisStatus, QuestionId, ReviewError, ScoringRules,
};
use repurview_review::{
    HypothesisStore, InMemoryHypothesisStore, ManualClock, QuestionCatalog, ReviewEvent,
    ReviewWorkflow,
};
use tokio::sync::mpsc;

fn workflow() -> (ReviewWorkflow, Arc<ManualClock>, mpsc::UnboundedReceiver<ReviewEvent>) {
    let store = Arc::new(InMemoryHypothesisStore::new());
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap()));
    let (tx, rx) = mpsc::unbounded_channel();
    let wf = ReviewWorkflow::with_event_queue(
        store,
        QuestionCatalog::standard(),
        ScoringRules::default(),
        clock.clone(),
        tx,
    );
    (wf, clock, rx)
}

fn add(wf: &ReviewWorkflow, drug: &str, disease: &str, confidence: u8) -> Hypothesis {
    wf.store
        .insert(Hypothesis::new(drug, disease, EvidenceSource::Literature, confidence, "", 3))
        .unwrap()
}

fn qids(ids: &[&str]) -> Vec<QuestionId> {
    ids.iter().map(|id| QuestionId::from(*id)).collect()
}

fn answers(pairs: &[(&str, Answer)]) -> HashMap<QuestionId, Answer> {
    pairs.iter().map(|(id, a)| (QuestionId::from(*id), *a)).collect()
}

#[test]
fn test_scenarios_update_store_and_report() {
    let (wf, clock, mut rx) = workflow();
    let chloroquine = add(&wf, "Chloroquine", "Dengue", 70);
    let ribavirin = add(&wf, "Ribavirin", "Zika", 70);
    let ivermectin = add(&wf, "Ivermectin", "Dengue", 60);

    let r1 = wf.requests.open(chloroquine.id, "1", qids(&["q1", "q2", "q3"])).unwrap();
    let r2 = wf.requests.open(ribavirin.id, "2", qids(&["q1", "q2", "q3"])).unwrap();
    let r3 = wf.requests.open(ivermectin.id, "3", qids(&["q2", "q3", "q4"])).unwrap();

    clock.advance(Duration::seconds(100));
    wf.engine
        .submit(r1.id, answers(&[("q1", Answer::Yes), ("q2", Answer::Yes), ("q3", Answer::No)]), None)
        .unwrap();
    clock.advance(Duration::seconds(100));
    wf.engine
        .submit(r2.id, answers(&[("q1", Answer::No), ("q2", Answer::No), ("q3", Answer::Unsure)]), None)
        .unwrap();
    clock.advance(Duration::seconds(100));
    wf.engine
        .submit(
            r3.id,
            answers(&[("q2", Answer::Yes), ("q3", Answer::Unsure), ("q4", Answer::Unsure)]),
            Some("Needs a dosing study".to_string()),
        )
        .unwrap();

    let outcome = |h: &Hypothesis| {
        let h = wf.store.get(h.id).unwrap();
        (h.status, h.confidence)
    };
    assert_eq!(outcome(&chloroquine), (HypothesisStatus::Supported, 72));
    assert_eq!(outcome(&ribavirin), (HypothesisStatus::Concerns, 54));
    assert_eq!(outcome(&ivermectin), (HypothesisStatus::Awaiting, 65));

    assert!(wf.requests.list_pending(None).is_empty());

    let summary = wf.report();
    assert_eq!(summary.reviewed, 3);
    assert_eq!(summary.count_by_status[&HypothesisStatus::Supported], 1);
    assert_eq!(summary.count_by_status[&HypothesisStatus::Concerns], 1);
    assert_eq!(summary.count_by_status[&HypothesisStatus::Awaiting], 1);
    // (2 - 16 + 5) / 3
    assert!((summary.avg_confidence_delta - (-3.0)).abs() < 1e-9);
    // 100, 200, 300 seconds
    assert!((summary.avg_turnaround_seconds - 200.0).abs() < 1e-9);

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert_eq!(events.len(), 6);
    assert!(matches!(events[0], ReviewEvent::RequestOpened { .. }));
    match &events[3] {
        ReviewEvent::ReviewCompleted { request_id, before, after, .. } => {
            assert_eq!(*request_id, r1.id);
            assert_eq!(before.confidence, 70);
            assert_eq!(after.confidence, 72);
        }
        other => panic!("expected completion event, got {other:?}"),
    }
}

#[test]
fn test_list_pending_dengue_newest_first() {
    let (wf, clock, _rx) = workflow();
    let chloroquine = add(&wf, "Chloroquine", "Dengue", 78);
    let metformin = add(&wf, "Metformin", "dengue", 72);
    let ivermectin = add(&wf, "Ivermectin", "Zika", 65);

    let oldest = wf.requests.open(chloroquine.id, "1", qids(&["q1"])).unwrap();
    clock.advance(Duration::hours(3));
    let zika = wf.requests.open(ivermectin.id, "1", qids(&["q1"])).unwrap();
    clock.advance(Duration::hours(3));
    let newest = wf.requests.open(metformin.id, "2", qids(&["q1"])).unwrap();

    let dengue: Vec<_> = wf.requests.list_pending(Some("dengue")).into_iter().map(|r| r.id).collect();
    assert_eq!(dengue, vec![newest.id, oldest.id]);

    let all: Vec<_> = wf.requests.list_pending(None).into_iter().map(|r| r.id).collect();
    assert_eq!(all, vec![newest.id, zika.id, oldest.id]);
}

#[test]
fn test_completed_requests_drop_out_of_pending() {
    let (wf, _clock, _rx) = workflow();
    let h = add(&wf, "Sofosbuvir", "Zika", 58);
    let a = wf.requests.open(h.id, "1", qids(&["q1"])).unwrap();
    let b = wf.requests.open(h.id, "2", qids(&["q1"])).unwrap();

    wf.engine.submit(a.id, answers(&[("q1", Answer::No)]), None).unwrap();

    let pending: Vec<_> = wf.requests.list_pending(Some("zika")).into_iter().map(|r| r.id).collect();
    assert_eq!(pending, vec![b.id]);
    assert_eq!(wf.requests.list_completed().len(), 1);
}

#[test]
fn test_failed_submission_changes_nothing() {
    let (wf, _clock, _rx) = workflow();
    let h = add(&wf, "Favipiravir", "Dengue", 71);
    let request = wf.requests.open(h.id, "4", qids(&["q1", "q2"])).unwrap();

    let err = wf.engine.submit(request.id, answers(&[("q1", Answer::Yes)]), None).unwrap_err();
    assert!(matches!(err, ReviewError::IncompleteAnswers { .. }));
    assert_eq!(wf.store.get(h.id).unwrap(), h);
    assert!(wf.requests.get(request.id).unwrap().is_pending());
    assert_eq!(wf.report().reviewed, 0);
}

#[test]
fn test_open_with_empty_selection_always_fails() {
    let (wf, _clock, _rx) = workflow();
    let h = add(&wf, "Chloroquine", "Dengue", 78);
    for reviewer in ["1", ""] {
        for hypothesis_id in [h.id, uuid::Uuid::new_v4()] {
            assert_eq!(
                wf.requests.open(hypothesis_id, reviewer, Vec::<QuestionId>::new()),
                Err(ReviewError::EmptyQuestionSelection)
            );
        }
    }
}
