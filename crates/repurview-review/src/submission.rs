//! Review submission engine: closes a pending request with a complete answer set.
//!
//! The request's lock is held for the whole submission, so concurrent
//! submissions for one request serialize and all but the first see
//! `AlreadyCompleted`. The hypothesis is rewritten through the store's
//! compare-and-swap, so closures of different requests for the same
//! hypothesis never lose an update.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use repurview_common::{
    Answer, AnswerSet, Completion, Hypothesis, QuestionId, Result, ReviewError, ReviewRequest,
    ScoringRules, AnswerTally,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::events::ReviewEvent;
use crate::requests::{lock_slot, ReviewRequestManager};
use crate::store::HypothesisStore;

pub struct ReviewSubmissionEngine {
    requests: Arc<ReviewRequestManager>,
    store: Arc<dyn HypothesisStore>,
    rules: ScoringRules,
    clock: Arc<dyn Clock>,
}

impl ReviewSubmissionEngine {
    pub fn new(
        requests: Arc<ReviewRequestManager>,
        store: Arc<dyn HypothesisStore>,
        rules: ScoringRules,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { requests, store, rules, clock }
    }

    /// Submit a reviewer's answers. Answers for questions the request did not
    /// select are ignored; every selected question must be answered.
    pub fn submit(
        &self,
        request_id: Uuid,
        answers: HashMap<QuestionId, Answer>,
        comment: Option<String>,
    ) -> Result<ReviewRequest> {
        let slot = self
            .requests
            .slot(request_id)
            .ok_or(ReviewError::UnknownRequest(request_id))?;
        let mut request = lock_slot(&slot);

        if !request.is_pending() {
            warn!(request = %request_id, "Rejected resubmission of completed review");
            return Err(ReviewError::AlreadyCompleted(request_id));
        }

        let answer_set = collect_answers(&request, &answers, comment)?;
        let tally = answer_set.tally();
        let updated = self.apply_outcome(request.hypothesis_id, &tally)?;

        request.complete(Completion {
            answer_set,
            tally,
            outcome: updated.outcome(),
            completed_at: self.clock.now(),
        })?;

        info!(
            request = %request_id,
            hypothesis = %updated.id,
            before = request.baseline.confidence,
            after = updated.confidence,
            status = %updated.status,
            "Contextual review completed"
        );

        let closed = request.clone();
        drop(request);
        if let Some(event) = ReviewEvent::completed(&closed) {
            self.requests.publish(event);
        }
        Ok(closed)
    }

    // Read, score, swap; a concurrent closure of another request for the same
    // hypothesis bumps the revision and we score again from the fresh value.
    fn apply_outcome(&self, hypothesis_id: Uuid, tally: &AnswerTally) -> Result<Hypothesis> {
        loop {
            let current = self.store.get(hypothesis_id)?;
            let outcome = self.rules.evaluate(current.confidence, tally);
            match self.store.compare_and_swap(
                hypothesis_id,
                current.revision,
                outcome.status,
                i32::from(outcome.confidence),
            ) {
                Ok(updated) => return Ok(updated),
                Err(ReviewError::StaleRevision { expected, actual, .. }) => {
                    debug!(
                        hypothesis = %hypothesis_id,
                        expected,
                        actual,
                        "Hypothesis changed during review closure, rescoring"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn collect_answers(
    request: &ReviewRequest,
    answers: &HashMap<QuestionId, Answer>,
    comment: Option<String>,
) -> Result<AnswerSet> {
    let mut selected = BTreeMap::new();
    let mut missing = Vec::new();
    for id in &request.question_ids {
        match answers.get(id) {
            Some(answer) => {
                selected.insert(id.clone(), *answer);
            }
            None => missing.push(id.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(ReviewError::IncompleteAnswers { missing });
    }

    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    Ok(AnswerSet { answers: selected, comment })
}
