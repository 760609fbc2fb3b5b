//! Review request manager: opens contextual-review requests and tracks them.
//!
//! Each request lives behind its own `Mutex`, so a submission serializes
//! only against other submissions for the same request.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use repurview_common::{
    QuestionId, RequestStatus, Result, ReviewError, ReviewRequest, ReviewerId,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::events::ReviewEvent;
use crate::questions::QuestionCatalog;
use crate::store::HypothesisStore;

pub(crate) type RequestSlot = Arc<Mutex<ReviewRequest>>;

pub(crate) fn lock_slot(slot: &Mutex<ReviewRequest>) -> MutexGuard<'_, ReviewRequest> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct ReviewRequestManager {
    store: Arc<dyn HypothesisStore>,
    catalog: Arc<QuestionCatalog>,
    clock: Arc<dyn Clock>,
    requests: RwLock<HashMap<Uuid, RequestSlot>>,
    next_seq: AtomicU64,
    event_queue: Option<mpsc::UnboundedSender<ReviewEvent>>,
}

impl ReviewRequestManager {
    pub fn new(
        store: Arc<dyn HypothesisStore>,
        catalog: Arc<QuestionCatalog>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            catalog,
            clock,
            requests: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
            event_queue: None,
        }
    }

    pub fn with_event_queue(mut self, tx: mpsc::UnboundedSender<ReviewEvent>) -> Self {
        self.event_queue = Some(tx);
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Open a pending request. The hypothesis itself is left untouched.
    pub fn open(
        &self,
        hypothesis_id: Uuid,
        reviewer_id: impl Into<ReviewerId>,
        question_ids: impl IntoIterator<Item = QuestionId>,
    ) -> Result<ReviewRequest> {
        self.open_at(hypothesis_id, reviewer_id, question_ids, self.clock.now())
    }

    /// Like [`ReviewRequestManager::open`], stamped with `requested_at` instead
    /// of the clock. Used when loading a queue that already exists.
    pub fn open_at(
        &self,
        hypothesis_id: Uuid,
        reviewer_id: impl Into<ReviewerId>,
        question_ids: impl IntoIterator<Item = QuestionId>,
        requested_at: DateTime<Utc>,
    ) -> Result<ReviewRequest> {
        let question_ids: BTreeSet<QuestionId> = question_ids.into_iter().collect();
        if question_ids.is_empty() {
            return Err(ReviewError::EmptyQuestionSelection);
        }

        let reviewer_id = reviewer_id.into();
        if reviewer_id.is_blank() {
            return Err(ReviewError::MissingReviewer);
        }

        let hypothesis = self.store.get(hypothesis_id).map_err(|e| match e {
            ReviewError::NotFound(id) => ReviewError::UnknownHypothesis(id),
            other => other,
        })?;

        if let Some(unknown) = question_ids.iter().find(|id| !self.catalog.contains(id)) {
            return Err(ReviewError::UnknownQuestion(unknown.clone()));
        }

        let request = ReviewRequest {
            id: Uuid::new_v4(),
            hypothesis_id,
            reviewer_id,
            requested_at,
            question_ids,
            status: RequestStatus::Pending,
            baseline: hypothesis.outcome(),
            completion: None,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };

        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(request.id, Arc::new(Mutex::new(request.clone())));

        info!(
            request = %request.id,
            hypothesis = %hypothesis_id,
            drug = %hypothesis.drug_name,
            reviewer = %request.reviewer_id,
            questions = request.question_ids.len(),
            "Contextual review requested"
        );
        self.publish(ReviewEvent::opened(&request));

        Ok(request)
    }

    pub fn get(&self, id: Uuid) -> Result<ReviewRequest> {
        self.slot(id)
            .map(|slot| lock_slot(&slot).clone())
            .ok_or(ReviewError::UnknownRequest(id))
    }

    /// Pending requests, newest first. With a disease filter, only requests
    /// whose hypothesis targets that disease (case-insensitive).
    pub fn list_pending(&self, disease: Option<&str>) -> Vec<ReviewRequest> {
        let mut pending: Vec<ReviewRequest> = self
            .snapshot()
            .into_iter()
            .filter(ReviewRequest::is_pending)
            .filter(|r| match disease {
                Some(disease) => self
                    .store
                    .get(r.hypothesis_id)
                    .map(|h| h.targets_disease(disease))
                    .unwrap_or(false),
                None => true,
            })
            .collect();
        pending.sort_by(|a, b| {
            b.requested_at.cmp(&a.requested_at).then(b.seq.cmp(&a.seq))
        });
        pending
    }

    /// Completed requests, oldest completion first.
    pub fn list_completed(&self) -> Vec<ReviewRequest> {
        let mut completed: Vec<ReviewRequest> = self
            .snapshot()
            .into_iter()
            .filter(|r| r.status == RequestStatus::Completed)
            .collect();
        completed.sort_by(|a, b| {
            a.completed_at().cmp(&b.completed_at()).then(a.seq.cmp(&b.seq))
        });
        completed
    }

    /// Every request for one hypothesis, in open order.
    pub fn list_for_hypothesis(&self, hypothesis_id: Uuid) -> Vec<ReviewRequest> {
        let mut requests: Vec<ReviewRequest> = self
            .snapshot()
            .into_iter()
            .filter(|r| r.hypothesis_id == hypothesis_id)
            .collect();
        requests.sort_by_key(|r| r.seq);
        requests
    }

    pub fn len(&self) -> usize {
        self.requests.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn slot(&self, id: Uuid) -> Option<RequestSlot> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub(crate) fn publish(&self, event: ReviewEvent) {
        if let Some(tx) = &self.event_queue {
            if tx.send(event).is_err() {
                warn!("Review event queue closed; event dropped");
            }
        }
    }

    // Map lock is released before any request lock is taken.
    fn snapshot(&self) -> Vec<ReviewRequest> {
        let slots: Vec<RequestSlot> = self
            .requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        slots.iter().map(|slot| lock_slot(slot).clone()).collect()
    }
}
