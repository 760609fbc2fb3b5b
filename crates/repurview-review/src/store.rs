//! Hypothesis store: the shared table of hypothesis records.
//!
//! Callers hold an `Arc<dyn HypothesisStore>` handle. Outcome writes are
//! atomic per record: `update_outcome` is last-write-wins, and
//! `compare_and_swap` only applies when the caller's revision is current.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use repurview_common::confidence::in_range;
use repurview_common::{Hypothesis, HypothesisStatus, Result, ReviewError};
use tracing::debug;
use uuid::Uuid;

pub trait HypothesisStore: Send + Sync {
    fn get(&self, id: Uuid) -> Result<Hypothesis>;

    /// Register a hypothesis handed over by the upstream generator.
    fn insert(&self, hypothesis: Hypothesis) -> Result<Hypothesis>;

    /// All hypotheses in insertion order.
    fn list(&self) -> Vec<Hypothesis>;

    /// Overwrite status and confidence. No other field is touched.
    fn update_outcome(
        &self,
        id: Uuid,
        status: HypothesisStatus,
        confidence: i32,
    ) -> Result<Hypothesis>;

    /// Like `update_outcome`, but fails with `StaleRevision` unless the stored
    /// revision still equals `expected_revision`.
    fn compare_and_swap(
        &self,
        id: Uuid,
        expected_revision: u64,
        status: HypothesisStatus,
        confidence: i32,
    ) -> Result<Hypothesis>;

    /// Case-insensitive substring match on drug name or target disease,
    /// restricted to `statuses` when that slice is non-empty.
    fn search(&self, term: &str, statuses: &[HypothesisStatus]) -> Vec<Hypothesis> {
        let needle = term.trim().to_lowercase();
        self.list()
            .into_iter()
            .filter(|h| {
                needle.is_empty()
                    || h.drug_name.to_lowercase().contains(&needle)
                    || h.target_disease.to_lowercase().contains(&needle)
            })
            .filter(|h| statuses.is_empty() || statuses.contains(&h.status))
            .collect()
    }
}

#[derive(Default)]
struct Records {
    by_id: HashMap<Uuid, Hypothesis>,
    order: Vec<Uuid>,
}

/// In-process store backed by a single `RwLock`.
#[derive(Default)]
pub struct InMemoryHypothesisStore {
    records: RwLock<Records>,
}

impl InMemoryHypothesisStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hypotheses(hypotheses: impl IntoIterator<Item = Hypothesis>) -> Result<Self> {
        let store = Self::new();
        for hypothesis in hypotheses {
            store.insert(hypothesis)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Records> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(
        &self,
        id: Uuid,
        expected_revision: Option<u64>,
        status: HypothesisStatus,
        confidence: i32,
    ) -> Result<Hypothesis> {
        if !in_range(confidence) {
            return Err(ReviewError::InvalidTransition { confidence });
        }

        let mut records = self.write();
        let record = records.by_id.get_mut(&id).ok_or(ReviewError::NotFound(id))?;

        if let Some(expected) = expected_revision {
            if record.revision != expected {
                return Err(ReviewError::StaleRevision {
                    id,
                    expected,
                    actual: record.revision,
                });
            }
        }

        // in_range above guarantees the cast is lossless
        record.confidence = confidence as u8;
        record.status = status;
        record.revision += 1;

        debug!(
            hypothesis = %id,
            status = %status,
            confidence,
            revision = record.revision,
            "Hypothesis outcome updated"
        );
        Ok(record.clone())
    }
}

impl HypothesisStore for InMemoryHypothesisStore {
    fn get(&self, id: Uuid) -> Result<Hypothesis> {
        self.read().by_id.get(&id).cloned().ok_or(ReviewError::NotFound(id))
    }

    fn insert(&self, mut hypothesis: Hypothesis) -> Result<Hypothesis> {
        let confidence = i32::from(hypothesis.confidence);
        if !in_range(confidence) {
            return Err(ReviewError::InvalidTransition { confidence });
        }

        let mut records = self.write();
        if records.by_id.contains_key(&hypothesis.id) {
            return Err(ReviewError::DuplicateHypothesis(hypothesis.id));
        }
        hypothesis.revision = 0;
        records.order.push(hypothesis.id);
        records.by_id.insert(hypothesis.id, hypothesis.clone());
        Ok(hypothesis)
    }

    fn list(&self) -> Vec<Hypothesis> {
        let records = self.read();
        records
            .order
            .iter()
            .filter_map(|id| records.by_id.get(id).cloned())
            .collect()
    }

    fn update_outcome(
        &self,
        id: Uuid,
        status: HypothesisStatus,
        confidence: i32,
    ) -> Result<Hypothesis> {
        self.apply(id, None, status, confidence)
    }

    fn compare_and_swap(
        &self,
        id: Uuid,
        expected_revision: u64,
        status: HypothesisStatus,
        confidence: i32,
    ) -> Result<Hypothesis> {
        self.apply(id, Some(expected_revision), status, confidence)
    }
}
