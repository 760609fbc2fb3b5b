//! repurview-review: The contextual-review workflow.
//! Hypotheses are read from a store, review requests are opened against them,
//! and a complete answer set closes a request and rewrites the hypothesis outcome.

pub mod clock;
pub mod store;
pub mod questions;
pub mod diseases;
pub mod requests;
pub mod submission;
pub mod report;
pub mod events;
pub mod sample;

use std::sync::Arc;

use repurview_common::ScoringRules;
use tokio::sync::mpsc;

pub use clock::{Clock, ManualClock, SystemClock};
pub use diseases::DiseaseCatalog;
pub use events::ReviewEvent;
pub use questions::QuestionCatalog;
pub use report::{summarize, ReviewSummary};
pub use requests::ReviewRequestManager;
pub use store::{HypothesisStore, InMemoryHypothesisStore};
pub use submission::ReviewSubmissionEngine;

/// The wired-up workflow: one store, one catalog, one manager, one engine.
#[derive(Clone)]
pub struct ReviewWorkflow {
    pub store: Arc<dyn HypothesisStore>,
    pub catalog: Arc<QuestionCatalog>,
    pub requests: Arc<ReviewRequestManager>,
    pub engine: Arc<ReviewSubmissionEngine>,
}

impl ReviewWorkflow {
    pub fn new(
        store: Arc<dyn HypothesisStore>,
        catalog: QuestionCatalog,
        rules: ScoringRules,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self::build(store, catalog, rules, clock, None)
    }

    /// Same as [`ReviewWorkflow::new`], publishing review events on `tx`.
    pub fn with_event_queue(
        store: Arc<dyn HypothesisStore>,
        catalog: QuestionCatalog,
        rules: ScoringRules,
        clock: Arc<dyn Clock>,
        tx: mpsc::UnboundedSender<ReviewEvent>,
    ) -> Self {
        Self::build(store, catalog, rules, clock, Some(tx))
    }

    fn build(
        store: Arc<dyn HypothesisStore>,
        catalog: QuestionCatalog,
        rules: ScoringRules,
        clock: Arc<dyn Clock>,
        tx: Option<mpsc::UnboundedSender<ReviewEvent>>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let mut manager = ReviewRequestManager::new(store.clone(), catalog.clone(), clock.clone());
        if let Some(tx) = tx {
            manager = manager.with_event_queue(tx);
        }
        let requests = Arc::new(manager);
        let engine = Arc::new(ReviewSubmissionEngine::new(
            requests.clone(),
            store.clone(),
            rules,
            clock,
        ));
        Self { store, catalog, requests, engine }
    }

    /// Summary over every request closed so far.
    pub fn report(&self) -> ReviewSummary {
        summarize(&self.requests.list_completed())
    }
}
