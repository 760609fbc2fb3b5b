//! Shared application state for the web server.

use std::sync::Arc;

use repurview_common::Clinician;
use repurview_config::Config;
use repurview_review::{
    sample, Clock, DiseaseCatalog, HypothesisStore, InMemoryHypothesisStore, QuestionCatalog,
    ReviewEvent, ReviewWorkflow, SystemClock,
};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

/// Shared state injected into every Axum handler.
#[derive(Clone)]
pub struct AppState {
    pub workflow: ReviewWorkflow,
    /// Display identities for reviewer ids.
    pub clinicians: Vec<Clinician>,
    pub diseases: DiseaseCatalog,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<ReviewEvent>,
}

impl AppState {
    /// Build state from config. Must be called inside a Tokio runtime.
    pub fn from_config(config: &Config) -> repurview_common::Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &Config, clock: Arc<dyn Clock>) -> repurview_common::Result<Self> {
        let store = Arc::new(InMemoryHypothesisStore::new());
        if config.sample.seed {
            let seeded = sample::seed(store.as_ref())?;
            info!("Seeded {} sample hypotheses", seeded);
        }

        let (event_tx, _) = broadcast::channel(config.server.event_buffer);
        let (queue_tx, queue_rx) = mpsc::unbounded_channel();
        start_event_forwarder(queue_rx, event_tx.clone());

        let now = clock.now();
        let store: Arc<dyn HypothesisStore> = store;
        let workflow = ReviewWorkflow::with_event_queue(
            store,
            QuestionCatalog::from_config(&config.questions.catalog),
            config.scoring,
            clock,
            queue_tx,
        );

        if config.sample.seed {
            let opened = sample::seed_queue(workflow.store.as_ref(), &workflow.requests, now)?;
            info!("Seeded {} pending sample reviews", opened);
        }

        Ok(Self {
            workflow,
            clinicians: sample::sample_clinicians(),
            diseases: DiseaseCatalog::standard(),
            event_tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReviewEvent> {
        self.event_tx.subscribe()
    }
}

/// Relay workflow events to every SSE subscriber.
fn start_event_forwarder(
    mut rx: mpsc::UnboundedReceiver<ReviewEvent>,
    tx: broadcast::Sender<ReviewEvent>,
) {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            // no subscribers is fine
            if tx.send(event).is_err() {
                debug!("Review event dropped: no SSE subscribers");
            }
        }
    });
}

pub type SharedState = Arc<AppState>;
