//! repurview-web: JSON API for the contextual-review workflow.
//! Provides:
//!   - Hypothesis search and detail
//!   - Question catalog, clinician registry and disease context
//!   - Review request open / list / submit
//!   - Aggregate review report
//!   - Live review events over SSE

pub mod extract;
pub mod router;
pub mod handlers;
pub mod state;
pub mod sse;
