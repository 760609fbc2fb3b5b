//! HTTP handlers for all API routes.

pub mod catalog;
pub mod hypotheses;
pub mod reviews;
pub mod report;
