//! # symptom-service
//!
//! Diagnosis service and command-line tool for symptom to disease matching.
//!
//! [`DiagnosisService`] wraps a loaded [`RuleStore`](symptom_rules::RuleStore)
//! and turns engine output into a [`DiagnosisReport`]: the ranked diagnoses,
//! those above a likelihood threshold, details of the best one and a capped
//! list of suggested symptoms with their severity band.

#![warn(missing_docs)]

pub mod api;
pub mod cli;
mod service;

pub use api::{DiagnosisReport, DiseaseDetails, StoreStats, SuggestionView, SymptomEntry};
pub use service::{DiagnosisService, ServiceConfig};

// Re-export the rule crate for convenience
pub use symptom_rules;
