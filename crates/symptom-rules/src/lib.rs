//! # symptom-rules
//!
//! Rule storage, data ingestion and the diagnosis engine for symptom to
//! disease matching.
//!
//! A disease's rule is an OR-list of condition groups; each group is an
//! AND-set of symptoms. The [`DiagnosisEngine`] ranks diseases by how much
//! of their best group a set of reported symptoms covers, then suggests
//! unreported symptoms worth asking about next.
//!
//! ## Data sources
//!
//! - CSV bundle (rules, descriptions, actions, severities) via
//!   [`discover_csv_files`] and [`RuleStore::load_csv_bundle`]
//! - Disease x symptom association matrix via [`RuleStore::load_associations`]
//! - JSON catalogs ([`DISEASES_FILE`], [`SYMPTOMS_FILE`]) via
//!   [`RuleStore::open`] and [`RuleStore::save`]
//!
//! ## Features
//!
//! - `parallel` (default): Parses the tables of a CSV bundle concurrently
//!   using rayon.
//!
//! ## Example
//!
//! ```rust
//! use symptom_rules::{DiagnosisConfig, DiagnosisEngine, RuleStore};
//! use symptom_types::{ReportedSymptoms, Severity};
//!
//! let mut store = RuleStore::new();
//! store.add_symptom("fever", Severity::known(5)).unwrap();
//! store.add_symptom("cough", Severity::known(4)).unwrap();
//! store.add_disease("Common Cold").unwrap();
//! store.add_condition_group("Common Cold", ["fever", "cough"]).unwrap();
//!
//! let engine = DiagnosisEngine::new(&store, DiagnosisConfig::default());
//! let diagnosis = engine.diagnose(&ReportedSymptoms::new(["fever"])).unwrap();
//!
//! assert_eq!(diagnosis.diagnoses[0].score, 50.0);
//! assert_eq!(diagnosis.suggestions[0].name, "cough");
//! ```

#![warn(missing_docs)]

mod action;
mod association;
mod dedup;
mod description;
mod diagnosis;
mod interchange;
mod loader;
pub mod parser;
mod rule_row;
mod severity;
mod source;
mod store;
mod types;

pub use action::ActionRow;
pub use association::AssociationMatrix;
pub use dedup::dedup_condition_groups;
pub use description::DescriptionRow;
pub use diagnosis::{best_matching_group, DiagnosisEngine, GroupMatch};
pub use interchange::{read_json, write_json, DISEASES_FILE, SYMPTOMS_FILE};
pub use loader::discover_csv_files;
pub use parser::{CsvRecord, CsvTableParser};
pub use rule_row::RuleRow;
pub use severity::SeverityRow;
pub use source::RuleSource;
pub use store::RuleStore;
pub use types::{CsvFiles, DiagnosisConfig, ImportConfig, ImportStats, RuleError, RuleResult};

// Re-export symptom-types for convenience
pub use symptom_types;
