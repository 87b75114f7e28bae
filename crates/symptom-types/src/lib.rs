//! # symptom-types
//!
//! Type definitions for rule-based symptom to disease matching.
//!
//! This crate provides the plain data model shared by the rule store and the
//! diagnosis engine: symptoms with an optional severity, diseases with their
//! description and recommended actions, condition groups (AND-sets of
//! symptoms), the caller's reported symptoms and the ranked results.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde,
//!   including the JSON interchange records in [`interchange`].
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use symptom_types::{ConditionGroup, ReportedSymptoms, Severity, SeverityLevel};
//!
//! // (fever AND cough)
//! let group = ConditionGroup::new(["fever", "cough"]).unwrap();
//! let reported = ReportedSymptoms::new(["fever", "headache"]);
//!
//! assert_eq!(group.matched_count(&reported), 1);
//! assert_eq!(Severity::known(8).level(), SeverityLevel::High);
//! ```
//!
//! ## Without Serde
//!
//! ```toml
//! [dependencies]
//! symptom-types = { version = "0.1", default-features = false }
//! ```

#![warn(missing_docs)]

mod condition;
mod disease;
pub mod interchange;
mod report;
mod symptom;

// Re-export all public types at crate root
pub use condition::{ConditionGroup, EmptyConditionGroup};
pub use disease::{Disease, DiseaseSummary};
pub use interchange::{DiseaseCatalog, DiseaseRecord, SeverityCatalog};
pub use report::{Diagnosis, ReportedSymptoms, ScoredDisease, SuggestedSymptom};
pub use symptom::{Severity, SeverityLevel, Symptom};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_types_are_exported() {
        let _group = ConditionGroup::new(["fever"]).unwrap();
        let _reported = ReportedSymptoms::default();
        let _severity = Severity::UNKNOWN;
        let _level = SeverityLevel::Unknown;
        let _disease = Disease::new("Influenza");
        let _symptom = Symptom::new("fever", Severity::known(4));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let disease = Disease {
            name: "Influenza".to_string(),
            description: Some("Viral infection".to_string()),
            actions: vec!["rest".to_string(), "fluids".to_string()],
        };

        let json = serde_json::to_string(&disease).unwrap();
        let parsed: Disease = serde_json::from_str(&json).unwrap();
        assert_eq!(disease, parsed);
    }
}
