//! Read contract between rule storage and the diagnosis engine.

use symptom_types::{ConditionGroup, DiseaseSummary, Symptom};

use crate::types::RuleResult;

/// Read access to diseases, symptoms and rules.
///
/// Implementations return [`RuleError::SourceUnavailable`](crate::RuleError::SourceUnavailable)
/// when their backing data cannot be reached; an `Ok` empty result always
/// means "nothing stored".
pub trait RuleSource {
    /// All diseases, in the source's enumeration order.
    fn list_diseases(&self) -> RuleResult<Vec<DiseaseSummary>>;

    /// The disease's condition groups.
    ///
    /// Groups are non-empty and deduplicated by set identity. Unknown
    /// diseases and diseases without a rule yield an empty list.
    fn rules_for(&self, disease: &str) -> RuleResult<Vec<ConditionGroup>>;

    /// The disease's description, if it exists and has one.
    fn description_for(&self, disease: &str) -> RuleResult<Option<String>>;

    /// The disease's recommended actions.
    fn actions_for(&self, disease: &str) -> RuleResult<Vec<String>>;

    /// All symptoms with their severity.
    fn list_symptoms(&self) -> RuleResult<Vec<Symptom>>;
}
