//! Response types returned by [`DiagnosisService`](crate::DiagnosisService).

use serde::{Deserialize, Serialize};
use symptom_types::{ScoredDisease, Severity, SeverityLevel};

/// Full answer to a diagnosis request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Symptoms as they were matched (trimmed, deduplicated, sorted).
    pub reported: Vec<String>,
    /// Every matching disease, best first.
    pub diagnoses: Vec<ScoredDisease>,
    /// Diagnoses scoring at or above the configured threshold.
    pub likely: Vec<ScoredDisease>,
    /// Details of the best diagnosis.
    pub top: Option<DiseaseDetails>,
    /// Symptoms worth asking about next, best first.
    pub suggestions: Vec<SuggestionView>,
}

/// Description and recommended actions of a disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseDetails {
    /// Disease name.
    pub name: String,
    /// Diagnosis score, when the details belong to a diagnosis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Recommended actions.
    #[serde(default)]
    pub actions: Vec<String>,
    /// Number of condition groups in the disease's rule.
    pub condition_groups: usize,
}

/// A suggested symptom with its severity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionView {
    /// Symptom name.
    pub name: String,
    /// Suggestion score.
    pub score: u32,
    /// Severity weight, `"N/A"` when unknown.
    pub severity: Severity,
    /// Severity band.
    pub level: SeverityLevel,
}

/// A catalog entry for one symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomEntry {
    /// Symptom name.
    pub name: String,
    /// Severity weight, `"N/A"` when unknown.
    pub severity: Severity,
    /// Severity band.
    pub level: SeverityLevel,
}

/// Counts describing a loaded store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    /// Number of diseases.
    pub diseases: usize,
    /// Number of symptoms.
    pub symptoms: usize,
    /// Number of condition groups across all rules.
    pub condition_groups: usize,
    /// Diseases that have no rule.
    pub diseases_without_rules: usize,
}
