//! Diagnosis service facade over a loaded [`RuleStore`].

use std::sync::Arc;

use symptom_rules::{DiagnosisConfig, DiagnosisEngine, RuleError, RuleResult, RuleSource, RuleStore};
use symptom_types::{ReportedSymptoms, ScoredDisease};
use tracing::debug;

use crate::api::{DiagnosisReport, DiseaseDetails, StoreStats, SuggestionView, SymptomEntry};

/// Service-level configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Minimum score for a diagnosis to count as likely.
    pub likely_threshold: f64,
    /// Maximum number of suggestions in a report.
    pub max_suggestions: usize,
    /// Engine configuration.
    pub diagnosis: DiagnosisConfig,
}

impl ServiceConfig {
    /// Default likely threshold.
    pub const DEFAULT_LIKELY_THRESHOLD: f64 = 50.0;
    /// Default suggestion cap.
    pub const DEFAULT_MAX_SUGGESTIONS: usize = 10;
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            likely_threshold: Self::DEFAULT_LIKELY_THRESHOLD,
            max_suggestions: Self::DEFAULT_MAX_SUGGESTIONS,
            diagnosis: DiagnosisConfig::default(),
        }
    }
}

/// Answers diagnosis requests against a shared, read-only store.
#[derive(Clone)]
pub struct DiagnosisService {
    store: Arc<RuleStore>,
    config: ServiceConfig,
}

impl DiagnosisService {
    /// Creates a new service with the given store.
    pub fn new(store: RuleStore, config: ServiceConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
        }
    }

    /// Returns a reference to the store.
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Scores the reported symptoms and assembles a report.
    pub fn diagnose<I, S>(&self, symptoms: I) -> RuleResult<DiagnosisReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let reported = ReportedSymptoms::new(symptoms);
        let engine = DiagnosisEngine::new(self.store.as_ref(), self.config.diagnosis.clone());
        let diagnosis = engine.diagnose(&reported)?;

        let likely: Vec<ScoredDisease> = diagnosis
            .diagnoses
            .iter()
            .filter(|d| d.score >= self.config.likely_threshold)
            .cloned()
            .collect();

        let top = match diagnosis.top() {
            Some(best) => {
                let mut details = self.disease_details(&best.name)?;
                details.score = Some(best.score);
                Some(details)
            }
            None => None,
        };

        let suggestions: Vec<SuggestionView> = diagnosis
            .suggestions
            .into_iter()
            .take(self.config.max_suggestions)
            .map(|s| {
                let severity = self.store.severity_of(&s.name);
                SuggestionView {
                    name: s.name,
                    score: s.score,
                    severity,
                    level: severity.level(),
                }
            })
            .collect();

        let mut reported: Vec<String> = reported.iter().map(str::to_string).collect();
        reported.sort();

        debug!(
            reported = reported.len(),
            diagnoses = diagnosis.diagnoses.len(),
            likely = likely.len(),
            suggestions = suggestions.len(),
            "assembled diagnosis report"
        );

        Ok(DiagnosisReport {
            reported,
            diagnoses: diagnosis.diagnoses,
            likely,
            top,
            suggestions,
        })
    }

    /// Looks up a disease's description and actions.
    pub fn disease_details(&self, name: &str) -> RuleResult<DiseaseDetails> {
        let disease = self
            .store
            .get_disease(name)
            .ok_or_else(|| RuleError::DiseaseNotFound {
                name: name.trim().to_string(),
            })?;

        Ok(DiseaseDetails {
            name: disease.name.clone(),
            score: None,
            description: self.store.description_for(&disease.name)?,
            actions: self.store.actions_for(&disease.name)?,
            condition_groups: self.store.rules_for(&disease.name)?.len(),
        })
    }

    /// Lists every symptom with its severity band, sorted by name.
    pub fn symptom_catalog(&self) -> Vec<SymptomEntry> {
        let mut entries: Vec<SymptomEntry> = self
            .store
            .symptoms()
            .map(|s| SymptomEntry {
                name: s.name.clone(),
                severity: s.severity,
                level: s.severity.level(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Summarises the loaded store.
    pub fn stats(&self) -> StoreStats {
        let diseases_without_rules = self
            .store
            .diseases()
            .filter(|d| self.store.get_rule(&d.name).map_or(true, |r| r.is_empty()))
            .count();

        StoreStats {
            diseases: self.store.disease_count(),
            symptoms: self.store.symptom_count(),
            condition_groups: self.store.condition_group_count(),
            diseases_without_rules,
        }
    }
}
