//! Diagnosis engine.
//!
//! Scores every disease against a set of reported symptoms and proposes
//! further symptoms to ask about.
//!
//! ## Scoring
//!
//! For each condition group `G` of a disease, `matched(G)` is the number of
//! its symptoms that were reported. The best group is the **first** group to
//! reach a strictly greater `matched` than any group before it; later groups
//! that tie do not replace it, even if they are smaller. A disease whose best
//! group matches nothing is excluded. Otherwise
//! `score = 100 * matched(best) / |best|`, rounded to two decimals.
//!
//! ## Suggestions
//!
//! Every unreported symptom in any group of the top `top_n` diseases counts
//! once per group it appears in. Symptoms that appear anywhere in the top
//! disease's rule get `boost` added once.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use symptom_types::{ConditionGroup, Diagnosis, ReportedSymptoms, ScoredDisease, SuggestedSymptom};
use tracing::{debug, warn};

use crate::source::RuleSource;
use crate::types::{DiagnosisConfig, RuleResult};

/// The best-matching condition group of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupMatch {
    /// Position of the group in the rule.
    pub index: usize,
    /// Reported symptoms found in the group.
    pub matched: usize,
    /// Number of symptoms in the group.
    pub size: usize,
}

impl GroupMatch {
    /// Percentage of the group that was matched, rounded to two decimals.
    pub fn score(&self) -> f64 {
        round2(100.0 * self.matched as f64 / self.size as f64)
    }
}

/// Finds the group with the strictly highest match count.
///
/// Returns `None` when no group matches any reported symptom.
///
/// # Example
///
/// ```
/// use symptom_rules::best_matching_group;
/// use symptom_types::{ConditionGroup, ReportedSymptoms};
///
/// let groups = vec![
///     ConditionGroup::new(["a", "b"]).unwrap(),
///     ConditionGroup::new(["c"]).unwrap(),
/// ];
/// let best = best_matching_group(&groups, &ReportedSymptoms::new(["c"])).unwrap();
/// assert_eq!(best.index, 1);
/// assert_eq!(best.score(), 100.0);
/// ```
pub fn best_matching_group(
    groups: &[ConditionGroup],
    reported: &ReportedSymptoms,
) -> Option<GroupMatch> {
    let mut best: Option<GroupMatch> = None;
    for (index, group) in groups.iter().enumerate() {
        let matched = group.matched_count(reported);
        if matched > best.map_or(0, |b| b.matched) {
            best = Some(GroupMatch {
                index,
                matched,
                size: group.len(),
            });
        }
    }
    best
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Scores diseases and suggests symptoms using a [`RuleSource`].
///
/// Each call reads the source afresh and keeps no state between calls.
///
/// # Example
///
/// ```
/// use symptom_rules::{DiagnosisConfig, DiagnosisEngine, RuleStore};
/// use symptom_types::{ReportedSymptoms, Severity};
///
/// let mut store = RuleStore::new();
/// for symptom in ["fever", "cough", "rash", "chills"] {
///     store.add_symptom(symptom, Severity::UNKNOWN).unwrap();
/// }
/// store.add_disease("D1").unwrap();
/// store.add_condition_group("D1", ["fever", "cough"]).unwrap();
/// store.add_condition_group("D1", ["rash"]).unwrap();
/// store.add_disease("D2").unwrap();
/// store.add_condition_group("D2", ["fever", "chills"]).unwrap();
///
/// let engine = DiagnosisEngine::new(&store, DiagnosisConfig::default());
/// let result = engine.diagnose(&ReportedSymptoms::new(["fever", "cough"])).unwrap();
///
/// assert_eq!(result.diagnoses[0].name, "D1");
/// assert_eq!(result.diagnoses[0].score, 100.0);
/// assert_eq!(result.suggestions[0].name, "rash");
/// assert_eq!(result.suggestions[0].score, 11);
/// ```
pub struct DiagnosisEngine<'a, S: RuleSource + ?Sized> {
    source: &'a S,
    config: DiagnosisConfig,
}

impl<'a, S: RuleSource + ?Sized> DiagnosisEngine<'a, S> {
    /// Creates an engine over a rule source.
    pub fn new(source: &'a S, config: DiagnosisConfig) -> Self {
        Self { source, config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &DiagnosisConfig {
        &self.config
    }

    /// Ranks every disease by how well its best group matches `reported`.
    ///
    /// Diseases without a rule or without any overlap are left out. The
    /// result is sorted by descending score; equal scores keep the source's
    /// enumeration order.
    pub fn score_diagnoses(&self, reported: &ReportedSymptoms) -> RuleResult<Vec<ScoredDisease>> {
        let known = self.known_symptoms()?;
        let diseases = self.source.list_diseases()?;
        let mut scored = Vec::new();

        for disease in &diseases {
            let groups = self.usable_groups(&disease.name, known.as_ref())?;
            if groups.is_empty() {
                continue;
            }
            if let Some(best) = best_matching_group(&groups, reported) {
                scored.push(ScoredDisease::new(disease.name.clone(), best.score()));
            }
        }

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        debug!(
            reported = reported.len(),
            diseases = diseases.len(),
            matched = scored.len(),
            "scored diagnoses"
        );
        Ok(scored)
    }

    /// Suggests unreported symptoms from the rules of the top diagnoses.
    ///
    /// `ranked` must be sorted best first, as returned by
    /// [`score_diagnoses`](Self::score_diagnoses).
    pub fn suggest_symptoms(
        &self,
        reported: &ReportedSymptoms,
        ranked: &[ScoredDisease],
    ) -> RuleResult<Vec<SuggestedSymptom>> {
        let top = &ranked[..ranked.len().min(self.config.top_n)];
        if top.is_empty() {
            return Ok(Vec::new());
        }

        let known = self.known_symptoms()?;
        let mut counts: HashMap<String, u32> = HashMap::new();
        // First-encounter order, used to keep ties stable
        let mut order: Vec<String> = Vec::new();
        let mut top_rule_symptoms: HashSet<String> = HashSet::new();

        for (rank, diagnosis) in top.iter().enumerate() {
            let groups = self.usable_groups(&diagnosis.name, known.as_ref())?;
            if rank == 0 {
                top_rule_symptoms.extend(groups.iter().flat_map(|g| g.iter()).map(str::to_string));
            }
            for symptom in groups.iter().flat_map(|g| g.iter()) {
                if reported.contains(symptom) {
                    continue;
                }
                let count = counts.entry(symptom.to_string()).or_insert_with(|| {
                    order.push(symptom.to_string());
                    0
                });
                *count += 1;
            }
        }

        let mut suggestions: Vec<SuggestedSymptom> = order
            .into_iter()
            .map(|name| {
                let mut score = counts.get(&name).copied().unwrap_or(0);
                if top_rule_symptoms.contains(&name) {
                    score += self.config.boost;
                }
                SuggestedSymptom::new(name, score)
            })
            .collect();
        suggestions.sort_by(|a, b| b.score.cmp(&a.score));

        debug!(
            top = top.len(),
            suggestions = suggestions.len(),
            "suggested symptoms"
        );
        Ok(suggestions)
    }

    /// Scores diagnoses and derives suggestions in one call.
    pub fn diagnose(&self, reported: &ReportedSymptoms) -> RuleResult<Diagnosis> {
        let diagnoses = self.score_diagnoses(reported)?;
        let suggestions = self.suggest_symptoms(reported, &diagnoses)?;
        Ok(Diagnosis {
            diagnoses,
            suggestions,
        })
    }

    /// Loads the symptom names used for reference checks.
    ///
    /// `None` disables the check: either it is turned off, or the source
    /// lists no symptoms at all.
    fn known_symptoms(&self) -> RuleResult<Option<HashSet<String>>> {
        if !self.config.check_symptom_references {
            return Ok(None);
        }
        let symptoms = self.source.list_symptoms()?;
        if symptoms.is_empty() {
            warn!("rule source lists no symptoms; symptom reference check disabled");
            return Ok(None);
        }
        Ok(Some(symptoms.into_iter().map(|s| s.name).collect()))
    }

    /// Fetches a disease's groups, dropping those that name unknown symptoms.
    fn usable_groups(
        &self,
        disease: &str,
        known: Option<&HashSet<String>>,
    ) -> RuleResult<Vec<ConditionGroup>> {
        let groups = self.source.rules_for(disease)?;
        let Some(known) = known else {
            return Ok(groups);
        };

        Ok(groups
            .into_iter()
            .filter(|group| match group.iter().find(|s| !known.contains(*s)) {
                Some(missing) => {
                    warn!(
                        disease,
                        symptom = missing,
                        group = %group,
                        "condition group references unknown symptom; group skipped"
                    );
                    false
                }
                None => true,
            })
            .collect())
    }
}
