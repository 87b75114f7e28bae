//! In-memory rule store.
//!
//! Holds diseases, symptoms and each disease's rule (OR-list of condition
//! groups) and implements [`RuleSource`] for the diagnosis engine.
//!
//! ```ignore
//! let mut store = RuleStore::new();
//! store.add_symptom("fever", Severity::known(5))?;
//! store.add_symptom("cough", Severity::known(4))?;
//! store.add_disease("Common Cold")?;
//! store.add_condition_group("Common Cold", ["fever", "cough"])?;
//! ```

use std::collections::HashMap;

use symptom_types::{ConditionGroup, Disease, DiseaseSummary, Severity, Symptom};
use tracing::{debug, warn};

use crate::dedup::dedup_condition_groups;
use crate::parser::parse;
use crate::source::RuleSource;
use crate::types::{RuleError, RuleResult};

#[derive(Debug, Clone)]
struct DiseaseEntry {
    disease: Disease,
    rule: Vec<ConditionGroup>,
}

/// In-memory store for diseases, symptoms and rules.
///
/// Diseases and symptoms are enumerated in insertion order.
#[derive(Default)]
pub struct RuleStore {
    /// Diseases (with their rule) indexed by name.
    diseases: HashMap<String, DiseaseEntry>,
    /// Disease names in insertion order.
    disease_order: Vec<String>,
    /// Symptoms indexed by name.
    symptoms: HashMap<String, Symptom>,
    /// Symptom names in insertion order.
    symptom_order: Vec<String>,
}

impl std::fmt::Debug for RuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleStore")
            .field("diseases", &self.diseases.len())
            .field("symptoms", &self.symptoms.len())
            .field("condition_groups", &self.condition_group_count())
            .finish()
    }
}

impl RuleStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with pre-allocated capacity.
    pub fn with_capacity(disease_count: usize, symptom_count: usize) -> Self {
        Self {
            diseases: HashMap::with_capacity(disease_count),
            disease_order: Vec::with_capacity(disease_count),
            symptoms: HashMap::with_capacity(symptom_count),
            symptom_order: Vec::with_capacity(symptom_count),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DISEASES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a disease if it does not exist yet.
    ///
    /// Returns true if the disease was inserted, false if it already existed.
    pub fn add_disease(&mut self, name: &str) -> RuleResult<bool> {
        let name = parse::name(name)?;
        if self.diseases.contains_key(&name) {
            return Ok(false);
        }
        self.disease_order.push(name.clone());
        self.diseases.insert(
            name.clone(),
            DiseaseEntry {
                disease: Disease::new(name),
                rule: Vec::new(),
            },
        );
        Ok(true)
    }

    /// Adds a new disease with a description.
    ///
    /// Fails with [`RuleError::DuplicateDisease`] if the name is taken.
    pub fn add_disease_with_description(
        &mut self,
        name: &str,
        description: &str,
    ) -> RuleResult<()> {
        if !self.add_disease(name)? {
            return Err(RuleError::DuplicateDisease {
                name: name.trim().to_string(),
            });
        }
        self.update_disease_description(name, description)
    }

    /// Replaces a disease's description. A blank description clears it.
    pub fn update_disease_description(&mut self, name: &str, description: &str) -> RuleResult<()> {
        let entry = self.entry_mut(name)?;
        let description = description.trim();
        entry.disease.description = if description.is_empty() {
            None
        } else {
            Some(description.to_string())
        };
        Ok(())
    }

    /// Appends a recommended action to a disease.
    pub fn add_disease_action(&mut self, name: &str, action: &str) -> RuleResult<()> {
        let action = parse::name(action)?;
        self.entry_mut(name)?.disease.actions.push(action);
        Ok(())
    }

    /// Deletes a disease together with its rule and condition groups.
    pub fn delete_disease(&mut self, name: &str) -> RuleResult<Disease> {
        let name = name.trim();
        let entry = self
            .diseases
            .remove(name)
            .ok_or_else(|| RuleError::DiseaseNotFound {
                name: name.to_string(),
            })?;
        self.disease_order.retain(|n| n != name);
        debug!(
            disease = name,
            groups = entry.rule.len(),
            "deleted disease and its rule"
        );
        Ok(entry.disease)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SYMPTOMS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Adds a symptom.
    ///
    /// If the symptom already exists and `severity` is known, its severity
    /// is updated. Returns true if the symptom was inserted.
    pub fn add_symptom(&mut self, name: &str, severity: Severity) -> RuleResult<bool> {
        let name = parse::name(name)?;
        if let Some(existing) = self.symptoms.get_mut(&name) {
            if !severity.is_unknown() {
                existing.severity = severity;
            }
            return Ok(false);
        }
        self.symptom_order.push(name.clone());
        self.symptoms
            .insert(name.clone(), Symptom::new(name, severity));
        Ok(true)
    }

    /// Sets a symptom's severity.
    pub fn update_symptom_severity(&mut self, name: &str, severity: Severity) -> RuleResult<()> {
        let name = name.trim();
        let symptom = self
            .symptoms
            .get_mut(name)
            .ok_or_else(|| RuleError::SymptomNotFound {
                name: name.to_string(),
            })?;
        symptom.severity = severity;
        Ok(())
    }

    /// Deletes a symptom and removes it from every condition group.
    ///
    /// Groups shrink but are kept; a group left with no symptom is dropped.
    pub fn delete_symptom(&mut self, name: &str) -> RuleResult<Symptom> {
        let name = name.trim();
        let symptom = self
            .symptoms
            .remove(name)
            .ok_or_else(|| RuleError::SymptomNotFound {
                name: name.to_string(),
            })?;
        self.symptom_order.retain(|n| n != name);

        let mut emptied = 0;
        for entry in self.diseases.values_mut() {
            let before = entry.rule.len();
            entry.rule = entry
                .rule
                .iter()
                .filter_map(|group| group.without(name))
                .collect();
            emptied += before - entry.rule.len();
        }
        if emptied > 0 {
            warn!(
                symptom = name,
                groups = emptied,
                "dropped condition groups left empty by symptom deletion"
            );
        }

        Ok(symptom)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // RULES
    // ═══════════════════════════════════════════════════════════════════════════

    /// Appends several condition groups to a disease's rule.
    ///
    /// All-or-nothing: every referenced symptom must exist, otherwise nothing
    /// is added. Groups already present in the rule (by set identity) are
    /// skipped. Returns the number of groups added.
    pub fn add_rule(&mut self, disease: &str, groups: Vec<ConditionGroup>) -> RuleResult<usize> {
        self.entry(disease)?;
        if let Some(missing) = groups
            .iter()
            .flat_map(|g| g.iter())
            .find(|s| !self.symptoms.contains_key(*s))
        {
            return Err(RuleError::SymptomNotFound {
                name: missing.to_string(),
            });
        }

        let (groups, _) = dedup_condition_groups(groups);
        let entry = self.entry_mut(disease)?;
        let mut added = 0;
        for group in groups {
            if entry.rule.iter().any(|g| g.same_set_as(&group)) {
                continue;
            }
            entry.rule.push(group);
            added += 1;
        }
        Ok(added)
    }

    /// Appends one condition group to a disease's rule.
    ///
    /// Unknown symptoms are skipped with a warning. Fails if no known symptom
    /// remains or the rule already holds the same set.
    pub fn add_condition_group<I, S>(
        &mut self,
        disease: &str,
        symptoms: I,
    ) -> RuleResult<ConditionGroup>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.entry(disease)?;

        let mut known = Vec::new();
        for symptom in symptoms {
            let name = symptom.as_ref().trim();
            if self.symptoms.contains_key(name) {
                known.push(name.to_string());
            } else if !name.is_empty() {
                warn!(disease, symptom = name, "unknown symptom skipped for condition group");
            }
        }
        let group = ConditionGroup::new(known)?;

        let entry = self.entry_mut(disease)?;
        if entry.rule.iter().any(|g| g.same_set_as(&group)) {
            return Err(RuleError::DuplicateConditionGroup {
                disease: entry.disease.name.clone(),
                group: group.to_string(),
            });
        }
        entry.rule.push(group.clone());
        Ok(group)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // LOOKUPS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Gets a disease by name.
    pub fn get_disease(&self, name: &str) -> Option<&Disease> {
        self.diseases.get(name.trim()).map(|e| &e.disease)
    }

    /// Checks if a disease exists.
    pub fn has_disease(&self, name: &str) -> bool {
        self.diseases.contains_key(name.trim())
    }

    /// Gets a symptom by name.
    pub fn get_symptom(&self, name: &str) -> Option<&Symptom> {
        self.symptoms.get(name.trim())
    }

    /// Checks if a symptom exists.
    pub fn has_symptom(&self, name: &str) -> bool {
        self.symptoms.contains_key(name.trim())
    }

    /// Gets a symptom's severity; unknown if the symptom does not exist.
    pub fn severity_of(&self, name: &str) -> Severity {
        self.get_symptom(name)
            .map(|s| s.severity)
            .unwrap_or(Severity::UNKNOWN)
    }

    /// Gets the stored condition groups of a disease, as inserted.
    pub fn get_rule(&self, name: &str) -> Option<&[ConditionGroup]> {
        self.diseases.get(name.trim()).map(|e| e.rule.as_slice())
    }

    /// Iterates over diseases in insertion order.
    pub fn diseases(&self) -> impl Iterator<Item = &Disease> {
        self.disease_order
            .iter()
            .filter_map(|n| self.diseases.get(n))
            .map(|e| &e.disease)
    }

    /// Iterates over symptoms in insertion order.
    pub fn symptoms(&self) -> impl Iterator<Item = &Symptom> {
        self.symptom_order
            .iter()
            .filter_map(|n| self.symptoms.get(n))
    }

    /// Returns the number of diseases.
    pub fn disease_count(&self) -> usize {
        self.diseases.len()
    }

    /// Returns the number of symptoms.
    pub fn symptom_count(&self) -> usize {
        self.symptoms.len()
    }

    /// Returns the number of stored condition groups across all diseases.
    pub fn condition_group_count(&self) -> usize {
        self.diseases.values().map(|e| e.rule.len()).sum()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.diseases.is_empty() && self.symptoms.is_empty()
    }

    fn entry(&self, name: &str) -> RuleResult<&DiseaseEntry> {
        let name = name.trim();
        self.diseases
            .get(name)
            .ok_or_else(|| RuleError::DiseaseNotFound {
                name: name.to_string(),
            })
    }

    fn entry_mut(&mut self, name: &str) -> RuleResult<&mut DiseaseEntry> {
        let name = name.trim();
        self.diseases
            .get_mut(name)
            .ok_or_else(|| RuleError::DiseaseNotFound {
                name: name.to_string(),
            })
    }
}

impl RuleSource for RuleStore {
    fn list_diseases(&self) -> RuleResult<Vec<DiseaseSummary>> {
        Ok(self.diseases().map(Disease::summary).collect())
    }

    fn rules_for(&self, disease: &str) -> RuleResult<Vec<ConditionGroup>> {
        let Some(rule) = self.get_rule(disease) else {
            return Ok(Vec::new());
        };
        // Symptom deletion can leave two groups with the same set
        let (groups, _) = dedup_condition_groups(rule.to_vec());
        Ok(groups)
    }

    fn description_for(&self, disease: &str) -> RuleResult<Option<String>> {
        Ok(self
            .get_disease(disease)
            .and_then(|d| d.description.clone()))
    }

    fn actions_for(&self, disease: &str) -> RuleResult<Vec<String>> {
        Ok(self
            .get_disease(disease)
            .map(|d| d.actions.clone())
            .unwrap_or_default())
    }

    fn list_symptoms(&self) -> RuleResult<Vec<Symptom>> {
        Ok(self.symptoms().cloned().collect())
    }
}
