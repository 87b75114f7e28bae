//! JSON import and export of rule data.
//!
//! A store directory holds two files: [`DISEASES_FILE`], a
//! [`DiseaseCatalog`], and [`SYMPTOMS_FILE`], a [`SeverityCatalog`].

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use symptom_types::{DiseaseCatalog, DiseaseRecord, SeverityCatalog};
use tracing::{info, warn};

use crate::dedup::dedup_condition_groups;
use crate::store::RuleStore;
use crate::types::{ImportStats, RuleError, RuleResult};

/// Disease catalog file name inside a store directory.
pub const DISEASES_FILE: &str = "diseases.json";
/// Symptom severity file name inside a store directory.
pub const SYMPTOMS_FILE: &str = "symptoms.json";

/// Reads a JSON document from a file.
pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> RuleResult<T> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(RuleError::SourceUnavailable {
            path: path.display().to_string(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Writes a value as pretty-printed JSON.
pub fn write_json<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> RuleResult<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

impl RuleStore {
    /// Builds a store from interchange catalogs.
    ///
    /// Symptoms are registered first. Empty condition groups are skipped. A
    /// disease whose rule names a symptom missing from `symptoms` keeps its
    /// description and actions but gets no rule. Both are logged and counted
    /// in [`ImportStats::rows_skipped`].
    pub fn from_catalogs(
        diseases: DiseaseCatalog,
        symptoms: SeverityCatalog,
    ) -> RuleResult<(Self, ImportStats)> {
        let mut store = RuleStore::with_capacity(diseases.len(), symptoms.len());
        let mut stats = ImportStats::default();

        for (name, severity) in &symptoms {
            stats.rows_read += 1;
            if store.add_symptom(name, *severity)? {
                stats.symptoms += 1;
            }
        }

        for (name, record) in diseases {
            stats.rows_read += 1;
            if store.add_disease(&name)? {
                stats.diseases += 1;
            }
            if let Some(description) = &record.description {
                store.update_disease_description(&name, description)?;
            }
            for action in &record.actions {
                store.add_disease_action(&name, action)?;
            }
            if record.rules.is_empty() {
                warn!(disease = %name, "disease has no rules in catalog");
                continue;
            }

            let mut groups = Vec::with_capacity(record.rules.len());
            for (index, group) in record.condition_groups().enumerate() {
                match group {
                    Ok(group) => groups.push(group),
                    Err(_) => {
                        stats.rows_skipped += 1;
                        warn!(disease = %name, group = index, "empty condition group skipped");
                    }
                }
            }
            if groups.is_empty() {
                continue;
            }

            let offered = groups.len();
            match store.add_rule(&name, groups) {
                Ok(added) => {
                    stats.condition_groups += added;
                    stats.duplicates_removed += offered - added;
                }
                Err(RuleError::SymptomNotFound { name: symptom }) => {
                    stats.rows_skipped += 1;
                    warn!(
                        disease = %name,
                        symptom = %symptom,
                        "rule references unknown symptom; rule skipped"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok((store, stats))
    }

    /// Opens a store saved in `dir`.
    ///
    /// Fails with [`RuleError::SourceUnavailable`] if the directory or either
    /// file is missing.
    pub fn open<P: AsRef<Path>>(dir: P) -> RuleResult<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(RuleError::SourceUnavailable {
                path: dir.display().to_string(),
            });
        }

        let diseases: DiseaseCatalog = read_json(dir.join(DISEASES_FILE))?;
        let symptoms: SeverityCatalog = read_json(dir.join(SYMPTOMS_FILE))?;
        let (store, stats) = Self::from_catalogs(diseases, symptoms)?;

        info!(
            path = %dir.display(),
            diseases = stats.diseases,
            symptoms = stats.symptoms,
            groups = stats.condition_groups,
            "opened rule store"
        );
        Ok(store)
    }

    /// Saves the store into `dir`, creating it if needed.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> RuleResult<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        write_json(dir.join(DISEASES_FILE), &self.export_catalog())?;
        write_json(dir.join(SYMPTOMS_FILE), &self.export_severities())?;
        Ok(())
    }

    /// Exports every disease that has a rule.
    ///
    /// Rules are deduplicated; diseases left without a rule are omitted.
    pub fn export_catalog(&self) -> DiseaseCatalog {
        let mut catalog = DiseaseCatalog::new();
        let mut removed_total = 0;
        let mut omitted = 0;

        for disease in self.diseases() {
            let rule = self.get_rule(&disease.name).unwrap_or(&[]);
            let (rules, removed) = dedup_condition_groups(rule.to_vec());
            removed_total += removed;
            if rules.is_empty() {
                omitted += 1;
                continue;
            }
            catalog.insert(
                disease.name.clone(),
                DiseaseRecord::from_disease(disease, rules),
            );
        }

        if removed_total > 0 || omitted > 0 {
            info!(
                duplicates = removed_total,
                omitted, "exported disease catalog"
            );
        }
        catalog
    }

    /// Exports every symptom's severity.
    pub fn export_severities(&self) -> SeverityCatalog {
        self.symptoms()
            .map(|s| (s.name.clone(), s.severity))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RuleSource;
    use symptom_types::{ConditionGroup, Severity};

    fn make_test_store() -> RuleStore {
        let mut store = RuleStore::new();
        store.add_symptom("fever", Severity::known(5)).unwrap();
        store.add_symptom("cough", Severity::UNKNOWN).unwrap();
        store.add_symptom("rash", Severity::known(3)).unwrap();
        store
            .add_disease_with_description("Flu", "Seasonal influenza")
            .unwrap();
        store.add_disease_action("Flu", "rest").unwrap();
        store
            .add_rule(
                "Flu",
                vec![
                    ConditionGroup::new(["fever", "cough"]).unwrap(),
                    ConditionGroup::new(["rash"]).unwrap(),
                ],
            )
            .unwrap();
        store.add_disease("Unruled").unwrap();
        store
    }

    #[test]
    fn test_export_omits_diseases_without_rules() {
        let store = make_test_store();
        let catalog = store.export_catalog();

        assert_eq!(catalog.len(), 1);
        let flu = &catalog["Flu"];
        assert_eq!(flu.rules.len(), 2);
        assert_eq!(flu.description.as_deref(), Some("Seasonal influenza"));
        assert_eq!(flu.actions, vec!["rest"]);

        let severities = store.export_severities();
        assert_eq!(severities["fever"], Severity::known(5));
        assert!(severities["cough"].is_unknown());
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = make_test_store();
        store.save(dir.path()).unwrap();

        let text = fs::read_to_string(dir.path().join(SYMPTOMS_FILE)).unwrap();
        assert!(text.contains("\"cough\": \"N/A\""));

        let reopened = RuleStore::open(dir.path()).unwrap();
        assert_eq!(reopened.disease_count(), 1);
        assert_eq!(reopened.symptom_count(), 3);
        assert_eq!(reopened.rules_for("Flu").unwrap().len(), 2);
        assert_eq!(reopened.actions_for("Flu").unwrap(), vec!["rest"]);
    }

    #[test]
    fn test_open_skips_empty_condition_group() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(DISEASES_FILE),
            r#"{"Flu":{"rules":[["fever"],[]]},"Cold":{"rules":[["cough"]]}}"#,
        )
        .unwrap();
        fs::write(dir.path().join(SYMPTOMS_FILE), r#"{"fever":5,"cough":"N/A"}"#).unwrap();

        let store = RuleStore::open(dir.path()).unwrap();
        assert_eq!(store.disease_count(), 2);
        let flu = store.rules_for("Flu").unwrap();
        assert_eq!(flu.len(), 1);
        assert_eq!(flu[0].symptoms(), ["fever"]);
        assert_eq!(store.rules_for("Cold").unwrap().len(), 1);
    }

    #[test]
    fn test_from_catalogs_counts_empty_groups() {
        let diseases: DiseaseCatalog =
            serde_json::from_str(r#"{ "Flu": { "rules": [[], [" "], ["fever"]] } }"#).unwrap();
        let symptoms: SeverityCatalog = serde_json::from_str(r#"{ "fever": 5 }"#).unwrap();

        let (store, stats) = RuleStore::from_catalogs(diseases, symptoms).unwrap();
        assert_eq!(stats.rows_skipped, 2);
        assert_eq!(stats.condition_groups, 1);
        assert_eq!(store.condition_group_count(), 1);
    }

    #[test]
    fn test_open_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RuleStore::open(dir.path().join("nope")),
            Err(RuleError::SourceUnavailable { .. })
        ));
        // Directory exists but holds no catalog
        assert!(matches!(
            RuleStore::open(dir.path()),
            Err(RuleError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_from_catalogs_skips_rule_with_unknown_symptom() {
        let diseases: DiseaseCatalog = serde_json::from_str(
            r#"{
                "Flu": { "rules": [["fever", "cough"], ["cough", "fever"]], "actions": ["rest"] },
                "Ghost": { "rules": [["ectoplasm"]], "description": "Not real" }
            }"#,
        )
        .unwrap();
        let symptoms: SeverityCatalog =
            serde_json::from_str(r#"{ "fever": 5, "cough": "N/A" }"#).unwrap();

        let (store, stats) = RuleStore::from_catalogs(diseases, symptoms).unwrap();

        assert_eq!(stats.diseases, 2);
        assert_eq!(stats.condition_groups, 1);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.rows_skipped, 1);
        assert!(store.rules_for("Ghost").unwrap().is_empty());
        assert_eq!(
            store.description_for("Ghost").unwrap().as_deref(),
            Some("Not real")
        );
    }
}
