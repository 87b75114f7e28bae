//! CSV discovery and bulk loading into a [`RuleStore`].
//!
//! With the `parallel` feature (default) the tables of a bundle are parsed
//! concurrently via rayon.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use symptom_types::{ConditionGroup, Severity};
use tracing::{info, warn};

use crate::action::ActionRow;
use crate::association::AssociationMatrix;
use crate::dedup::dedup_condition_groups;
use crate::description::DescriptionRow;
use crate::parser::CsvTableParser;
use crate::rule_row::RuleRow;
use crate::severity::SeverityRow;
use crate::store::RuleStore;
use crate::types::{CsvFiles, ImportConfig, ImportStats, RuleError, RuleResult};

/// Discovers the CSV tables of an import bundle in a directory.
///
/// Files are matched case-insensitively by name: `*severity*` holds symptom
/// severities, `*description*` disease descriptions, `*precaution*` or
/// `*action*` disease actions, and `dataset*` or `*rules*` the rule rows.
pub fn discover_csv_files<P: AsRef<Path>>(path: P) -> RuleResult<CsvFiles> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(RuleError::SourceUnavailable {
            path: path.display().to_string(),
        });
    }

    let mut files = CsvFiles::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let filename = entry.file_name().to_string_lossy().to_lowercase();

        if !filename.ends_with(".csv") {
            continue;
        }

        if filename.contains("severity") {
            files.severity_file = Some(entry.path());
        } else if filename.contains("description") {
            files.description_file = Some(entry.path());
        } else if filename.contains("precaution") || filename.contains("action") {
            files.action_file = Some(entry.path());
        } else if filename.starts_with("dataset") || filename.contains("rules") {
            files.rules_file = Some(entry.path());
        }
    }

    if !files.has_required_files() {
        return Err(RuleError::RequiredFileMissing {
            file_type: files.missing_files().join(", "),
            directory: path.display().to_string(),
        });
    }

    Ok(files)
}

/// Groups rule rows per disease, keeping first-seen disease order.
fn group_rule_rows(rows: Vec<RuleRow>) -> Vec<(String, Vec<ConditionGroup>)> {
    let mut order: Vec<String> = Vec::new();
    let mut by_disease: BTreeMap<String, Vec<ConditionGroup>> = BTreeMap::new();
    for row in rows {
        by_disease
            .entry(row.disease.clone())
            .or_insert_with(|| {
                order.push(row.disease.clone());
                Vec::new()
            })
            .push(row.group);
    }
    order
        .into_iter()
        .map(|name| {
            let groups = by_disease.remove(&name).unwrap_or_default();
            (name, groups)
        })
        .collect()
}

impl RuleStore {
    /// Loads a full CSV bundle: rules, descriptions, actions and severities.
    ///
    /// Every disease and symptom named in any table is registered first;
    /// descriptions, actions and severities are applied next, and the rules
    /// last, after removing set-identical duplicate groups per disease.
    pub fn load_csv_bundle(
        &mut self,
        files: &CsvFiles,
        config: &ImportConfig,
    ) -> RuleResult<ImportStats> {
        if !files.has_required_files() {
            return Err(RuleError::RequiredFileMissing {
                file_type: files.missing_files().join(", "),
                directory: "import bundle".to_string(),
            });
        }

        let mut stats = ImportStats::default();

        let (rules, descriptions, actions, severities) = read_bundle(files, config);
        let (rule_rows, s) = rules?;
        stats.merge(&s);
        let (descriptions, s) = descriptions?;
        stats.merge(&s);
        let (actions, s) = actions?;
        stats.merge(&s);
        let (severities, s) = severities?;
        stats.merge(&s);

        // Register every disease and symptom before anything refers to them
        let disease_names = rule_rows
            .iter()
            .map(|r| r.disease.as_str())
            .chain(descriptions.iter().map(|r| r.disease.as_str()))
            .chain(actions.iter().map(|r| r.disease.as_str()));
        for name in disease_names {
            if self.add_disease(name)? {
                stats.diseases += 1;
            }
        }
        let symptom_names = rule_rows
            .iter()
            .flat_map(|r| r.group.iter())
            .chain(severities.iter().map(|r| r.symptom.as_str()));
        for name in symptom_names {
            if self.add_symptom(name, Severity::UNKNOWN)? {
                stats.symptoms += 1;
            }
        }

        for row in &descriptions {
            self.update_disease_description(&row.disease, &row.description)?;
        }
        for row in &actions {
            for action in &row.actions {
                self.add_disease_action(&row.disease, action)?;
            }
        }
        for row in &severities {
            match row.severity {
                Some(severity) => self.update_symptom_severity(&row.symptom, severity)?,
                None => {
                    stats.rows_skipped += 1;
                    warn!(
                        symptom = %row.symptom,
                        "unreadable severity; symptom kept as unknown"
                    );
                }
            }
        }

        let rule_stats = self.apply_rule_rows(rule_rows)?;
        stats.merge(&rule_stats);

        info!(
            diseases = stats.diseases,
            symptoms = stats.symptoms,
            groups = stats.condition_groups,
            duplicates = stats.duplicates_removed,
            skipped = stats.rows_skipped,
            "CSV bundle import complete"
        );
        Ok(stats)
    }

    /// Loads rules from a disease/symptom association matrix.
    ///
    /// Diseases and symptoms named by the matrix are registered as needed.
    pub fn load_associations<P: AsRef<Path>>(&mut self, path: P) -> RuleResult<ImportStats> {
        let matrix = AssociationMatrix::from_path(path)?;
        let mut stats = matrix.stats.clone();

        for name in &matrix.symptoms {
            if self.add_symptom(name, Severity::UNKNOWN)? {
                stats.symptoms += 1;
            }
        }
        for row in &matrix.rows {
            if self.add_disease(&row.disease)? {
                stats.diseases += 1;
            }
        }

        let rule_stats = self.apply_rule_rows(matrix.rows)?;
        stats.merge(&rule_stats);

        info!(
            diseases = stats.diseases,
            groups = stats.condition_groups,
            duplicates = stats.duplicates_removed,
            "association matrix import complete"
        );
        Ok(stats)
    }

    /// Deduplicates rule rows per disease and appends them.
    fn apply_rule_rows(&mut self, rows: Vec<RuleRow>) -> RuleResult<ImportStats> {
        let mut stats = ImportStats::default();
        for (disease, groups) in group_rule_rows(rows) {
            let offered = groups.len();
            let (unique, removed) = dedup_condition_groups(groups);
            let added = self.add_rule(&disease, unique)?;
            stats.duplicates_removed += removed + (offered - removed - added);
            stats.condition_groups += added;
        }
        Ok(stats)
    }
}

type Table<T> = RuleResult<(Vec<T>, ImportStats)>;
type BundleTables = (
    Table<RuleRow>,
    Table<DescriptionRow>,
    Table<ActionRow>,
    Table<SeverityRow>,
);

/// Parses the four bundle tables concurrently.
#[cfg(feature = "parallel")]
fn read_bundle(files: &CsvFiles, config: &ImportConfig) -> BundleTables {
    let ((rules, descriptions), (actions, severities)) = rayon::join(
        || {
            rayon::join(
                || read_table::<RuleRow>(files.rules_file.as_deref(), config),
                || read_table::<DescriptionRow>(files.description_file.as_deref(), config),
            )
        },
        || {
            rayon::join(
                || read_table::<ActionRow>(files.action_file.as_deref(), config),
                || read_table::<SeverityRow>(files.severity_file.as_deref(), config),
            )
        },
    );
    (rules, descriptions, actions, severities)
}

/// Parses the four bundle tables one after another.
#[cfg(not(feature = "parallel"))]
fn read_bundle(files: &CsvFiles, config: &ImportConfig) -> BundleTables {
    (
        read_table::<RuleRow>(files.rules_file.as_deref(), config),
        read_table::<DescriptionRow>(files.description_file.as_deref(), config),
        read_table::<ActionRow>(files.action_file.as_deref(), config),
        read_table::<SeverityRow>(files.severity_file.as_deref(), config),
    )
}

fn read_table<T: crate::parser::CsvRecord>(
    path: Option<&Path>,
    config: &ImportConfig,
) -> Table<T> {
    match path {
        Some(path) => CsvTableParser::<_, T>::from_path(path, config)?.parse_all(),
        None => {
            warn!(table = T::TABLE, "no file given for table");
            Ok((Vec::new(), ImportStats::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::RuleSource;
    use std::fs::File;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    fn write_bundle(dir: &Path) {
        write_file(
            dir,
            "dataset.csv",
            "\
Disease,Symptom_1,Symptom_2,Symptom_3
Fungal infection,itching, skin_rash, nodal_skin_eruptions
Fungal infection, skin_rash,itching,nodal_skin_eruptions
Fungal infection,itching,skin_rash,
Allergy,continuous_sneezing,shivering,chills
",
        );
        write_file(
            dir,
            "symptom_Description.csv",
            "\
Disease,Description
Fungal infection,In humans fungal infections occur when an invading fungus takes over.
Allergy,An allergy is an immune system response to a foreign substance.
Migraine,A headache disorder.
",
        );
        write_file(
            dir,
            "symptom_precaution.csv",
            "\
Disease,Precaution_1,Precaution_2
Fungal infection,bath twice,use clean cloths
Allergy,apply calamine,
",
        );
        write_file(
            dir,
            "Symptom-severity.csv",
            "\
Symptom,weight
itching,1
skin_rash,3
chills,3
stomach_pain,five
",
        );
    }

    #[test]
    fn test_discover_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        write_file(dir.path(), "notes.txt", "ignored");

        let files = discover_csv_files(dir.path()).unwrap();
        assert!(files.has_required_files());
        assert!(files
            .rules_file
            .as_ref()
            .unwrap()
            .ends_with("dataset.csv"));
    }

    #[test]
    fn test_discover_reports_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "dataset.csv", "Disease,Symptom_1\n");

        let err = discover_csv_files(dir.path()).unwrap_err();
        match err {
            RuleError::RequiredFileMissing { file_type, .. } => {
                assert_eq!(file_type, "Description, Action, Severity");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(matches!(
            discover_csv_files(dir.path().join("missing")),
            Err(RuleError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_load_csv_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_bundle(dir.path());
        let files = discover_csv_files(dir.path()).unwrap();

        let mut store = RuleStore::new();
        let stats = store.load_csv_bundle(&files, &ImportConfig::default()).unwrap();

        assert_eq!(store.disease_count(), 3);
        assert_eq!(stats.diseases, 3);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(stats.condition_groups, 3);
        assert_eq!(stats.rows_skipped, 1);

        let fungal = store.rules_for("Fungal infection").unwrap();
        assert_eq!(fungal.len(), 2);
        assert_eq!(
            fungal[0].symptoms(),
            ["itching", "skin_rash", "nodal_skin_eruptions"]
        );

        assert_eq!(store.severity_of("skin_rash"), Severity::known(3));
        assert!(store.severity_of("shivering").is_unknown());
        assert!(store.has_symptom("stomach_pain"));
        assert!(store.severity_of("stomach_pain").is_unknown());
        assert_eq!(store.symptom_count(), 7);
        assert_eq!(
            store.actions_for("Allergy").unwrap(),
            vec!["apply calamine"]
        );
        assert!(store.rules_for("Migraine").unwrap().is_empty());
        assert!(store
            .description_for("Migraine")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_load_associations() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "clean.data.csv",
            "\
Disease,fever,cough,rash
Flu,1,1,0
Flu,1,1,0
Measles,1,0,1
",
        );

        let mut store = RuleStore::new();
        let stats = store
            .load_associations(dir.path().join("clean.data.csv"))
            .unwrap();

        assert_eq!(stats.symptoms, 3);
        assert_eq!(stats.diseases, 2);
        assert_eq!(stats.condition_groups, 2);
        assert_eq!(stats.duplicates_removed, 1);
        assert_eq!(store.rules_for("Measles").unwrap()[0].symptoms(), ["fever", "rash"]);
    }
}
