//! Error, configuration and statistics types.

use std::path::PathBuf;

use symptom_types::EmptyConditionGroup;
use thiserror::Error;

/// Errors raised by the rule store, data ingestion and the diagnosis engine.
#[derive(Error, Debug)]
pub enum RuleError {
    /// I/O error reading or writing a data file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The rule data source cannot be reached or initialised.
    #[error("Rule source unavailable: {path}")]
    SourceUnavailable {
        /// Location of the missing source.
        path: String,
    },

    /// Disease not found in the store.
    #[error("Disease not found: {name}")]
    DiseaseNotFound {
        /// The disease name that was looked up.
        name: String,
    },

    /// Symptom not found in the store.
    #[error("Symptom not found: {name}")]
    SymptomNotFound {
        /// The symptom name that was looked up.
        name: String,
    },

    /// A disease with this name already exists.
    #[error("Disease already exists: {name}")]
    DuplicateDisease {
        /// The conflicting disease name.
        name: String,
    },

    /// The disease's rule already contains a group with the same symptoms.
    #[error("Duplicate condition group for '{disease}': {group}")]
    DuplicateConditionGroup {
        /// Disease the group was added to.
        disease: String,
        /// Rendered group.
        group: String,
    },

    /// A condition group with no symptoms.
    #[error("Empty condition group: {0}")]
    EmptyConditionGroup(#[from] EmptyConditionGroup),

    /// Blank disease or symptom name.
    #[error("Invalid name: '{value}'")]
    InvalidName {
        /// The rejected value.
        value: String,
    },

    /// Severity value that is not an integer.
    #[error("Invalid severity '{value}' for symptom '{symptom}'")]
    InvalidSeverity {
        /// The symptom being updated.
        symptom: String,
        /// The rejected value.
        value: String,
    },

    /// Required CSV table missing from an import directory.
    #[error("Required CSV file not found: {file_type} in {directory}")]
    RequiredFileMissing {
        /// The tables that were missing.
        file_type: String,
        /// The directory that was searched.
        directory: String,
    },

    /// Invalid header - too few columns.
    #[error("Invalid header: expected at least {expected} columns, found {found}")]
    InvalidHeader {
        /// Minimum column count.
        expected: usize,
        /// Found column count.
        found: usize,
    },

    /// Generic parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;

/// Configuration for CSV ingestion.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Whether the first row of every table is a header.
    pub has_headers: bool,
    /// Whether to trim whitespace around every cell.
    pub trim: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            has_headers: true,
            trim: true,
        }
    }
}

/// Configuration for the diagnosis engine.
#[derive(Debug, Clone)]
pub struct DiagnosisConfig {
    /// Number of top-ranked diseases used to derive suggestions.
    pub top_n: usize,
    /// Added once to a suggestion that appears in the top disease's rule.
    pub boost: u32,
    /// Skip condition groups that name symptoms unknown to the source.
    pub check_symptom_references: bool,
}

impl DiagnosisConfig {
    /// Default number of diseases used for suggestions.
    pub const DEFAULT_TOP_N: usize = 5;
    /// Default top-disease boost.
    pub const DEFAULT_BOOST: u32 = 10;
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            top_n: Self::DEFAULT_TOP_N,
            boost: Self::DEFAULT_BOOST,
            check_symptom_references: true,
        }
    }
}

/// Statistics from an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows read across all tables.
    pub rows_read: usize,
    /// Rows skipped as blank, short or invalid.
    pub rows_skipped: usize,
    /// Condition groups dropped as set-identical duplicates.
    pub duplicates_removed: usize,
    /// Diseases registered.
    pub diseases: usize,
    /// Symptoms registered.
    pub symptoms: usize,
    /// Condition groups added.
    pub condition_groups: usize,
}

impl ImportStats {
    /// Adds another run's counters to this one.
    pub fn merge(&mut self, other: &ImportStats) {
        self.rows_read += other.rows_read;
        self.rows_skipped += other.rows_skipped;
        self.duplicates_removed += other.duplicates_removed;
        self.diseases += other.diseases;
        self.symptoms += other.symptoms;
        self.condition_groups += other.condition_groups;
    }
}

/// CSV tables making up a full import bundle.
#[derive(Debug, Clone, Default)]
pub struct CsvFiles {
    /// `Disease,Symptom1,Symptom2,...` rule rows.
    pub rules_file: Option<PathBuf>,
    /// `Disease,Description` rows.
    pub description_file: Option<PathBuf>,
    /// `Disease,Action1,Action2,...` rows.
    pub action_file: Option<PathBuf>,
    /// `Symptom,Severity` rows.
    pub severity_file: Option<PathBuf>,
}

impl CsvFiles {
    /// Creates an empty file set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every table is present.
    pub fn has_required_files(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// Returns a list of missing tables.
    pub fn missing_files(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.rules_file.is_none() {
            missing.push("Rules");
        }
        if self.description_file.is_none() {
            missing.push("Description");
        }
        if self.action_file.is_none() {
            missing.push("Action");
        }
        if self.severity_file.is_none() {
            missing.push("Severity");
        }
        missing
    }
}
