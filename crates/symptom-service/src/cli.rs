//! Command-line interface for `symptom-diagnose`.
//!
//! ```bash
//! # Build the data directory from a CSV bundle
//! symptom-diagnose --data-dir data import-csv --dir raw/
//!
//! # Rank diseases for a set of symptoms
//! symptom-diagnose --data-dir data diagnose -s fever -s cough --json
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use symptom_rules::{
    discover_csv_files, CsvFiles, DiagnosisConfig, ImportConfig, ImportStats, RuleResult, RuleStore,
};
use tracing::info;

use crate::api::DiagnosisReport;
use crate::service::{DiagnosisService, ServiceConfig};

/// Rule-based symptom to disease matcher.
#[derive(Parser, Debug)]
#[command(name = "symptom-diagnose")]
#[command(version, about = "Rank diseases by reported symptoms and suggest what to ask next")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding diseases.json and symptoms.json
    #[arg(long, env = "SYMPTOM_DATA_DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank diseases for the reported symptoms
    Diagnose(DiagnoseArgs),

    /// Import a CSV bundle (rules, descriptions, actions, severities)
    ImportCsv(ImportCsvArgs),

    /// Import rules from a disease x symptom association matrix
    ImportAssociations {
        /// Association matrix CSV
        matrix: PathBuf,

        /// Add to the existing data instead of replacing it
        #[arg(long)]
        merge: bool,
    },

    /// Write a deduplicated copy of the data to another directory
    Export {
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Show a disease's description and actions
    Show {
        /// Disease name
        disease: String,
    },

    /// List symptoms with their severity
    Symptoms,

    /// Print store counts
    Stats,
}

/// Arguments of `diagnose`.
#[derive(Args, Debug)]
pub struct DiagnoseArgs {
    /// Reported symptom (repeatable, or comma separated)
    #[arg(short, long = "symptom", value_delimiter = ',', required = true)]
    pub symptoms: Vec<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Number of top diagnoses used for suggestions
    #[arg(long, default_value_t = DiagnosisConfig::DEFAULT_TOP_N)]
    pub top_n: usize,

    /// Bonus for symptoms in the best diagnosis's rule
    #[arg(long, default_value_t = DiagnosisConfig::DEFAULT_BOOST)]
    pub boost: u32,

    /// Minimum score for a likely diagnosis
    #[arg(long, default_value_t = ServiceConfig::DEFAULT_LIKELY_THRESHOLD)]
    pub threshold: f64,

    /// Maximum number of suggestions
    #[arg(long, default_value_t = ServiceConfig::DEFAULT_MAX_SUGGESTIONS)]
    pub max_suggestions: usize,

    /// Score groups that name unregistered symptoms instead of skipping them
    #[arg(long)]
    pub no_reference_check: bool,
}

impl DiagnoseArgs {
    /// Builds the service configuration from the flags.
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            likely_threshold: self.threshold,
            max_suggestions: self.max_suggestions,
            diagnosis: DiagnosisConfig {
                top_n: self.top_n,
                boost: self.boost,
                check_symptom_references: !self.no_reference_check,
            },
        }
    }
}

/// Arguments of `import-csv`.
#[derive(Args, Debug)]
pub struct ImportCsvArgs {
    /// Directory to discover the four tables in
    #[arg(long, conflicts_with_all = ["rules", "descriptions", "actions", "severities"])]
    pub dir: Option<PathBuf>,

    /// Rules table (Disease,Symptom1,Symptom2,...)
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Descriptions table (Disease,Description)
    #[arg(long)]
    pub descriptions: Option<PathBuf>,

    /// Actions table (Disease,Action1,Action2,...)
    #[arg(long)]
    pub actions: Option<PathBuf>,

    /// Severity table (Symptom,Severity)
    #[arg(long)]
    pub severities: Option<PathBuf>,

    /// Tables have no header row
    #[arg(long)]
    pub no_headers: bool,

    /// Add to the existing data instead of replacing it
    #[arg(long)]
    pub merge: bool,
}

impl ImportCsvArgs {
    fn files(&self) -> RuleResult<CsvFiles> {
        match &self.dir {
            Some(dir) => discover_csv_files(dir),
            None => Ok(CsvFiles {
                rules_file: self.rules.clone(),
                description_file: self.descriptions.clone(),
                action_file: self.actions.clone(),
                severity_file: self.severities.clone(),
            }),
        }
    }
}

/// Runs a parsed command, writing human or JSON output to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = cli.data_dir.as_path();

    match &cli.command {
        Commands::Diagnose(args) => {
            let service = DiagnosisService::new(RuleStore::open(data_dir)?, args.service_config());
            let report = service.diagnose(&args.symptoms)?;
            if args.json {
                serde_json::to_writer_pretty(&mut *out, &report)?;
                writeln!(out)?;
            } else {
                write_report(out, &report)?;
            }
        }
        Commands::ImportCsv(args) => {
            let mut store = base_store(data_dir, args.merge)?;
            let config = ImportConfig {
                has_headers: !args.no_headers,
                ..Default::default()
            };
            let stats = store.load_csv_bundle(&args.files()?, &config)?;
            store.save(data_dir)?;
            write_import(out, &stats, data_dir)?;
        }
        Commands::ImportAssociations { matrix, merge } => {
            let mut store = base_store(data_dir, *merge)?;
            let stats = store.load_associations(matrix)?;
            store.save(data_dir)?;
            write_import(out, &stats, data_dir)?;
        }
        Commands::Export { out: target } => {
            let store = RuleStore::open(data_dir)?;
            store.save(target)?;
            info!(from = %data_dir.display(), to = %target.display(), "exported rule data");
            writeln!(
                out,
                "exported {} diseases to {}",
                store.export_catalog().len(),
                target.display()
            )?;
        }
        Commands::Show { disease } => {
            let service =
                DiagnosisService::new(RuleStore::open(data_dir)?, ServiceConfig::default());
            let details = service.disease_details(disease)?;
            writeln!(out, "{}", details.name)?;
            if let Some(description) = &details.description {
                writeln!(out, "  {description}")?;
            }
            writeln!(out, "  condition groups: {}", details.condition_groups)?;
            for action in &details.actions {
                writeln!(out, "  - {action}")?;
            }
        }
        Commands::Symptoms => {
            let service =
                DiagnosisService::new(RuleStore::open(data_dir)?, ServiceConfig::default());
            for entry in service.symptom_catalog() {
                writeln!(
                    out,
                    "{:<32} {:>4}  {}",
                    entry.name,
                    entry.severity.to_string(),
                    entry.level
                )?;
            }
        }
        Commands::Stats => {
            let service =
                DiagnosisService::new(RuleStore::open(data_dir)?, ServiceConfig::default());
            let stats = service.stats();
            writeln!(out, "diseases:               {}", stats.diseases)?;
            writeln!(out, "symptoms:               {}", stats.symptoms)?;
            writeln!(out, "condition groups:       {}", stats.condition_groups)?;
            writeln!(out, "diseases without rules: {}", stats.diseases_without_rules)?;
        }
    }

    Ok(())
}

/// Existing data when merging, an empty store otherwise.
fn base_store(data_dir: &Path, merge: bool) -> RuleResult<RuleStore> {
    if merge {
        RuleStore::open(data_dir)
    } else {
        Ok(RuleStore::new())
    }
}

fn write_import<W: Write>(
    out: &mut W,
    stats: &ImportStats,
    data_dir: &Path,
) -> std::io::Result<()> {
    writeln!(
        out,
        "imported {} rows ({} skipped): {} diseases, {} symptoms, \
         {} condition groups ({} duplicates removed) into {}",
        stats.rows_read,
        stats.rows_skipped,
        stats.diseases,
        stats.symptoms,
        stats.condition_groups,
        stats.duplicates_removed,
        data_dir.display()
    )
}

fn write_report<W: Write>(out: &mut W, report: &DiagnosisReport) -> std::io::Result<()> {
    if report.diagnoses.is_empty() {
        writeln!(out, "no matching diseases for: {}", report.reported.join(", "))?;
        return Ok(());
    }

    writeln!(out, "Diagnoses:")?;
    for diagnosis in &report.diagnoses {
        writeln!(out, "  {:>6.2}  {}", diagnosis.score, diagnosis.name)?;
    }

    if let Some(top) = &report.top {
        writeln!(out)?;
        writeln!(out, "Most likely: {}", top.name)?;
        if let Some(description) = &top.description {
            writeln!(out, "  {description}")?;
        }
        for action in &top.actions {
            writeln!(out, "  - {action}")?;
        }
    }

    if !report.suggestions.is_empty() {
        writeln!(out)?;
        writeln!(out, "Also ask about:")?;
        for suggestion in &report.suggestions {
            writeln!(
                out,
                "  {:>4}  {} (severity {}, {})",
                suggestion.score, suggestion.name, suggestion.severity, suggestion.level
            )?;
        }
    }
    Ok(())
}
