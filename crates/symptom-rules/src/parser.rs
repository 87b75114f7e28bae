//! Generic CSV table parser.
//!
//! Provides a streaming parser for the comma-separated tables used to import
//! rule data. Rows that cannot be turned into a record are skipped and
//! counted; I/O and CSV framing errors abort the parse.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use tracing::warn;

use crate::types::{ImportConfig, ImportStats, RuleError, RuleResult};

/// Trait for types that can be parsed from a CSV row.
pub trait CsvRecord: Sized {
    /// Table name used in log messages.
    const TABLE: &'static str;

    /// Minimum number of columns a usable row must have.
    const MIN_COLUMNS: usize;

    /// Parse a record from a CSV row.
    fn from_record(record: &StringRecord) -> RuleResult<Self>;
}

/// A streaming parser for CSV tables.
pub struct CsvTableParser<R: Read, T: CsvRecord> {
    reader: Reader<R>,
    records_read: usize,
    records_skipped: usize,
    _marker: PhantomData<T>,
}

impl<T: CsvRecord> CsvTableParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or has an invalid header.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &ImportConfig) -> RuleResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RuleError::SourceUnavailable {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), config)
    }
}

impl<R: Read, T: CsvRecord> CsvTableParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R, config: &ImportConfig) -> RuleResult<Self> {
        let mut csv_reader = table_reader(reader, config);

        if config.has_headers {
            let found = csv_reader.headers()?.len();
            if found < T::MIN_COLUMNS {
                return Err(RuleError::InvalidHeader {
                    expected: T::MIN_COLUMNS,
                    found,
                });
            }
        }

        Ok(Self {
            reader: csv_reader,
            records_read: 0,
            records_skipped: 0,
            _marker: PhantomData,
        })
    }

    /// Returns the number of data rows read so far.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Returns the number of rows skipped so far.
    pub fn records_skipped(&self) -> usize {
        self.records_skipped
    }

    /// Returns read and skip counters as import statistics.
    pub fn stats(&self) -> ImportStats {
        ImportStats {
            rows_read: self.records_read,
            rows_skipped: self.records_skipped,
            ..Default::default()
        }
    }

    /// Parses all rows into a Vec.
    ///
    /// Rows that fail to parse are logged and skipped; I/O and CSV framing
    /// errors are returned.
    pub fn parse_all(mut self) -> RuleResult<(Vec<T>, ImportStats)> {
        let mut results = Vec::new();
        while let Some(item) = self.next() {
            match item {
                Ok(record) => results.push(record),
                Err(e @ (RuleError::Io(_) | RuleError::Csv(_))) => return Err(e),
                Err(e) => {
                    self.records_skipped += 1;
                    warn!(table = T::TABLE, row = self.records_read, "skipping row: {}", e);
                }
            }
        }
        Ok((results, self.stats()))
    }
}

impl<R: Read, T: CsvRecord> Iterator for CsvTableParser<R, T> {
    type Item = RuleResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    self.records_read += 1;

                    // Blank and short rows carry nothing to import
                    if record.iter().all(|f| f.trim().is_empty()) || record.len() < T::MIN_COLUMNS
                    {
                        self.records_skipped += 1;
                        continue;
                    }

                    return Some(T::from_record(&record));
                }
                Ok(false) => return None,
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// Builds a CSV reader for an import table.
pub(crate) fn table_reader<R: Read>(reader: R, config: &ImportConfig) -> Reader<R> {
    ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(config.has_headers)
        .flexible(true)
        .trim(if config.trim {
            csv::Trim::All
        } else {
            csv::Trim::None
        })
        .from_reader(reader)
}

/// Helper functions for parsing CSV field values.
pub mod parse {
    use csv::StringRecord;
    use symptom_types::Severity;

    use super::{RuleError, RuleResult};

    /// Parses a non-blank name, trimming whitespace and a leading BOM.
    pub fn name(value: &str) -> RuleResult<String> {
        let trimmed = value.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            return Err(RuleError::InvalidName {
                value: value.to_string(),
            });
        }
        Ok(trimmed.to_string())
    }

    /// Parses a severity value.
    ///
    /// `N/A` is read as unknown; anything else must be an integer.
    pub fn severity(symptom: &str, value: &str) -> RuleResult<Severity> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(Severity::UNKNOWN_TEXT) {
            return Ok(Severity::UNKNOWN);
        }
        trimmed
            .parse::<i64>()
            .map(Severity::known)
            .map_err(|_| RuleError::InvalidSeverity {
                symptom: symptom.to_string(),
                value: value.to_string(),
            })
    }

    /// Reads a presence flag: `1` or `true`, case-insensitive.
    pub fn flag(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed == "1" || trimmed.eq_ignore_ascii_case("true")
    }

    /// Collects trimmed, non-blank cells from column `from` onwards.
    pub fn cells(record: &StringRecord, from: usize) -> Vec<String> {
        record
            .iter()
            .skip(from)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name() {
        assert_eq!(parse::name("  Malaria ").unwrap(), "Malaria");
        assert_eq!(parse::name("\u{feff}Disease").unwrap(), "Disease");
        assert!(parse::name("   ").is_err());
    }

    #[test]
    fn test_parse_severity() {
        assert_eq!(parse::severity("itching", "1").unwrap().value(), Some(1));
        assert_eq!(parse::severity("itching", " 7 ").unwrap().value(), Some(7));
        assert!(parse::severity("itching", "N/A").unwrap().is_unknown());
        assert!(matches!(
            parse::severity("itching", "high"),
            Err(RuleError::InvalidSeverity { .. })
        ));
        assert!(parse::severity("itching", "").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse::flag("1"));
        assert!(parse::flag("TRUE"));
        assert!(parse::flag(" true "));
        assert!(!parse::flag("0"));
        assert!(!parse::flag(""));
        assert!(!parse::flag("yes"));
    }

    #[test]
    fn test_parse_cells() {
        let record = StringRecord::from(vec!["Flu", " fever ", "", "cough", "  "]);
        assert_eq!(parse::cells(&record, 1), vec!["fever", "cough"]);
    }
}
