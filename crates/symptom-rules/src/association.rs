//! Disease/symptom association matrix parser.
//!
//! The matrix has a header row `Disease,SymptomA,SymptomB,...` and one data
//! row per condition group, where a `1` or `true` cell marks the column's
//! symptom as part of the group:
//!
//! ```text
//! Disease,fever,cough,rash
//! Flu,1,1,0
//! Measles,1,0,true
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::StringRecord;
use symptom_types::ConditionGroup;
use tracing::{debug, warn};

use crate::parser::{parse, table_reader};
use crate::rule_row::RuleRow;
use crate::types::{ImportConfig, ImportStats, RuleError, RuleResult};

/// Parsed contents of an association matrix.
#[derive(Debug, Clone, Default)]
pub struct AssociationMatrix {
    /// Symptom names from the header, in column order.
    pub symptoms: Vec<String>,
    /// One condition group per usable data row.
    pub rows: Vec<RuleRow>,
    /// Read and skip counters.
    pub stats: ImportStats,
}

impl AssociationMatrix {
    /// Parses a matrix from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> RuleResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RuleError::SourceUnavailable {
                path: path.display().to_string(),
            });
        }
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Parses a matrix from a reader.
    ///
    /// The header row is always required. Rows shorter than the header, rows
    /// without a disease name and rows with no marked symptom are skipped.
    pub fn from_reader<R: Read>(reader: R) -> RuleResult<Self> {
        let config = ImportConfig {
            has_headers: true,
            trim: true,
        };
        let mut reader = table_reader(reader, &config);

        let header = reader.headers()?.clone();
        if header.len() < 2 {
            return Err(RuleError::InvalidHeader {
                expected: 2,
                found: header.len(),
            });
        }

        let first = header.get(0).unwrap_or("").trim_start_matches('\u{feff}');
        if !first.eq_ignore_ascii_case("disease") {
            warn!(
                found = first,
                "first header column is not 'Disease'; treating it as the disease name"
            );
        }

        // Column index -> symptom name; blank header cells never match.
        let columns: Vec<Option<String>> = header
            .iter()
            .skip(1)
            .map(|h| parse::name(h).ok())
            .collect();
        let symptoms: Vec<String> = columns.iter().flatten().cloned().collect();
        if symptoms.is_empty() {
            return Err(RuleError::Parse(
                "no symptom columns found in association header".to_string(),
            ));
        }

        let mut matrix = AssociationMatrix {
            symptoms,
            ..Default::default()
        };

        let mut record = StringRecord::new();
        while reader.read_record(&mut record)? {
            matrix.stats.rows_read += 1;
            match Self::row_group(&record, header.len(), &columns) {
                Some(row) => matrix.rows.push(row),
                None => matrix.stats.rows_skipped += 1,
            }
        }

        debug!(
            rows = matrix.rows.len(),
            skipped = matrix.stats.rows_skipped,
            "parsed association matrix"
        );
        Ok(matrix)
    }

    fn row_group(
        record: &StringRecord,
        width: usize,
        columns: &[Option<String>],
    ) -> Option<RuleRow> {
        if record.len() < width {
            return None;
        }
        let disease = parse::name(record.get(0).unwrap_or("")).ok()?;

        let marked = record
            .iter()
            .skip(1)
            .zip(columns)
            .filter(|(cell, _)| parse::flag(cell))
            .filter_map(|(_, symptom)| symptom.as_deref());

        let group = ConditionGroup::new(marked).ok()?;
        Some(RuleRow { disease, group })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matrix() {
        let data = "\
Disease,fever,cough,rash,
Flu,1,1,0,
Measles,1,0,TRUE,
Measles,0,0,0,
,1,1,1,
Flu,1
";
        let matrix = AssociationMatrix::from_reader(data.as_bytes()).unwrap();

        assert_eq!(matrix.symptoms, vec!["fever", "cough", "rash"]);
        assert_eq!(matrix.rows.len(), 2);
        assert_eq!(matrix.rows[0].disease, "Flu");
        assert_eq!(matrix.rows[0].group.symptoms(), ["fever", "cough"]);
        assert_eq!(matrix.rows[1].group.symptoms(), ["fever", "rash"]);
        assert_eq!(matrix.stats.rows_read, 5);
        assert_eq!(matrix.stats.rows_skipped, 3);
    }

    #[test]
    fn test_header_without_symptoms() {
        let data = "Disease\nFlu\n";
        assert!(matches!(
            AssociationMatrix::from_reader(data.as_bytes()),
            Err(RuleError::InvalidHeader { .. })
        ));

        let data = "Disease, ,\nFlu,1,1\n";
        assert!(matches!(
            AssociationMatrix::from_reader(data.as_bytes()),
            Err(RuleError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = AssociationMatrix::from_path("/nonexistent/associations.csv").unwrap_err();
        assert!(matches!(err, RuleError::SourceUnavailable { .. }));
    }
}
