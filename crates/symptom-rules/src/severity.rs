//! Symptom severity table parser.
//!
//! Parses `Symptom,Severity` rows. A row whose severity is not an integer
//! (or `N/A`) still names a symptom, so it is kept with no severity.

use csv::StringRecord;
use symptom_types::Severity;

use crate::parser::{parse, CsvRecord};
use crate::types::RuleResult;

/// A symptom severity row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeverityRow {
    /// Symptom name.
    pub symptom: String,
    /// Parsed severity, `None` if the cell could not be read.
    pub severity: Option<Severity>,
}

impl CsvRecord for SeverityRow {
    const TABLE: &'static str = "severity";
    const MIN_COLUMNS: usize = 2;

    fn from_record(record: &StringRecord) -> RuleResult<Self> {
        let symptom = parse::name(record.get(0).unwrap_or(""))?;
        let severity = parse::severity(&symptom, record.get(1).unwrap_or("")).ok();
        Ok(Self { symptom, severity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CsvTableParser;
    use crate::types::ImportConfig;

    #[test]
    fn test_parse_severity_table() {
        let data = "\
Symptom,weight
itching,1
skin_rash,3
nodal_skin_eruptions,severe
coma,N/A
,4
";
        let parser = CsvTableParser::<_, SeverityRow>::from_reader(
            data.as_bytes(),
            &ImportConfig::default(),
        )
        .unwrap();
        let (rows, stats) = parser.parse_all().unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].severity, Some(Severity::known(1)));
        assert_eq!(rows[2].symptom, "nodal_skin_eruptions");
        assert_eq!(rows[2].severity, None);
        assert!(rows[3].severity.is_some_and(Severity::is_unknown));
        assert_eq!(stats.rows_skipped, 1);
    }
}
