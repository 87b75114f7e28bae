//! Disease description table parser.
//!
//! Parses `Disease,Description` rows.

use csv::StringRecord;

use crate::parser::{parse, CsvRecord};
use crate::types::RuleResult;

/// A disease description row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRow {
    /// Disease name.
    pub disease: String,
    /// Description text; may be empty.
    pub description: String,
}

impl CsvRecord for DescriptionRow {
    const TABLE: &'static str = "descriptions";
    const MIN_COLUMNS: usize = 2;

    fn from_record(record: &StringRecord) -> RuleResult<Self> {
        Ok(Self {
            disease: parse::name(record.get(0).unwrap_or(""))?,
            description: record.get(1).unwrap_or("").trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CsvTableParser;
    use crate::types::ImportConfig;

    #[test]
    fn test_parse_description_table() {
        let data = "\
Disease,Description
Drug Reaction,\"An adverse drug reaction (ADR) is an injury caused by taking medication.\"
Malaria,
";
        let parser = CsvTableParser::<_, DescriptionRow>::from_reader(
            data.as_bytes(),
            &ImportConfig::default(),
        )
        .unwrap();
        let (rows, _) = parser.parse_all().unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].disease, "Drug Reaction");
        assert!(rows[0].description.starts_with("An adverse drug reaction"));
        assert_eq!(rows[1].description, "");
    }
}
