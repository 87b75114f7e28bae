//! Disease action table parser.
//!
//! Parses `Disease,Action1,Action2,...` rows.

use csv::StringRecord;

use crate::parser::{parse, CsvRecord};
use crate::types::{RuleError, RuleResult};

/// Recommended actions for one disease.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRow {
    /// Disease name.
    pub disease: String,
    /// Non-blank actions in column order.
    pub actions: Vec<String>,
}

impl CsvRecord for ActionRow {
    const TABLE: &'static str = "actions";
    const MIN_COLUMNS: usize = 2;

    fn from_record(record: &StringRecord) -> RuleResult<Self> {
        let disease = parse::name(record.get(0).unwrap_or(""))?;
        let actions = parse::cells(record, 1);
        if actions.is_empty() {
            return Err(RuleError::Parse(format!("no actions listed for '{}'", disease)));
        }
        Ok(Self { disease, actions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_action_record() {
        let record = StringRecord::from(vec![
            "Malaria",
            "Consult nearest hospital",
            "avoid oily food",
            "",
            "keep mosquitos out",
        ]);
        let row = ActionRow::from_record(&record).unwrap();
        assert_eq!(row.disease, "Malaria");
        assert_eq!(
            row.actions,
            vec!["Consult nearest hospital", "avoid oily food", "keep mosquitos out"]
        );
    }

    #[test]
    fn test_row_without_actions_rejected() {
        let record = StringRecord::from(vec!["Malaria", " ", ""]);
        assert!(ActionRow::from_record(&record).is_err());
    }
}
