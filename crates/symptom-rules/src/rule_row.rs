//! Rule table parser.
//!
//! Parses `Disease,Symptom1,Symptom2,...` rows. Each row is one AND-group;
//! rows for the same disease are OR-ed together.

use csv::StringRecord;
use symptom_types::ConditionGroup;

use crate::parser::{parse, CsvRecord};
use crate::types::RuleResult;

/// One condition group read from a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRow {
    /// Disease the group belongs to.
    pub disease: String,
    /// The AND-group.
    pub group: ConditionGroup,
}

impl CsvRecord for RuleRow {
    const TABLE: &'static str = "rules";
    const MIN_COLUMNS: usize = 2;

    fn from_record(record: &StringRecord) -> RuleResult<Self> {
        let disease = parse::name(record.get(0).unwrap_or(""))?;
        let group = ConditionGroup::new(parse::cells(record, 1))?;
        Ok(Self { disease, group })
    }
}
