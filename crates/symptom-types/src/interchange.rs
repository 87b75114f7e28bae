//! JSON interchange records.
//!
//! Rule data is exchanged as two mappings:
//!
//! ```json
//! {
//!     "Disease Name": {
//!         "rules": [["Symptom A", "Symptom B"], ["Symptom C"]],
//!         "description": "...",
//!         "actions": ["Action 1", "Action 2"]
//!     }
//! }
//! ```
//!
//! and a symptom severity mapping `{ "Symptom A": 8, "Symptom C": "N/A" }`.
//! Each inner rule list is an AND-group; the outer list is OR-ed. Groups are
//! kept as plain lists here so that one malformed group (such as `[]`) does
//! not make the whole catalog unreadable; [`DiseaseRecord::condition_groups`]
//! validates them.

use std::collections::BTreeMap;

use crate::{ConditionGroup, Disease, EmptyConditionGroup, Severity};

/// Disease catalog keyed by disease name.
pub type DiseaseCatalog = BTreeMap<String, DiseaseRecord>;

/// Symptom severities keyed by symptom name.
pub type SeverityCatalog = BTreeMap<String, Severity>;

/// Interchange record for a single disease.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiseaseRecord {
    /// OR-list of AND-groups, as written.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: Vec<Vec<String>>,
    /// Free-text description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Recommended actions.
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<String>,
}

impl DiseaseRecord {
    /// Builds a record from a disease and its rule.
    pub fn from_disease(disease: &Disease, rules: Vec<ConditionGroup>) -> Self {
        Self {
            rules: rules.into_iter().map(Vec::from).collect(),
            description: disease.description.clone(),
            actions: disease.actions.clone(),
        }
    }

    /// Validates each listed group, in order.
    pub fn condition_groups(
        &self,
    ) -> impl Iterator<Item = Result<ConditionGroup, EmptyConditionGroup>> + '_ {
        self.rules.iter().map(ConditionGroup::new)
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_json_shape() {
        let json = r#"{
            "Malaria": {
                "rules": [["chills", "high_fever"], ["sweating"]],
                "description": "Mosquito-borne infection",
                "actions": ["consult nearest hospital"]
            },
            "Acne": { "rules": [["pus_filled_pimples"]] }
        }"#;

        let catalog: DiseaseCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(catalog.len(), 2);

        let malaria = &catalog["Malaria"];
        assert_eq!(malaria.rules.len(), 2);
        assert_eq!(malaria.rules[0], vec!["chills", "high_fever"]);
        assert_eq!(malaria.actions, vec!["consult nearest hospital"]);

        let acne = &catalog["Acne"];
        assert!(acne.description.is_none());
        assert!(acne.actions.is_empty());
    }

    #[test]
    fn test_catalog_with_empty_group_is_readable() {
        let catalog: DiseaseCatalog =
            serde_json::from_str(r#"{ "Flu": { "rules": [["fever"], []] } }"#).unwrap();

        let groups: Vec<_> = catalog["Flu"].condition_groups().collect();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].as_ref().unwrap().symptoms(), ["fever"]);
        assert_eq!(groups[1], Err(EmptyConditionGroup));
    }

    #[test]
    fn test_severity_catalog_json_shape() {
        let catalog: SeverityCatalog =
            serde_json::from_str(r#"{ "itching": 1, "coma": "N/A" }"#).unwrap();
        assert_eq!(catalog["itching"], Severity::known(1));
        assert!(catalog["coma"].is_unknown());
    }
}
