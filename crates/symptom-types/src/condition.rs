//! Condition group type.
//!
//! A condition group is a conjunction (AND) of symptoms. A disease's rule is
//! the disjunction (OR) of its condition groups.

use std::collections::BTreeSet;
use std::fmt;

use crate::ReportedSymptoms;

/// Error returned when a condition group would contain no symptoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyConditionGroup;

impl fmt::Display for EmptyConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("condition group must contain at least one symptom")
    }
}

impl std::error::Error for EmptyConditionGroup {}

/// A non-empty AND-set of symptom names.
///
/// Names are trimmed, blank names are dropped and repeated names collapse to
/// their first occurrence. Insertion order is preserved for display.
///
/// # Examples
///
/// ```
/// use symptom_types::{ConditionGroup, ReportedSymptoms};
///
/// let group = ConditionGroup::new([" fever", "cough", "fever"]).unwrap();
/// assert_eq!(group.symptoms(), ["fever", "cough"]);
///
/// let other = ConditionGroup::new(["cough", "fever"]).unwrap();
/// assert!(group.same_set_as(&other));
///
/// assert!(ConditionGroup::new(["", "  "]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<String>", into = "Vec<String>")
)]
pub struct ConditionGroup {
    symptoms: Vec<String>,
}

impl ConditionGroup {
    /// Creates a condition group from symptom names.
    ///
    /// Returns [`EmptyConditionGroup`] if no non-blank name remains.
    pub fn new<I, S>(symptoms: I) -> Result<Self, EmptyConditionGroup>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = Vec::new();
        for symptom in symptoms {
            let name = symptom.as_ref().trim();
            if name.is_empty() || names.iter().any(|n| n == name) {
                continue;
            }
            names.push(name.to_string());
        }

        if names.is_empty() {
            return Err(EmptyConditionGroup);
        }
        Ok(Self { symptoms: names })
    }

    /// Returns the symptom names in insertion order.
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    /// Returns the number of symptoms in the group. Never zero.
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    /// Always false; kept for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Returns true if the group names the given symptom.
    pub fn contains(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }

    /// Iterates over the symptom names.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    /// Order-independent identity of the group.
    ///
    /// Two groups with equal fingerprints are duplicates within a rule.
    pub fn fingerprint(&self) -> BTreeSet<&str> {
        self.iter().collect()
    }

    /// Returns true if both groups contain exactly the same symptoms.
    pub fn same_set_as(&self, other: &ConditionGroup) -> bool {
        self.len() == other.len() && self.fingerprint() == other.fingerprint()
    }

    /// Counts how many of the group's symptoms were reported.
    pub fn matched_count(&self, reported: &ReportedSymptoms) -> usize {
        self.iter().filter(|s| reported.contains(s)).count()
    }

    /// Returns a copy of the group without the given symptom.
    ///
    /// Returns `None` if removing it would leave the group empty.
    pub fn without(&self, symptom: &str) -> Option<ConditionGroup> {
        let remaining: Vec<String> = self
            .symptoms
            .iter()
            .filter(|s| *s != symptom)
            .cloned()
            .collect();
        if remaining.is_empty() {
            None
        } else {
            Some(Self {
                symptoms: remaining,
            })
        }
    }
}

impl TryFrom<Vec<String>> for ConditionGroup {
    type Error = EmptyConditionGroup;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ConditionGroup> for Vec<String> {
    fn from(group: ConditionGroup) -> Self {
        group.symptoms
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.symptoms.join(" AND "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_names() {
        let group = ConditionGroup::new([" itching ", "skin_rash", "itching", ""]).unwrap();
        assert_eq!(group.symptoms(), ["itching", "skin_rash"]);
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
    }

    #[test]
    fn test_empty_group_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(ConditionGroup::new(empty), Err(EmptyConditionGroup));
        assert_eq!(ConditionGroup::new(["  "]), Err(EmptyConditionGroup));
    }

    #[test]
    fn test_fingerprint_ignores_order() {
        let a = ConditionGroup::new(["a", "b", "c"]).unwrap();
        let b = ConditionGroup::new(["c", "a", "b"]).unwrap();
        let c = ConditionGroup::new(["a", "b"]).unwrap();
        assert!(a.same_set_as(&b));
        assert!(!a.same_set_as(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_matched_count() {
        let group = ConditionGroup::new(["fever", "chills", "sweating"]).unwrap();
        let reported = ReportedSymptoms::new(["fever", "sweating", "nausea"]);
        assert_eq!(group.matched_count(&reported), 2);
        assert_eq!(group.matched_count(&ReportedSymptoms::default()), 0);
    }

    #[test]
    fn test_without() {
        let group = ConditionGroup::new(["fever", "cough"]).unwrap();
        let smaller = group.without("fever").unwrap();
        assert_eq!(smaller.symptoms(), ["cough"]);
        assert_eq!(group.without("rash"), Some(group.clone()));
        assert_eq!(smaller.without("cough"), None);
    }

    #[test]
    fn test_display() {
        let group = ConditionGroup::new(["fever", "cough"]).unwrap();
        assert_eq!(group.to_string(), "(fever AND cough)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_as_plain_list() {
        let group = ConditionGroup::new(["fever", "cough"]).unwrap();
        let json = serde_json::to_string(&group).unwrap();
        assert_eq!(json, r#"["fever","cough"]"#);

        let parsed: ConditionGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, group);
        assert!(serde_json::from_str::<ConditionGroup>("[]").is_err());
    }
}
