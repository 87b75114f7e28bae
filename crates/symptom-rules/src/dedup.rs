//! Condition group deduplication.
//!
//! Two groups of the same rule are duplicates when they contain the same
//! symptoms in any order. The first occurrence is kept, with its original
//! symptom order.

use std::collections::{BTreeSet, HashSet};

use symptom_types::ConditionGroup;

/// Removes set-identical duplicates from a rule's condition groups.
///
/// Returns the unique groups in first-seen order and the number removed.
///
/// # Example
///
/// ```
/// use symptom_rules::dedup_condition_groups;
/// use symptom_types::ConditionGroup;
///
/// let groups = vec![
///     ConditionGroup::new(["a", "b"]).unwrap(),
///     ConditionGroup::new(["b", "a"]).unwrap(),
///     ConditionGroup::new(["c"]).unwrap(),
/// ];
/// let (unique, removed) = dedup_condition_groups(groups);
/// assert_eq!(unique.len(), 2);
/// assert_eq!(removed, 1);
/// ```
pub fn dedup_condition_groups(groups: Vec<ConditionGroup>) -> (Vec<ConditionGroup>, usize) {
    let mut seen: HashSet<BTreeSet<String>> = HashSet::with_capacity(groups.len());
    let mut unique = Vec::with_capacity(groups.len());
    let mut removed = 0;

    for group in groups {
        let fingerprint: BTreeSet<String> = group.iter().map(str::to_string).collect();
        if seen.insert(fingerprint) {
            unique.push(group);
        } else {
            removed += 1;
        }
    }

    (unique, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(symptoms: &[&str]) -> ConditionGroup {
        ConditionGroup::new(symptoms.iter().copied()).unwrap()
    }

    #[test]
    fn test_keeps_first_occurrence_order() {
        let groups = vec![
            group(&["itching", "skin_rash"]),
            group(&["continuous_sneezing"]),
            group(&["skin_rash", "itching"]),
            group(&["itching"]),
        ];

        let (unique, removed) = dedup_condition_groups(groups);
        assert_eq!(removed, 1);
        assert_eq!(unique.len(), 3);
        assert_eq!(unique[0].symptoms(), ["itching", "skin_rash"]);
        assert_eq!(unique[2].symptoms(), ["itching"]);
    }

    #[test]
    fn test_subset_is_not_duplicate() {
        let groups = vec![group(&["a", "b"]), group(&["a"]), group(&["b"])];
        let (unique, removed) = dedup_condition_groups(groups);
        assert_eq!(unique.len(), 3);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_empty_input() {
        let (unique, removed) = dedup_condition_groups(Vec::new());
        assert!(unique.is_empty());
        assert_eq!(removed, 0);
    }
}
