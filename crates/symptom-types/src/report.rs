//! Diagnosis inputs and results.

use std::collections::HashSet;

/// The set of symptoms a caller reports as currently observed.
///
/// Names are trimmed and blank names ignored; duplicates collapse.
///
/// # Examples
///
/// ```
/// use symptom_types::ReportedSymptoms;
///
/// let reported = ReportedSymptoms::new(["fever", " fever ", "cough", ""]);
/// assert_eq!(reported.len(), 2);
/// assert!(reported.contains("fever"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportedSymptoms {
    names: HashSet<String>,
}

impl ReportedSymptoms {
    /// Builds a reported set from symptom names.
    pub fn new<I, S>(symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        symptoms.into_iter().collect()
    }

    /// Returns true if the symptom was reported.
    pub fn contains(&self, symptom: &str) -> bool {
        self.names.contains(symptom)
    }

    /// Number of distinct reported symptoms.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing was reported.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over the reported names in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ReportedSymptoms {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self { names }
    }
}

/// A disease and its match score (percentage, two decimals).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoredDisease {
    /// Disease name.
    pub name: String,
    /// Score in `(0, 100]`.
    pub score: f64,
}

impl ScoredDisease {
    /// Creates a scored disease.
    pub fn new(name: impl Into<String>, score: f64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// A symptom suggested for follow-up and its accumulated score.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuggestedSymptom {
    /// Symptom name.
    pub name: String,
    /// Occurrence count plus the top-disease boost, if applicable.
    pub score: u32,
}

impl SuggestedSymptom {
    /// Creates a suggested symptom.
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Ranked diagnoses together with the suggestions derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diagnosis {
    /// Diseases ranked by descending score.
    pub diagnoses: Vec<ScoredDisease>,
    /// Unreported symptoms ranked by descending score.
    pub suggestions: Vec<SuggestedSymptom>,
}

impl Diagnosis {
    /// Returns the highest-ranked disease, if any.
    pub fn top(&self) -> Option<&ScoredDisease> {
        self.diagnoses.first()
    }

    /// Returns true if no disease matched.
    pub fn is_empty(&self) -> bool {
        self.diagnoses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reported_symptoms_set_semantics() {
        let reported: ReportedSymptoms = vec!["a".to_string(), "b".to_string(), "a".to_string()]
            .into_iter()
            .collect();
        assert_eq!(reported.len(), 2);
        assert!(reported.contains("a"));
        assert!(!reported.contains("c"));
        assert!(ReportedSymptoms::new(["  "]).is_empty());
    }

    #[test]
    fn test_diagnosis_top() {
        let diagnosis = Diagnosis {
            diagnoses: vec![ScoredDisease::new("A", 100.0), ScoredDisease::new("B", 50.0)],
            suggestions: vec![],
        };
        assert_eq!(diagnosis.top().map(|d| d.name.as_str()), Some("A"));
        assert!(!diagnosis.is_empty());
        assert!(Diagnosis::default().top().is_none());
    }
}
