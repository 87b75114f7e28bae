//! Disease types.

/// A disease known to the rule store.
///
/// # Examples
///
/// ```
/// use symptom_types::Disease;
///
/// let mut disease = Disease::new("Migraine");
/// disease.actions.push("meditation".to_string());
///
/// assert_eq!(disease.name, "Migraine");
/// assert!(disease.description.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Disease {
    /// Unique disease name.
    pub name: String,
    /// Free-text description.
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    /// Recommended actions, in the order they were added.
    #[cfg_attr(feature = "serde", serde(default))]
    pub actions: Vec<String>,
}

impl Disease {
    /// Creates a disease with no description or actions.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            actions: Vec::new(),
        }
    }

    /// Creates a disease with a description.
    pub fn with_description(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::new(name)
        }
    }

    /// Returns the name and description as a summary.
    pub fn summary(&self) -> DiseaseSummary {
        DiseaseSummary {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Name and description of a disease, as listed by a rule source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiseaseSummary {
    /// Unique disease name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_summary() {
        let disease = Disease::with_description("Malaria", "Mosquito-borne infection");
        let summary = disease.summary();
        assert_eq!(summary.name, "Malaria");
        assert_eq!(summary.description.as_deref(), Some("Mosquito-borne infection"));
    }
}
