//! Symptom and severity types.
//!
//! Severity is stored as an unbounded integer (conventionally 0-10) and may be
//! unknown. In the JSON interchange format an unknown severity is written as
//! the string `"N/A"`.

use std::fmt;

/// Severity of a symptom.
///
/// Wraps an optional integer; `None` means the severity is unknown.
///
/// # Examples
///
/// ```
/// use symptom_types::{Severity, SeverityLevel};
///
/// assert_eq!(Severity::known(5).value(), Some(5));
/// assert!(Severity::UNKNOWN.is_unknown());
/// assert_eq!(Severity::known(2).level(), SeverityLevel::Low);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Severity(Option<i64>);

impl Severity {
    /// Unknown severity.
    pub const UNKNOWN: Severity = Severity(None);

    /// Text used for an unknown severity in exported data.
    pub const UNKNOWN_TEXT: &'static str = "N/A";

    /// Creates a known severity.
    pub const fn known(value: i64) -> Self {
        Self(Some(value))
    }

    /// Returns the severity value, if known.
    pub const fn value(self) -> Option<i64> {
        self.0
    }

    /// Returns true if the severity is unknown.
    pub const fn is_unknown(self) -> bool {
        self.0.is_none()
    }

    /// Returns the display band for this severity.
    pub fn level(self) -> SeverityLevel {
        SeverityLevel::from_severity(self)
    }
}

impl From<Option<i64>> for Severity {
    fn from(value: Option<i64>) -> Self {
        Self(value)
    }
}

impl From<i64> for Severity {
    fn from(value: i64) -> Self {
        Self(Some(value))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{}", value),
            None => f.write_str(Severity::UNKNOWN_TEXT),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Severity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.serialize_i64(value),
            None => serializer.serialize_str(Self::UNKNOWN_TEXT),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Severity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Option::<Raw>::deserialize(deserializer)? {
            None => Ok(Self::UNKNOWN),
            Some(Raw::Int(value)) => Ok(Self::known(value)),
            Some(Raw::Text(text)) => {
                let text = text.trim();
                if text.is_empty() || text.eq_ignore_ascii_case(Self::UNKNOWN_TEXT) {
                    return Ok(Self::UNKNOWN);
                }
                text.parse::<i64>()
                    .map(Self::known)
                    .map_err(|_| serde::de::Error::custom(format!("invalid severity: '{}'", text)))
            }
        }
    }
}

/// Display band for a severity value.
///
/// High is 7 and above, medium 4-6, low 1-3. Zero and negative values are
/// `Minimal`; an unknown severity is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SeverityLevel {
    /// Severity is not recorded.
    Unknown,
    /// Severity of zero or below.
    Minimal,
    /// Severity 1-3.
    Low,
    /// Severity 4-6.
    Medium,
    /// Severity 7 and above.
    High,
}

impl SeverityLevel {
    /// Lower bound of the medium band.
    pub const MEDIUM_FROM: i64 = 4;
    /// Lower bound of the high band.
    pub const HIGH_FROM: i64 = 7;

    /// Classifies a severity into its band.
    pub fn from_severity(severity: Severity) -> Self {
        match severity.value() {
            None => Self::Unknown,
            Some(v) if v >= Self::HIGH_FROM => Self::High,
            Some(v) if v >= Self::MEDIUM_FROM => Self::Medium,
            Some(v) if v >= 1 => Self::Low,
            Some(_) => Self::Minimal,
        }
    }

    /// Returns a short lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symptom known to the rule store.
///
/// The name is the symptom's unique identifier.
///
/// # Examples
///
/// ```
/// use symptom_types::{Severity, Symptom};
///
/// let symptom = Symptom::new("chest_pain", Severity::known(7));
/// assert_eq!(symptom.name, "chest_pain");
/// assert_eq!(symptom.severity.value(), Some(7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symptom {
    /// Unique symptom name.
    pub name: String,
    /// Severity, possibly unknown.
    #[cfg_attr(feature = "serde", serde(default))]
    pub severity: Severity,
}

impl Symptom {
    /// Creates a new symptom.
    pub fn new(name: impl Into<String>, severity: Severity) -> Self {
        Self {
            name: name.into(),
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_levels() {
        assert_eq!(Severity::UNKNOWN.level(), SeverityLevel::Unknown);
        assert_eq!(Severity::known(0).level(), SeverityLevel::Minimal);
        assert_eq!(Severity::known(-3).level(), SeverityLevel::Minimal);
        assert_eq!(Severity::known(1).level(), SeverityLevel::Low);
        assert_eq!(Severity::known(3).level(), SeverityLevel::Low);
        assert_eq!(Severity::known(4).level(), SeverityLevel::Medium);
        assert_eq!(Severity::known(6).level(), SeverityLevel::Medium);
        assert_eq!(Severity::known(7).level(), SeverityLevel::High);
        assert_eq!(Severity::known(42).level(), SeverityLevel::High);
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::known(5).to_string(), "5");
        assert_eq!(Severity::UNKNOWN.to_string(), "N/A");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_severity_json_forms() {
        assert_eq!(serde_json::to_string(&Severity::known(8)).unwrap(), "8");
        assert_eq!(serde_json::to_string(&Severity::UNKNOWN).unwrap(), "\"N/A\"");

        let parsed: Severity = serde_json::from_str("\"N/A\"").unwrap();
        assert!(parsed.is_unknown());
        let parsed: Severity = serde_json::from_str("null").unwrap();
        assert!(parsed.is_unknown());
        let parsed: Severity = serde_json::from_str("\"6\"").unwrap();
        assert_eq!(parsed.value(), Some(6));
        assert!(serde_json::from_str::<Severity>("\"severe\"").is_err());
    }
}
