//! Vocabulary tables for the school classifier.
//!
//! The built-in tables target Russian-language results in Central Asia.
//! A TOML file with the same shape replaces them wholesale.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// A substring that disqualifies a record, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionMarker {
    pub marker: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierRules {
    /// Matched case-insensitively against categories and name
    pub exclusions: Vec<ExclusionMarker>,
    /// Category labels that identify a general-education school (exact match)
    pub allowed_categories: Vec<String>,
    /// Fallback stem that must appear in the categories text
    pub school_stem: String,
    /// Address substrings naming the target country
    pub country_markers: Vec<String>,
    /// Reject records whose address names no country marker
    pub enforce_address_country: bool,
}

const DEFAULT_EXCLUSIONS: &[(&str, &str)] = &[
    ("автошкол", "driving school"),
    ("вождени", "driving school"),
    ("driv", "driving school"),
    ("танц", "dance"),
    ("dance", "dance"),
    ("хореограф", "dance"),
    ("музык", "music"),
    ("music", "music"),
    ("язы", "language courses"),
    ("language", "language courses"),
    ("искусств", "arts"),
    ("art", "arts"),
    ("спорт", "sports/fitness"),
    ("фитнес", "sports/fitness"),
    ("йога", "sports/fitness"),
    ("карат", "martial arts"),
    ("таэквондо", "martial arts"),
    ("айкидо", "martial arts"),
    ("футбол", "sports"),
    ("теннис", "sports"),
    ("баскетбол", "sports"),
    ("сад", "kindergarten"),
    ("детсад", "kindergarten"),
    ("детский сад", "kindergarten"),
    ("it ", "IT training"),
    (" it", "IT training"),
    ("айти", "IT training"),
    ("программир", "IT training"),
    ("колледж", "higher education"),
    ("университет", "higher education"),
    ("институт", "higher education"),
    ("школа искусств", "arts school"),
    ("дши", "arts school"),
];

const DEFAULT_ALLOWED: &[&str] = &[
    "Школа",
    "Средняя школа",
    "Гимназия",
    "Лицей",
    "Школа-интернат",
    "Общеобразовательная школа",
];

const DEFAULT_COUNTRY_MARKERS: &[&str] = &["кыргызстан", "kyrgyzstan", "кыргызская республика"];

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            exclusions: DEFAULT_EXCLUSIONS
                .iter()
                .map(|(marker, reason)| ExclusionMarker {
                    marker: marker.to_string(),
                    reason: reason.to_string(),
                })
                .collect(),
            allowed_categories: DEFAULT_ALLOWED.iter().map(|s| s.to_string()).collect(),
            school_stem: "школ".to_string(),
            country_markers: DEFAULT_COUNTRY_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            enforce_address_country: false,
        }
    }
}

impl ClassifierRules {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::RulesParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::RulesIo {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_toml_str(&content, path)?;
        info!(
            "Loaded {} exclusion markers and {} allowed categories from {}",
            rules.exclusions.len(),
            rules.allowed_categories.len(),
            path.display()
        );
        Ok(rules)
    }
}
