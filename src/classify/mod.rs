//! Text heuristic deciding whether a record is a general-education school.
//!
//! Driving schools, dance studios, kindergartens, universities and the like
//! share the "school" vocabulary with real schools; this filter rejects them
//! by substring markers and keeps records with a school category.

mod rules;

pub use rules::{ClassifierRules, ExclusionMarker};

use crate::models::NormalizedRecord;

/// Why a record was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// An exclusion marker matched the categories or the name
    Excluded { marker: String, reason: String },
    /// Categories present, but none of them names a school
    NotSchoolCategory,
    /// Address names none of the country markers
    AddressOutsideCountry,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Excluded { marker, reason } => write!(f, "{} (marker '{}')", reason, marker),
            Rejection::NotSchoolCategory => write!(f, "no school category"),
            Rejection::AddressOutsideCountry => write!(f, "address outside target country"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// Classifier with its vocabularies lower-cased up front.
#[derive(Debug, Clone)]
pub struct SchoolClassifier {
    exclusions: Vec<ExclusionMarker>,
    allowed_categories: Vec<String>,
    school_stem: String,
    country_markers: Vec<String>,
    enforce_address_country: bool,
}

impl SchoolClassifier {
    pub fn new(rules: ClassifierRules) -> Self {
        Self {
            exclusions: rules
                .exclusions
                .into_iter()
                .map(|e| ExclusionMarker {
                    marker: e.marker.to_lowercase(),
                    reason: e.reason,
                })
                .collect(),
            allowed_categories: rules.allowed_categories,
            school_stem: rules.school_stem.to_lowercase(),
            country_markers: rules
                .country_markers
                .iter()
                .map(|m| m.to_lowercase())
                .collect(),
            enforce_address_country: rules.enforce_address_country,
        }
    }

    pub fn is_school(&self, record: &NormalizedRecord) -> bool {
        self.classify(record).is_accept()
    }

    pub fn classify(&self, record: &NormalizedRecord) -> Verdict {
        let categories: Vec<&str> = record.categories_list.iter().map(|c| c.trim()).collect();
        let categories_lower = categories.join(", ").to_lowercase();
        let name_lower = record.name.as_deref().unwrap_or_default().to_lowercase();

        // Newline keeps markers from matching across the categories/name boundary.
        let haystack = format!("{}\n{}", categories_lower, name_lower);
        if let Some(hit) = self
            .exclusions
            .iter()
            .find(|e| !e.marker.is_empty() && haystack.contains(e.marker.as_str()))
        {
            return Verdict::Reject(Rejection::Excluded {
                marker: hit.marker.clone(),
                reason: hit.reason.clone(),
            });
        }

        if !categories.is_empty() {
            let allowed = categories
                .iter()
                .any(|c| self.allowed_categories.iter().any(|a| a == c));
            if !allowed && !categories_lower.contains(self.school_stem.as_str()) {
                return Verdict::Reject(Rejection::NotSchoolCategory);
            }
        }

        let address = record.address.as_deref().unwrap_or_default().to_lowercase();
        if !address.is_empty() {
            let names_country = self
                .country_markers
                .iter()
                .any(|m| address.contains(m.as_str()));
            // Many addresses omit the country; the bounding box already
            // limits results to the region, so this only rejects on request.
            if !names_country && self.enforce_address_country {
                return Verdict::Reject(Rejection::AddressOutsideCountry);
            }
        }

        Verdict::Accept
    }
}

impl Default for SchoolClassifier {
    fn default() -> Self {
        Self::new(ClassifierRules::default())
    }
}
