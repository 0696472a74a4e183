use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Categorical request fields, each with its own training-time vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Organisation,
    RocketStatus,
    MissionStatus,
    Country,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 4] = [
        CategoricalField::Organisation,
        CategoricalField::RocketStatus,
        CategoricalField::MissionStatus,
        CategoricalField::Country,
    ];

    /// JSON key used for this field in prediction requests.
    pub fn request_key(self) -> &'static str {
        match self {
            CategoricalField::Organisation => "Organisation",
            CategoricalField::RocketStatus => "Rocket_Status",
            CategoricalField::MissionStatus => "Mission_Status",
            CategoricalField::Country => "Country",
        }
    }
}

impl fmt::Display for CategoricalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.request_key())
    }
}

/// Immutable label → code mapping learned at training time.
///
/// Codes are the label's position in `classes`, so they are dense and 0-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VocabularyError {
    #[error("vocabulary has no classes")]
    Empty,
    #[error("label '{0}' appears more than once")]
    Duplicate(String),
    #[error("vocabulary has {0} classes, more than a u32 code can address")]
    TooLarge(usize),
}

impl Vocabulary {
    pub fn from_classes(classes: Vec<String>) -> Result<Self, VocabularyError> {
        if classes.is_empty() {
            return Err(VocabularyError::Empty);
        }
        if u32::try_from(classes.len()).is_err() {
            return Err(VocabularyError::TooLarge(classes.len()));
        }
        let mut codes = HashMap::with_capacity(classes.len());
        for (idx, label) in classes.iter().enumerate() {
            // Bounded by the length check above.
            let code = idx as u32;
            if codes.insert(label.clone(), code).is_some() {
                return Err(VocabularyError::Duplicate(label.clone()));
            }
        }
        Ok(Self { classes, codes })
    }

    /// Exact-match lookup; no trimming or case folding.
    pub fn code(&self, label: &str) -> Option<u32> {
        self.codes.get(label).copied()
    }

    /// Labels in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// On-disk vocabulary layout: `{"classes": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVocabulary {
    pub classes: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn codes_follow_class_positions() {
        let v = Vocabulary::from_classes(labels(&["Failure", "Partial Failure", "Success"]))
            .expect("valid vocabulary");
        assert_eq!(v.code("Failure"), Some(0));
        assert_eq!(v.code("Partial Failure"), Some(1));
        assert_eq!(v.code("Success"), Some(2));
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn lookup_is_exact() {
        let v = Vocabulary::from_classes(labels(&["SpaceX"])).unwrap();
        assert_eq!(v.code("spacex"), None);
        assert_eq!(v.code(" SpaceX"), None);
        assert_eq!(v.code("SpaceX "), None);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(Vocabulary::from_classes(Vec::new()), Err(VocabularyError::Empty));
        assert_eq!(
            Vocabulary::from_classes(labels(&["USA", "China", "USA"])),
            Err(VocabularyError::Duplicate("USA".into()))
        );
    }

    #[test]
    fn request_keys_match_wire_names() {
        let keys: Vec<_> = CategoricalField::ALL.iter().map(|f| f.request_key()).collect();
        assert_eq!(
            keys,
            ["Organisation", "Rocket_Status", "Mission_Status", "Country"]
        );
    }
}
