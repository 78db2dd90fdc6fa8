use std::{fmt::Display, sync::Arc};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Categories of the Korean time-use survey this tool was built around, in display order.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "학습",
    "이동",
    "가정관리",
    "교제 및 참여활동",
    "문화 및 여가활동",
];

/// Category that the recommendation rules look at to decide whether a user studies a lot.
pub const STUDY_CATEGORY: &str = "학습";

/// Closed, ordered set of category labels. Aggregated tables always contain exactly one row
/// per entry, in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    categories: Arc<[Arc<str>]>,
}

impl Vocabulary {
    /// Fails on an empty list or on duplicate labels, since reindexing onto such a vocabulary
    /// wouldn't give one row per category.
    pub fn new<S: AsRef<str>>(categories: impl IntoIterator<Item = S>) -> Result<Self, ConfigError> {
        let categories = categories
            .into_iter()
            .map(|v| Arc::<str>::from(v.as_ref().trim()))
            .collect::<Vec<_>>();
        if categories.is_empty() {
            return Err(ConfigError::EmptyVocabulary);
        }
        for (index, category) in categories.iter().enumerate() {
            if categories[..index].contains(category) {
                return Err(ConfigError::DuplicateCategory {
                    category: category.to_string(),
                });
            }
        }
        Ok(Self {
            categories: categories.into(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<str>> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.iter().any(|v| &**v == category)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|&v| Arc::from(v)).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = ConfigError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Vocabulary::new(value)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(value: Vocabulary) -> Self {
        value.iter().map(|v| v.to_string()).collect()
    }
}

impl Display for Vocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self.iter().map(|v| &**v).collect::<Vec<_>>().join(", ");
        write!(f, "[{joined}]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary_order() {
        let vocabulary = Vocabulary::default();
        let labels = vocabulary.iter().map(|v| v.to_string()).collect::<Vec<_>>();
        assert_eq!(labels, DEFAULT_CATEGORIES);
        assert!(vocabulary.contains(STUDY_CATEGORY));
    }

    #[test]
    fn test_rejects_empty_and_duplicates() {
        assert!(matches!(
            Vocabulary::new(Vec::<String>::new()),
            Err(ConfigError::EmptyVocabulary)
        ));
        assert!(matches!(
            Vocabulary::new(["a", " a "]),
            Err(ConfigError::DuplicateCategory { .. })
        ));
    }

    #[test]
    fn test_deserialize_from_list() {
        let vocabulary: Vocabulary = serde_json::from_str(r#"["work", "sleep"]"#).unwrap();
        assert_eq!(vocabulary.len(), 2);
        assert!(serde_json::from_str::<Vocabulary>("[]").is_err());
    }
}
