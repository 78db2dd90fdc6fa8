//! Error types of the analysis pipeline.

use thiserror::Error;

/// The input table can't be aggregated. Unlike malformed cells, which silently count as zero
/// minutes, a missing category column would mis-aggregate everything, so it is always surfaced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("required category column '{column}' not found in headers {headers:?}")]
    MissingCategoryColumn { column: String, headers: Vec<String> },
}

/// Settings that can't be used to build an aggregator or a recommendation engine.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("category vocabulary is empty")]
    EmptyVocabulary,

    #[error("category '{category}' appears more than once in the vocabulary")]
    DuplicateCategory { category: String },

    #[error("no time slots configured for chronotype '{chronotype}'")]
    NoSlots { chronotype: String },

    #[error("category column name is empty")]
    EmptyCategoryColumn,

    #[error("failed to read settings {path}: {source}")]
    Read {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::MissingCategoryColumn {
            column: "행동분류별".into(),
            headers: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "required category column '행동분류별' not found in headers [\"a\", \"b\"]"
        );
    }
}
