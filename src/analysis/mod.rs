//! The normalization and aggregation pipeline: cells are parsed into minutes, rows are grouped
//! into categories and the aggregates drive a focus slot recommendation.

pub mod aggregate;
pub mod error;
pub mod recommend;
pub mod time_value;
pub mod vocabulary;

pub use aggregate::{AggregatedTable, Aggregation, CategoryAggregator, SummaryStatistics};
pub use error::{ConfigError, SchemaError};
pub use recommend::{Chronotype, Recommendation, RecommendationEngine};
