use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    input::RawTable,
    utils::percentage::{Percentage, share_percentage},
};

use super::{
    error::{ConfigError, SchemaError},
    time_value::parse_minutes,
    vocabulary::Vocabulary,
};

/// Column of the public survey export that holds the category label.
pub const DEFAULT_CATEGORY_COLUMN: &str = "행동분류별";

/// Nobody does a single activity for more than 5 hours a day, larger values are treated as
/// input mistakes.
pub const DEFAULT_ACTIVITY_CAP_MINUTES: i64 = 300;

pub const DEFAULT_IDENTIFIER_COLUMNS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    pub vocabulary: Vocabulary,
    pub category_column: String,
    /// Leading columns that identify a row and never hold minutes.
    pub identifier_columns: usize,
    pub activity_cap_minutes: i64,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            category_column: DEFAULT_CATEGORY_COLUMN.into(),
            identifier_columns: DEFAULT_IDENTIFIER_COLUMNS,
            activity_cap_minutes: DEFAULT_ACTIVITY_CAP_MINUTES,
        }
    }
}

/// One input row after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRow {
    /// Cells of the identifier columns, missing cells replaced by empty strings.
    pub identifiers: Vec<String>,
    /// Trimmed value of the category column.
    pub category: String,
    /// Clamped minutes, one per activity column.
    pub minutes: Vec<i64>,
    pub total: i64,
}

/// Normalized rows together with the column names they correspond to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTable {
    pub identifier_columns: Vec<String>,
    pub activity_columns: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Arc<str>,
    pub total_minutes: i64,
    pub percentage: Percentage,
}

/// Per-category totals and shares. Always has exactly one row per vocabulary entry, in
/// vocabulary order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTable {
    rows: Vec<CategoryShare>,
}

impl AggregatedTable {
    /// Table where every category has zero minutes. This is what's shown before anything is
    /// loaded.
    pub fn empty(vocabulary: &Vocabulary) -> Self {
        Self {
            rows: vocabulary
                .iter()
                .map(|category| CategoryShare {
                    category: category.clone(),
                    total_minutes: 0,
                    percentage: Percentage::ZERO,
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> &[CategoryShare] {
        &self.rows
    }

    pub fn get(&self, category: &str) -> Option<&CategoryShare> {
        self.rows.iter().find(|v| &*v.category == category)
    }

    pub fn percentage_of(&self, category: &str) -> Option<Percentage> {
        self.get(category).map(|v| v.percentage)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: f64,
    /// Sample standard deviation (n - 1). 0 when there are fewer than 2 rows.
    pub std_dev: f64,
}

impl SummaryStatistics {
    pub fn from_totals(totals: &[i64]) -> Self {
        if totals.is_empty() {
            return Self::default();
        }
        let n = totals.len() as f64;
        let mean = totals.iter().map(|&v| v as f64).sum::<f64>() / n;
        let std_dev = if totals.len() < 2 {
            0.
        } else {
            let variance = totals
                .iter()
                .map(|&v| (v as f64 - mean).powi(2))
                .sum::<f64>()
                / (n - 1.);
            variance.sqrt()
        };
        Self { mean, std_dev }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub rows: ParsedTable,
    pub table: AggregatedTable,
    pub statistics: SummaryStatistics,
}

/// Only the upper bound is capped, so huge negative cells can still reach `i64::MIN`.
fn saturating_sum(values: impl Iterator<Item = i64>) -> i64 {
    values.fold(0, i64::saturating_add)
}

/// Turns raw time-use tables into per-category totals and shares.
#[derive(Debug, Clone, Default)]
pub struct CategoryAggregator {
    config: AggregatorConfig,
}

impl CategoryAggregator {
    pub fn new(config: AggregatorConfig) -> Result<Self, ConfigError> {
        if config.category_column.trim().is_empty() {
            return Err(ConfigError::EmptyCategoryColumn);
        }
        Ok(Self { config })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.config.vocabulary
    }

    /// Normalizes every row and groups totals by category.
    ///
    /// Activity columns are all columns after the identifier columns, except the category
    /// column itself. Each value is parsed into minutes and capped before it's summed into the
    /// row total. Shares are taken from the total of all groups, including groups that are then
    /// dropped for not being part of the vocabulary.
    #[instrument(skip_all, fields(rows = table.rows().len()))]
    pub fn aggregate(&self, table: &RawTable) -> Result<Aggregation, SchemaError> {
        let headers = table
            .headers()
            .iter()
            .map(|v| v.trim().to_string())
            .collect::<Vec<_>>();

        let category_column = self.config.category_column.trim();
        let Some(category_index) = headers.iter().position(|v| v == category_column) else {
            return Err(SchemaError::MissingCategoryColumn {
                column: category_column.to_string(),
                headers,
            });
        };

        let identifier_count = self.config.identifier_columns.min(headers.len());
        let activity_indices = (identifier_count..headers.len())
            .filter(|&index| index != category_index)
            .collect::<Vec<_>>();

        let rows = table
            .rows()
            .iter()
            .map(|row| {
                let cell = |index: usize| row.get(index).and_then(|v| v.as_deref()).unwrap_or("");
                let minutes = activity_indices
                    .iter()
                    .map(|&index| parse_minutes(Some(cell(index))).min(self.config.activity_cap_minutes))
                    .collect::<Vec<_>>();
                ParsedRow {
                    identifiers: (0..identifier_count).map(|i| cell(i).to_string()).collect(),
                    category: cell(category_index).trim().to_string(),
                    total: saturating_sum(minutes.iter().copied()),
                    minutes,
                }
            })
            .collect::<Vec<_>>();

        let mut groups = HashMap::<&str, i64>::new();
        for row in &rows {
            let group = groups.entry(row.category.as_str()).or_default();
            *group = group.saturating_add(row.total);
        }
        let grand_total = saturating_sum(groups.values().copied());

        let dropped = groups
            .keys()
            .filter(|v| !self.config.vocabulary.contains(v))
            .collect::<Vec<_>>();
        if !dropped.is_empty() {
            warn!(?dropped, "Ignoring categories outside of the vocabulary");
        }

        let shares = self
            .config
            .vocabulary
            .iter()
            .map(|category| {
                let total_minutes = groups.get(&**category).copied().unwrap_or(0);
                CategoryShare {
                    category: category.clone(),
                    total_minutes,
                    percentage: share_percentage(total_minutes, grand_total),
                }
            })
            .collect::<Vec<_>>();

        debug!(groups = groups.len(), grand_total, "Aggregated table");

        let totals = rows.iter().map(|v| v.total).collect::<Vec<_>>();
        Ok(Aggregation {
            rows: ParsedTable {
                identifier_columns: headers[..identifier_count].to_vec(),
                activity_columns: activity_indices.iter().map(|&i| headers[i].clone()).collect(),
                rows,
            },
            table: AggregatedTable { rows: shares },
            statistics: SummaryStatistics::from_totals(&totals),
        })
    }
}
