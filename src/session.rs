use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    analysis::{
        AggregatedTable, Aggregation, CategoryAggregator, Recommendation, RecommendationEngine,
        SummaryStatistics,
    },
    input::{RawTable, read_csv_table},
};

/// Latest aggregate of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub table: AggregatedTable,
    pub statistics: SummaryStatistics,
}

impl Snapshot {
    fn empty(aggregator: &CategoryAggregator) -> Self {
        Self {
            table: AggregatedTable::empty(aggregator.vocabulary()),
            statistics: SummaryStatistics::default(),
        }
    }
}

impl From<Aggregation> for Snapshot {
    fn from(value: Aggregation) -> Self {
        Self {
            table: value.table,
            statistics: value.statistics,
        }
    }
}

/// Holds one snapshot of the public and the user's data plus the last recommendation. Loading a
/// dataset replaces its snapshot completely. Before anything is loaded both snapshots are
/// zero-filled tables, so a prediction always has something to work with.
#[derive(Debug)]
pub struct Session {
    aggregator: CategoryAggregator,
    engine: RecommendationEngine,
    public: Snapshot,
    user: Snapshot,
    last_recommendation: Option<Recommendation>,
}

impl Session {
    pub fn new(aggregator: CategoryAggregator, engine: RecommendationEngine) -> Self {
        Self {
            public: Snapshot::empty(&aggregator),
            user: Snapshot::empty(&aggregator),
            aggregator,
            engine,
            last_recommendation: None,
        }
    }

    pub fn public(&self) -> &Snapshot {
        &self.public
    }

    pub fn user(&self) -> &Snapshot {
        &self.user
    }

    pub fn last_recommendation(&self) -> Option<&Recommendation> {
        self.last_recommendation.as_ref()
    }

    pub fn load_public_table(&mut self, table: &RawTable) -> Result<&Snapshot> {
        self.public = self.aggregator.aggregate(table)?.into();
        Ok(&self.public)
    }

    pub fn load_user_table(&mut self, table: &RawTable) -> Result<&Snapshot> {
        self.user = self.aggregator.aggregate(table)?.into();
        Ok(&self.user)
    }

    #[instrument(skip(self))]
    pub fn load_public(&mut self, path: &Path) -> Result<&Snapshot> {
        let table = read_csv_table(path)?;
        let snapshot = self.load_public_table(&table)?;
        info!(mean = snapshot.statistics.mean, "Loaded public data");
        Ok(snapshot)
    }

    #[instrument(skip(self))]
    pub fn load_user(&mut self, path: &Path) -> Result<&Snapshot> {
        let table = read_csv_table(path)?;
        let snapshot = self.load_user_table(&table)?;
        info!(mean = snapshot.statistics.mean, "Loaded user data");
        Ok(snapshot)
    }

    pub fn predict(&mut self) -> &Recommendation {
        let recommendation = self.engine.predict(
            self.public.statistics.mean,
            self.user.statistics.mean,
            &self.public.table,
            &self.user.table,
        );
        self.last_recommendation.insert(recommendation)
    }
}
