use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::{
    aggregate::{AggregatorConfig, CategoryAggregator},
    error::ConfigError,
    recommend::{RecommendationConfig, RecommendationEngine},
};

pub const SETTINGS_FILE_NAME: &str = "config.json";

/// Everything that can be tuned without recompiling. Missing fields fall back to the defaults,
/// so a settings file only needs to contain what it overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub aggregation: AggregatorConfig,
    pub recommendation: RecommendationConfig,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Uses `explicit` if given. Otherwise looks for [SETTINGS_FILE_NAME] in the application
    /// directory and falls back to defaults when it isn't there.
    pub fn resolve(explicit: Option<&Path>, application_dir: &Path) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path: PathBuf = application_dir.join(SETTINGS_FILE_NAME);
                if !path.exists() {
                    debug!("No settings file, using defaults");
                    return Ok(Self::default());
                }
                path
            }
        };
        info!(path = %path.display(), "Loading settings");
        Self::from_file(&path)
    }

    pub fn build(self) -> Result<(CategoryAggregator, RecommendationEngine), ConfigError> {
        Ok((
            CategoryAggregator::new(self.aggregation)?,
            RecommendationEngine::new(self.recommendation)?,
        ))
    }
}
