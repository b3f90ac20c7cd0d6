use std::time::Duration;

use serde::{Deserialize, Serialize};
use tennis_schema::DetailLevel;

use crate::{momentum::DEFAULT_MOMENTUM_WINDOW, StatsError};

/// What identifies a cached instant-stats result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheKeyStrategy {
    /// Player id and number of matches. Edits that keep the match count
    /// are served stale until the entry expires.
    #[default]
    MatchCount,
    /// Player id and a hash of every match's contents.
    ContentHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default)]
    pub key_strategy: CacheKeyStrategy,
}

fn default_ttl_secs() -> u64 {
    5 * 60
}

fn default_max_entries() -> usize {
    100
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            key_strategy: CacheKeyStrategy::default(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default = "default_momentum_window")]
    pub momentum_window: usize,
    /// Level used when a caller does not name one. `None` runs the full aggregator.
    #[serde(default)]
    pub default_detail_level: Option<DetailLevel>,
}

fn default_momentum_window() -> usize {
    DEFAULT_MOMENTUM_WINDOW
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            momentum_window: default_momentum_window(),
            default_detail_level: None,
        }
    }
}

impl StatsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, StatsError> {
        let config: StatsConfig = serde_json::from_str(json)
            .map_err(|e| StatsError::new("E3001", format!("invalid config json: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StatsError> {
        if self.cache.ttl_secs == 0 {
            return Err(StatsError::new("E3001", "cache.ttlSecs must be >= 1")
                .with_context(format!("ttlSecs={}", self.cache.ttl_secs)));
        }
        if self.cache.max_entries == 0 {
            return Err(StatsError::new("E3001", "cache.maxEntries must be >= 1")
                .with_context(format!("maxEntries={}", self.cache.max_entries)));
        }
        if self.momentum_window == 0 {
            return Err(StatsError::new("E3001", "momentumWindow must be >= 1"));
        }
        Ok(())
    }
}
