//! Engine configuration.
//!
//! ```yaml
//! cache:
//!   capacity: 100
//! pool:
//!   max_per_bucket: 16
//! batch:
//!   concurrent: true
//!   max_workers: 4
//! render:
//!   smoothing: 0.25
//! ```
//!
//! Every section and field is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::BatchOptions;
use crate::cache::DEFAULT_CAPACITY;
use crate::error::{Result, SpriteError};
use crate::pool::DEFAULT_MAX_PER_BUCKET;

/// Edge softness used when no render section is given.
pub const DEFAULT_SMOOTHING: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub pool: PoolConfig,
    pub batch: BatchOptions,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CacheConfig {
    /// Maximum cached sprites; 0 means the default of 100.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PoolConfig {
    pub max_per_bucket: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_per_bucket: DEFAULT_MAX_PER_BUCKET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RenderConfig {
    pub smoothing: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

impl RenderConfig {
    /// Smoothing clamped to [0, 1]; non-finite values fall back to the default.
    pub fn smoothing(&self) -> f64 {
        if self.smoothing.is_finite() {
            self.smoothing.clamp(0.0, 1.0)
        } else {
            DEFAULT_SMOOTHING
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(source).map_err(|e| SpriteError::Config {
            message: e.to_string(),
            help: Some("Expected sections: cache, pool, batch, render".to_string()),
        })
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| SpriteError::Config {
            message: e.to_string(),
            help: Some("Expected a JSON object with cache, pool, batch, render".to_string()),
        })
    }

    /// Load a `.json` file as JSON and anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| SpriteError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.cache.capacity, 100);
        assert_eq!(config.pool.max_per_bucket, 16);
        assert!(!config.batch.concurrent);
        assert_eq!(config.batch.workers(), 4);
        assert_eq!(config.render.smoothing(), 0.25);
    }

    #[test]
    fn test_yaml_partial_sections() {
        let config = EngineConfig::from_yaml_str(
            "cache:\n  capacity: 8\nbatch:\n  concurrent: true\n  max_workers: 3\n",
        )
        .unwrap();
        assert_eq!(config.cache.capacity, 8);
        assert!(config.batch.concurrent);
        assert_eq!(config.batch.max_workers, 3);
        assert_eq!(config.batch.depth(), 6);
        assert_eq!(config.pool, PoolConfig::default());
        assert_eq!(EngineConfig::from_yaml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_json() {
        let config =
            EngineConfig::from_json_str(r#"{"render": {"smoothing": 3.0}, "pool": {"max_per_bucket": 0}}"#)
                .unwrap();
        assert_eq!(config.render.smoothing(), 1.0);
        assert_eq!(config.pool.max_per_bucket, 0);
    }

    #[test]
    fn test_invalid_config() {
        let err = EngineConfig::from_yaml_str("cache: [1, 2]").unwrap_err();
        assert!(matches!(err, SpriteError::Config { .. }));
        assert!(EngineConfig::from_json_str("{").is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("engine.yaml");
        std::fs::File::create(&yaml)
            .unwrap()
            .write_all(b"cache:\n  capacity: 12\n")
            .unwrap();
        assert_eq!(EngineConfig::load(&yaml).unwrap().cache.capacity, 12);

        let json = dir.path().join("engine.JSON");
        std::fs::write(&json, r#"{"cache": {"capacity": 5}}"#).unwrap();
        assert_eq!(EngineConfig::load(&json).unwrap().cache.capacity, 5);

        let missing = EngineConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(missing, SpriteError::Io { .. }));
    }
}
