//! Configuration for opening the correction grid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, TransformError};
use crate::source::{DenseGrid, RecordSource, ScanSource};

/// Configuration for the OSTN transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OstnConfig {
    /// Path to the OSTN02_OSGM02 dataset file.
    pub dataset_path: Option<PathBuf>,

    /// How grid node records are looked up.
    pub resolver: ResolverStrategy,

    /// Number of records kept by the scanning resolver's LRU cache.
    pub scan_cache_size: usize,

    /// Malformed lookups after which the scanning resolver reports the dataset as suspect.
    pub suspect_threshold: usize,
}

impl Default for OstnConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            resolver: ResolverStrategy::Indexed,
            scan_cache_size: 4096,
            suspect_threshold: 3,
        }
    }
}

impl OstnConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("OSTN_DATASET_PATH") {
            if !val.is_empty() {
                config.dataset_path = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = std::env::var("OSTN_RESOLVER") {
            config.resolver = ResolverStrategy::from_str(&val);
        }

        if let Ok(val) = std::env::var("OSTN_SCAN_CACHE_SIZE") {
            if let Ok(size) = val.parse() {
                config.scan_cache_size = size;
            }
        }

        if let Ok(val) = std::env::var("OSTN_SUSPECT_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                config.suspect_threshold = threshold;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.scan_cache_size == 0 {
            return Err(TransformError::config("scan_cache_size must be > 0"));
        }

        if self.suspect_threshold == 0 {
            return Err(TransformError::config("suspect_threshold must be > 0"));
        }

        Ok(())
    }

    /// Open the configured record source.
    pub fn open_source(&self) -> Result<Box<dyn RecordSource>> {
        self.validate()?;
        let path = self.dataset_path.as_ref().ok_or_else(|| {
            TransformError::config("no dataset path configured (set OSTN_DATASET_PATH)")
        })?;

        let source: Box<dyn RecordSource> = match self.resolver {
            ResolverStrategy::Indexed => Box::new(DenseGrid::from_path(path)?),
            ResolverStrategy::Scan => Box::new(ScanSource::from_path(
                path.clone(),
                self.scan_cache_size,
                self.suspect_threshold,
            )?),
        };
        Ok(source)
    }
}

/// Record lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResolverStrategy {
    /// Parse the whole dataset once into an array indexed by node id.
    #[default]
    Indexed,
    /// Scan the dataset for each lookup, behind an LRU cache.
    Scan,
}

impl ResolverStrategy {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "scan" | "streaming" => Self::Scan,
            "indexed" | "dense" => Self::Indexed,
            _ => Self::Indexed,
        }
    }

    /// Get the strategy name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::Scan => "scan",
        }
    }
}

impl std::fmt::Display for ResolverStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
