//! Configuration for vacancy analysis runs.
//!
//! The configuration is an explicit value handed to the session and the
//! pipeline; nothing in the library reads process environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::algorithm::aggregate::DEFAULT_TOP_N;
use crate::error::{Error, Result};
use crate::error::util::safe_read_to_string;
use crate::filter::{EmptyKeywordPolicy, MatchMode};
use crate::schema::DateFormatConfig;

/// Configuration for loading and analyzing a vacancy table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Vacancy table to load (CSV or Parquet)
    pub data_path: Option<PathBuf>,
    /// Role catalog CSV with default keywords per role
    pub catalog_path: Option<PathBuf>,
    /// Number of rows kept by the ranked views
    pub top_n: usize,
    /// How keyword terms are interpreted
    pub match_mode: MatchMode,
    /// What an empty keyword list selects
    pub empty_keywords: EmptyKeywordPolicy,
    /// Rows per record batch when reading files
    pub batch_size: usize,
    /// Formats tried when parsing the start date column
    pub date_formats: DateFormatConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            catalog_path: None,
            top_n: DEFAULT_TOP_N,
            match_mode: MatchMode::default(),
            empty_keywords: EmptyKeywordPolicy::default(),
            batch_size: 8192,
            date_formats: DateFormatConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = safe_read_to_string(path, "reading analysis configuration")?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// Returns [`Error::Config`] for a zero `top_n` or `batch_size`.
    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The configured data path
    ///
    /// # Errors
    /// Returns [`Error::Config`] when no data path is set.
    pub fn require_data_path(&self) -> Result<&Path> {
        self.data_path
            .as_deref()
            .ok_or_else(|| Error::Config("no vacancy data path configured".to_string()))
    }
}
