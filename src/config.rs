//! Analysis configuration
//!
//! Per-request options for the rendered reports, optionally loaded from a
//! TOML file. Policy thresholds (regression percentages, insight ratios,
//! the hotspot cap) are constants in their modules and not configurable.
//!
//! ```toml
//! [analysis]
//! focus_on_user_code = false
//! max_hot_paths = 5
//!
//! [chunk]
//! max_frames = 25
//! ```

use crate::chunk::ChunkOptions;
use crate::error::{BrasaError, Result};
use crate::hot_path::HotPathOptions;
use crate::hotspot::HotspotOptions;
use crate::regression::ComparisonOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for flamegraph analysis and comparison reports
///
/// # Example
/// ```
/// use brasa::config::AnalysisOptions;
///
/// let options = AnalysisOptions::default();
/// assert!(options.focus_on_user_code);
/// assert_eq!(options.max_hot_paths, 10);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Restrict tables and path trees to application frames
    pub focus_on_user_code: bool,

    /// Number of hot paths rendered
    pub max_hot_paths: usize,

    /// Number of rows in the slow functions table
    pub max_slow_functions: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            focus_on_user_code: true,
            max_hot_paths: 10,
            max_slow_functions: 10,
        }
    }
}

impl AnalysisOptions {
    /// Include library and system frames everywhere
    pub fn all_frames() -> Self {
        Self {
            focus_on_user_code: false,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_hot_paths == 0 {
            return Err("max_hot_paths must be at least 1".to_string());
        }
        if self.max_slow_functions == 0 {
            return Err("max_slow_functions must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn hot_path_options(&self) -> HotPathOptions {
        HotPathOptions {
            focus_on_user_code: self.focus_on_user_code,
            max_hot_paths: self.max_hot_paths,
        }
    }

    pub fn hotspot_options(&self) -> HotspotOptions {
        HotspotOptions {
            focus_on_user_code: self.focus_on_user_code,
        }
    }

    pub fn comparison_options(&self) -> ComparisonOptions {
        ComparisonOptions {
            focus_on_user_code: self.focus_on_user_code,
        }
    }
}

/// Top-level configuration file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrasaConfig {
    pub analysis: AnalysisOptions,
    pub chunk: ChunkOptions,
}

impl BrasaConfig {
    /// Parse and validate configuration from TOML
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: BrasaConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| BrasaError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.analysis.validate().map_err(BrasaError::InvalidConfig)?;
        if self.chunk.max_frames == 0 {
            return Err(BrasaError::InvalidConfig(
                "chunk.max_frames must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
