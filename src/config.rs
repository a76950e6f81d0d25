//! Converter configuration.
//!
//! Handles loading, validating, and merging a `config.toml`. The file supplies
//! the defaults every operation falls back to when a caller leaves an argument
//! out. Stock defaults are the base layer; a user file passed with `--config`
//! overrides any subset of keys.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [conversion]
//! quality = 80          # 1-100
//! optimize = true       # higher-effort encoder settings
//! progressive = false   # progressive JPEG
//!
//! [batch]
//! pattern = "*.*"       # wildcard matched against file names
//! recursive = false
//!
//! [web]
//! max_width = 1920
//! max_height = 1080
//!
//! [processing]
//! max_processes = 4     # parallel batch workers (omit for sequential)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [conversion]
//! quality = 90
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::format::Quality;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Converter configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
    /// Per-file encoding defaults.
    pub conversion: ConversionConfig,
    /// Directory enumeration defaults.
    pub batch: BatchConfig,
    /// Bounding box for web optimisation.
    pub web: WebConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl ConverterConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let q = self.conversion.quality;
        if !(Quality::MIN as u32..=Quality::MAX as u32).contains(&q) {
            return Err(ConfigError::Validation(
                "conversion.quality must be 1-100".into(),
            ));
        }
        if self.batch.pattern.trim().is_empty() {
            return Err(ConfigError::Validation(
                "batch.pattern must not be empty".into(),
            ));
        }
        if self.web.max_width == 0 || self.web.max_height == 0 {
            return Err(ConfigError::Validation(
                "web.max_width and web.max_height must be non-zero".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Default quality as a [`Quality`].
    pub fn quality(&self) -> Quality {
        Quality::new(self.conversion.quality)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConversionConfig {
    /// Encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    pub optimize: bool,
    pub progressive: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            optimize: true,
            progressive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub pattern: String,
    pub recursive: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            pattern: "*.*".to_string(),
            recursive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel batch workers.
    /// When absent, batches run sequentially.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Parsed from [`stock_config_toml`], so the documented file and the base
/// layer cannot drift apart.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::from_str(stock_config_toml())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value. A missing file is an error.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ConverterConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ConverterConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Stock defaults, overridden by `path` when given.
pub fn load_config(path: Option<&Path>) -> Result<ConverterConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# image-converter configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Pass the file with `image-converter --config config.toml <command>`.
# Arguments given on the command line or in a request always win.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Per-file conversion
# ---------------------------------------------------------------------------
[conversion]
# Encoding quality (1 = worst, 100 = best). Ignored by lossless targets.
quality = 80

# Higher-effort encoder settings: PNG level 9 + adaptive filtering,
# JPEG trellis/scan optimisation, WebP effort 6, AVIF effort 9, TIFF LZW.
optimize = true

# Progressive JPEG output.
progressive = false

# ---------------------------------------------------------------------------
# Batch conversion
# ---------------------------------------------------------------------------
[batch]
# Wildcard matched against file names: `*` any run, `?` one character.
# The default requires an extension.
pattern = "*.*"

# Descend into subdirectories, mirroring them under the output directory.
recursive = false

# ---------------------------------------------------------------------------
# Web optimisation
# ---------------------------------------------------------------------------
[web]
# Bounding box; larger images are scaled down keeping the aspect ratio.
max_width = 1920
max_height = 1080

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Parallel batch workers, clamped to the number of CPU cores.
# Omit or comment out to convert one file at a time.
# max_processes = 4
"##
}
