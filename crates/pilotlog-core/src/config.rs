//! Configuration types for pilotlog.
//!
//! [`Config::load`] reads `~/.config/pilotlog/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use crate::filter::DateRange;
use crate::normalizer::NumericPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[dashboard]
default_start = "2025-12-17"
default_end   = "2025-12-24"
page_size     = 10

[ingest]
strict_numbers = false
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/pilotlog/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// `[dashboard]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Range the dashboard opens with and returns to on refresh. Empty
    /// strings leave that side unbounded.
    #[serde(default = "default_start")]
    pub default_start: String,
    #[serde(default = "default_end")]
    pub default_end: String,
    /// Table rows revealed per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_start() -> String { "2025-12-17".to_string() }
fn default_end() -> String { "2025-12-24".to_string() }
fn default_page_size() -> usize { 10 }

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_start: default_start(),
            default_end: default_end(),
            page_size: default_page_size(),
        }
    }
}

impl DashboardConfig {
    pub fn default_range(&self) -> DateRange {
        DateRange::new(self.default_start.as_str(), self.default_end.as_str())
    }
}

/// `[ingest]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngestConfig {
    /// Drop rows with an unparseable rating or retry count instead of
    /// defaulting the field.
    #[serde(default)]
    pub strict_numbers: bool,
}

impl IngestConfig {
    pub fn numeric_policy(&self) -> NumericPolicy {
        if self.strict_numbers {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Lenient
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/pilotlog/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::load_from(&path)
    }

    /// Load an explicit file over the built-in defaults. A missing file is
    /// an error here, unlike [`Config::load`].
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("pilotlog")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
