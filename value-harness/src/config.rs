//! Harness configuration
//!
//! Priority, highest first: CLI flags, environment variables, config file,
//! built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "value-harness.toml";

const DEFAULT_FEATURES_DIR: &str = "features";
const DEFAULT_LOG_FILTER: &str = "info";

/// Resolved harness configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Directory searched for `.feature` files when no paths are given
    pub features_dir: PathBuf,
    pub fail_fast: bool,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            features_dir: PathBuf::from(DEFAULT_FEATURES_DIR),
            fail_fast: false,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Raw TOML file structure.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    features_dir: Option<PathBuf>,
    fail_fast: Option<bool>,
    log_filter: Option<String>,
}

impl HarnessConfig {
    /// Load configuration from file and environment variables.
    ///
    /// An explicit `config_path` must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file_config = match config_path {
            Some(path) => read_config_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    read_config_file(path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Self::from_file_and_env(file_config, |key| std::env::var(key).ok())
    }

    /// Build config from parsed file values and an environment lookup.
    fn from_file_and_env(
        file_config: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();

        let features_dir = env("VALUE_HARNESS_FEATURES_DIR")
            .map(PathBuf::from)
            .or(file_config.features_dir)
            .unwrap_or(defaults.features_dir);

        let fail_fast = match env("VALUE_HARNESS_FAIL_FAST") {
            Some(raw) => parse_bool(&raw)
                .with_context(|| format!("invalid VALUE_HARNESS_FAIL_FAST: {}", raw))?,
            None => file_config.fail_fast.unwrap_or(defaults.fail_fast),
        };

        let log_filter = env("VALUE_HARNESS_LOG")
            .or(file_config.log_filter)
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            features_dir,
            fail_fast,
            log_filter,
        })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config: {}", path.display()))
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("expected true/false or 1/0, got '{}'", other),
    }
}
