//! Configuration loading for the triage pipeline
//!
//! Settings are loaded from (in order of priority):
//! 1. An explicit JSON file passed by the caller
//! 2. The Sift config directory (~/.config/sift/triage.json)
//! 3. Built-in defaults
//!
//! Environment variables override the numeric limits in every case.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classify::{Classifier, RuleOverrides};

/// Config filename in the Sift config directory
pub const CONFIG_FILE: &str = "triage.json";

const ENV_MAX_BATCH_SIZE: &str = "SIFT_MAX_BATCH_SIZE";
const ENV_PARALLEL_THRESHOLD: &str = "SIFT_PARALLEL_THRESHOLD";

/// Tunables for batch ingestion and classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Batches larger than this are still processed but logged as oversized
    pub max_batch_size: usize,
    /// Minimum batch size for parallel classification
    pub parallel_threshold: usize,
    /// Additions to the built-in classifier rules
    pub rules: RuleOverrides,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 500,
            parallel_threshold: 64,
            rules: RuleOverrides::default(),
        }
    }
}

impl TriageConfig {
    /// Load using the following priority:
    /// 1. `path`, when given
    /// 2. ~/.config/sift/triage.json
    /// 3. Defaults
    ///
    /// Environment overrides are applied on top.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None if config::config_exists(CONFIG_FILE) => {
                debug!("[CONFIG] Loading {}", CONFIG_FILE);
                config::load_json(CONFIG_FILE)?
            }
            None => Self::default(),
        };

        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Load settings from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        config::load_json_file(path)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse triage config JSON")
    }

    /// Apply numeric overrides from the environment.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MAX_BATCH_SIZE) {
            self.max_batch_size = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number", ENV_MAX_BATCH_SIZE))?;
        }
        if let Some(value) = lookup(ENV_PARALLEL_THRESHOLD) {
            self.parallel_threshold = value
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number", ENV_PARALLEL_THRESHOLD))?;
        }
        Ok(self)
    }

    /// Build the classifier described by this config
    pub fn classifier(&self) -> Result<Classifier> {
        if self.rules.is_empty() {
            return Ok(Classifier::new());
        }
        Classifier::with_overrides(&self.rules).context("Invalid classifier rules in config")
    }
}
