//! Harness configuration
//!
//! Loads an optional YAML file, then applies environment overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scenario::{ScenarioAssembler, BOOLEAN_OPTION_SLOTS};

pub const CONFIG_PATH_VAR: &str = "SEARCH_HARNESS_CONFIG";
pub const SERVER_URL_VAR: &str = "SEARCH_HARNESS_SERVER_URL";
pub const SUPPORT_FILTERING_VAR: &str = "SEARCH_HARNESS_SUPPORT_FILTERING";
pub const LOOP_MULTIPLIER_VAR: &str = "SEARCH_HARNESS_LOOP_MULTIPLIER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Root of the search service, e.g. `http://localhost:2080`
    pub server_base_url: String,
    /// Tri-state slots per variant; at least five are read
    pub boolean_param_count: u32,
    pub loop_multiplier: usize,
    /// Whether the engine honours `includeOnly` filtering
    pub support_filtering: bool,
    pub worker_thread_name: String,
    pub request_timeout_secs: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            server_base_url: "http://localhost:2080".to_string(),
            boolean_param_count: BOOLEAN_OPTION_SLOTS.len() as u32,
            loop_multiplier: 2,
            support_filtering: true,
            worker_thread_name: "search-sweep".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl HarnessConfig {
    /// Load from `path` if given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Load using the file named by `SEARCH_HARNESS_CONFIG`, if set
    pub fn from_env() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        Self::load(path.as_deref())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading harness configuration from {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(SERVER_URL_VAR) {
            self.server_base_url = url;
        }
        if let Some(value) = lookup(SUPPORT_FILTERING_VAR) {
            self.support_filtering = value
                .parse()
                .with_context(|| format!("{} must be true or false", SUPPORT_FILTERING_VAR))?;
        }
        if let Some(value) = lookup(LOOP_MULTIPLIER_VAR) {
            self.loop_multiplier = value
                .parse()
                .with_context(|| format!("{} must be a whole number", LOOP_MULTIPLIER_VAR))?;
        }
        Ok(())
    }

    pub fn assembler(&self) -> ScenarioAssembler {
        ScenarioAssembler::new(
            self.support_filtering,
            self.boolean_param_count,
            self.loop_multiplier,
        )
    }
}
