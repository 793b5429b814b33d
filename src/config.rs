//! Configuration for the `ogonki` command line front end.
//!
//! The config file is JSON. Every field is optional; missing fields take
//! their default value.
//!
//! ```json
//! {
//!   "log_filter": "debug",
//!   "on_unrecognized": "passthrough",
//!   "assume": "windows-1250",
//!   "observed": ["b9", "9c"]
//! }
//! ```

use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::model::detection::{DetectedState, ObservedBytes};

/// What `convert` does with content whose encoding was not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedPolicy {
    /// Report an error and write nothing
    #[default]
    Fail,
    /// Write the input bytes unchanged
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter directive used when `OGONKI_LOG` is not set
    pub log_filter: String,

    pub on_unrecognized: UnrecognizedPolicy,

    /// Skip detection and treat every input as this state
    pub assume: Option<DetectedState>,

    /// Observed byte override as two-digit hex tokens, e.g. `["b1", "e6"]`
    pub observed: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            on_unrecognized: UnrecognizedPolicy::default(),
            assume: None,
            observed: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Load a config file, failing if it is missing or malformed.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Default location: `<config dir>/ogonki/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ogonki").join("config.json"))
    }

    /// Load a config file that may be absent: `Ok(None)` when `path` does
    /// not exist, an error when it exists but can not be loaded.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from_file(path).map(Some)
    }

    /// Load the config from [`Config::default_path`], or the defaults when
    /// there is no such file.
    ///
    /// A file that exists but is unreadable or malformed is reported as an
    /// error; callers that fall back to defaults should log it once logging
    /// is set up.
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Ok(Self::load_optional(&path)?.unwrap_or_default()),
            None => Ok(Self::default()),
        }
    }

    /// Observed byte override derived from `observed`.
    pub fn observed_bytes(&self) -> ObservedBytes {
        if self.observed.is_empty() {
            ObservedBytes::FromContent
        } else {
            ObservedBytes::Tokens(self.observed.clone())
        }
    }

    /// JSON schema of the config file, pretty-printed.
    pub fn schema_json() -> String {
        let schema = schemars::schema_for!(Config);
        serde_json::to_string_pretty(&schema).unwrap_or_default()
    }
}
