//! Application configuration
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! option_policy = "strict"   # or "lenient" (default)
//! log_filter = "tkshim=debug"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tkshim_core::OptionPolicy;

use crate::error::{AppError, Result};

/// tkshim application configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ShimConfig {
    /// How unknown options in `configure` are treated
    pub option_policy: OptionPolicy,
    /// `tracing-subscriber` filter directive used by binaries
    pub log_filter: String,
}

impl Default for ShimConfig {
    fn default() -> Self {
        Self {
            option_policy: OptionPolicy::Lenient,
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl ShimConfig {
    /// Strict-policy configuration
    pub fn strict() -> Self {
        Self {
            option_policy: OptionPolicy::Strict,
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
