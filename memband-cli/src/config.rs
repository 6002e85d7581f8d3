//! Configuration loading from memband.toml
//!
//! Defaults for a run can be kept in a `memband.toml` file. The file is
//! discovered by walking up from the current directory; command line flags
//! always win over it.

use memband_core::{DEFAULT_BLOCK_BYTES, DEFAULT_REPEAT};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up by [`MembandConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "memband.toml";

/// memband configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MembandConfig {
    /// Run defaults
    #[serde(default)]
    pub run: RunSection,
    /// Output configuration
    #[serde(default)]
    pub output: OutputSection,
}

/// Defaults for the run controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSection {
    /// Runs per kernel (0 = until interrupted)
    #[serde(default = "default_repeat")]
    pub repeat: u64,
    /// Block size in bytes for batched and 2-pass transfers
    #[serde(default = "default_block_size")]
    pub block_size: u64,
    /// Use batched mode for every kernel
    #[serde(default)]
    pub cached: bool,
    /// Print the averaged line per kernel
    #[serde(default = "default_true")]
    pub show_average: bool,
    /// Print one line per timed run
    #[serde(default)]
    pub show_runs: bool,
    /// Suppress informational startup lines
    #[serde(default)]
    pub quiet: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            repeat: default_repeat(),
            block_size: default_block_size(),
            cached: false,
            show_average: true,
            show_runs: false,
            quiet: false,
        }
    }
}

fn default_repeat() -> u64 {
    DEFAULT_REPEAT
}
fn default_block_size() -> u64 {
    DEFAULT_BLOCK_BYTES
}
fn default_true() -> bool {
    true
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    /// Output format: "human", "json" or "csv"
    #[serde(default = "default_format")]
    pub format: String,
    /// Write results to this file instead of stdout
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl MembandConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => {
                        tracing::debug!(path = %config_path.display(), "loaded configuration");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable configuration");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        format!(
            r#"# memband configuration

[run]
# Runs per kernel (0 runs until interrupted)
repeat = {repeat}
# Block size in bytes for batched (-c) and 2-pass transfers
block_size = {block}
# Copy block by block with the library copy for every kernel
cached = false
# Print the averaged line per kernel
show_average = true
# Print one line per timed run
show_runs = false
# Suppress informational startup lines
quiet = false

[output]
# Output format: human, json, csv
format = "human"
# Write results to a file instead of stdout (uncomment to enable)
# path = "memband.json"
"#,
            repeat = DEFAULT_REPEAT,
            block = DEFAULT_BLOCK_BYTES,
        )
    }
}
