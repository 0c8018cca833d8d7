//! Parser configuration
//!
//! Loaded from TOML; every field is optional and falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Deepest nesting of parenthesized expressions, patterns and subqueries
    pub max_nesting_depth: usize,
    /// Accept contextual keywords (`window`, `count`, `last`, ...) where an
    /// identifier is expected
    pub allow_keywords_as_identifiers: bool,
    /// Emit a trace event every time the parser rewinds after a failed alternative
    pub trace_backtracking: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: 48,
            allow_keywords_as_identifiers: true,
            trace_backtracking: false,
        }
    }
}

impl ParserConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    IoError(PathBuf, String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}
