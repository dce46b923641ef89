//! Logger configuration parser
//!
//! Parses `apilog.toml` into a [`FormatterConfig`]. Every key is optional.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// When to emit terminal color codes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when the terminal supports it
    #[default]
    Auto,
    /// Always color
    Always,
    /// Never color
    Never,
}

impl ColorMode {
    /// Apply this mode to `colored`'s process-wide switch
    pub fn apply(self) {
        match self {
            Self::Auto => colored::control::unset_override(),
            Self::Always => colored::control::set_override(true),
            Self::Never => colored::control::set_override(false),
        }
    }
}

/// Process-wide logger settings, read-only while requests are formatted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Request parameters whose values are redacted before logging
    #[serde(default = "default_dont_log_params")]
    pub dont_log_params: Vec<String>,
    /// Print a timestamp landmark after this many idle seconds (0 disables)
    #[serde(default = "default_landmark_after_secs")]
    pub landmark_after_secs: u64,
    /// Terminal color mode
    #[serde(default)]
    pub color: ColorMode,
}

fn default_dont_log_params() -> Vec<String> {
    vec!["password".to_string(), "token".to_string()]
}

const fn default_landmark_after_secs() -> u64 {
    30
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            dont_log_params: default_dont_log_params(),
            landmark_after_secs: default_landmark_after_secs(),
            color: ColorMode::default(),
        }
    }
}

impl FormatterConfig {
    /// Parse an `apilog.toml` file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Like [`FormatterConfig::from_path`], but a missing file yields the defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse `apilog.toml` content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse apilog.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Returns true if `name` is one of the redacted parameters
    #[must_use]
    pub fn is_sensitive(&self, name: &str) -> bool {
        self.dont_log_params
            .iter()
            .any(|param| param.eq_ignore_ascii_case(name))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for param in &self.dont_log_params {
            if param.trim().is_empty() {
                bail!("Invalid dont_log_params entry: parameter name cannot be empty");
            }
            if !seen.insert(param.to_ascii_lowercase()) {
                bail!("Duplicate dont_log_params entry: '{param}'");
            }
        }
        Ok(())
    }
}
