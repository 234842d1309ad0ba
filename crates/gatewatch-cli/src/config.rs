//! View configuration for the `gatewatch` binary.
//!
//! Values come from an optional TOML file; command-line flags override them.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How a reconciled report is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Markdown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Keep bookkeeping categories such as `fetched-gating-yaml`.
    pub show_internal: bool,
    pub format: OutputFormat,
    /// Write the report here instead of stdout.
    pub output: Option<PathBuf>,
    /// Problems first within each stage.
    pub display_order: bool,
}

/// Flag values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ViewOverrides {
    pub show_internal: bool,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub display_order: bool,
}

impl ViewConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid view config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content).with_context(|| format!("In {:?}", path))
    }

    /// Load `path` when given, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Boolean flags can only switch a setting on.
    pub fn apply(mut self, overrides: ViewOverrides) -> Self {
        self.show_internal |= overrides.show_internal;
        self.display_order |= overrides.display_order;
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(output) = overrides.output {
            self.output = Some(output);
        }
        self
    }
}
