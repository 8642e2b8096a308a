//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use j2735_translator::TranslatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    /// JSON-lines files of decoded elements; empty means stdin
    #[serde(default)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Output file; stdout when unset
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON object per line
    #[default]
    Jsonl,
    /// Indented JSON objects
    Pretty,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// Messages handed to the translator per poll
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Stop after this many batches
    #[serde(default)]
    pub max_batches: Option<usize>,
    /// Worker threads for batch translation (default: rayon's choice)
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_batch_size() -> usize {
    100
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_batches: None,
            threads: None,
        }
    }
}

impl AppConfig {
    /// Reject settings the ingest loop cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ingest.batch_size == 0 {
            bail!("ingest.batch_size must be at least 1");
        }
        if self.ingest.threads == Some(0) {
            bail!("ingest.threads must be at least 1");
        }
        if let Some(filter) = &self.translator.element_filter {
            if filter.is_empty() {
                bail!("translator.element_filter is empty; remove it to translate everything");
            }
        }
        Ok(())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}
