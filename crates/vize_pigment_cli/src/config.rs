//! Configuration file loading for pigment.
//!
//! Reads `pigment.config.json` from the current working directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vize_pigment::StoreOptions;

/// Config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "pigment.config.json";

/// Token file used when neither the CLI nor the config names one.
pub const DEFAULT_TOKENS_FILE: &str = "tokens.json";

/// Top-level pigment configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PigmentConfig {
    /// JSON Schema reference (for editor autocompletion).
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Token file (`.json` or `.toml`), relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<PathBuf>,

    /// Store options (`maxAliasDepth`, `cache`).
    #[serde(flatten)]
    pub store: StoreOptions,
}

impl PigmentConfig {
    /// Token file to load, preferring an explicit CLI argument.
    pub fn tokens_path(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.tokens.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKENS_FILE))
    }
}

/// Load `pigment.config.json` from the given directory (or CWD if None).
pub fn load_config(dir: Option<&Path>) -> PigmentConfig {
    let base = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config_path = base.join(CONFIG_FILE);

    if !config_path.exists() {
        tracing::debug!("no {} found, using defaults", config_path.display());
        return PigmentConfig::default();
    }

    let mut config: PigmentConfig = match std::fs::read_to_string(&config_path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "\x1b[33mWarning:\x1b[0m Failed to parse {}: {}",
                    config_path.display(),
                    e
                );
                return PigmentConfig::default();
            }
        },
        Err(e) => {
            eprintln!(
                "\x1b[33mWarning:\x1b[0m Failed to read {}: {}",
                config_path.display(),
                e
            );
            return PigmentConfig::default();
        }
    };

    if let Some(tokens) = config.tokens.take() {
        config.tokens = Some(if tokens.is_relative() {
            base.join(tokens)
        } else {
            tokens
        });
    }

    tracing::debug!("loaded {}", config_path.display());
    config
}
