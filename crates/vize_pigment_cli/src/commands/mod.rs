//! Subcommand implementations.

pub mod check;
pub mod list;
pub mod resolve;

use std::path::Path;

use vize_pigment::{load_collection, LoadError, TokenStore};

use crate::config::PigmentConfig;

/// Output format shared by the subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(format: &str) -> Self {
        match format {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Load the token file named by the CLI or config into a store.
pub fn open_store(tokens: Option<&Path>, config: &PigmentConfig) -> Result<TokenStore, LoadError> {
    let path = config.tokens_path(tokens);
    let collection = load_collection(&path)?;
    Ok(TokenStore::with_options(collection, config.store))
}

/// Open the store or exit with a message.
pub fn open_store_or_exit(tokens: Option<&Path>, config: &PigmentConfig) -> TokenStore {
    match open_store(tokens, config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!(
                "Failed to load {}: {}",
                config.tokens_path(tokens).display(),
                e
            );
            std::process::exit(2);
        }
    }
}
