//! Reading token collections from JSON and TOML.

use std::path::Path;

use serde_json::Value;

use crate::collection::TokenCollection;
use crate::error::LoadError;

/// Supported token file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    Json,
    Toml,
}

impl TokenFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Parse a token collection from source text.
///
/// Both formats go through the same document model, so a TOML table and the
/// equivalent JSON object produce identical collections.
pub fn parse_collection(source: &str, format: TokenFormat) -> Result<TokenCollection, LoadError> {
    let document: Value = match format {
        TokenFormat::Json => serde_json::from_str(source)?,
        TokenFormat::Toml => toml::from_str(source)?,
    };
    TokenCollection::from_json(&document)
}

/// Read and parse a token file, picking the format from its extension.
pub fn load_collection(path: &Path) -> Result<TokenCollection, LoadError> {
    let format = TokenFormat::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let source = std::fs::read_to_string(path)?;
    let collection = parse_collection(&source, format)?;
    tracing::debug!(
        "loaded {} tokens from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}
