//! Token leaf type.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::path::parse_alias;

/// A single design token.
///
/// `value` is stored exactly as written; it is either a literal (`#3b82f6`,
/// `4px`, `calc(1rem + 2px)`) or an alias (`{color.primary}`). In files the
/// token may be written as a bare string or as an object carrying `$value`
/// alongside optional `$type` and `$description` metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Raw value, literal or alias.
    #[serde(rename = "$value")]
    pub value: CompactString,
    /// Token type (e.g. `color`, `dimension`).
    #[serde(rename = "$type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CompactString>,
    /// Human-readable description.
    #[serde(
        rename = "$description",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<CompactString>,
}

impl Token {
    /// Create a token with no metadata.
    #[inline]
    pub fn new(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
            kind: None,
            description: None,
        }
    }

    /// Set the token type.
    #[inline]
    pub fn with_kind(mut self, kind: impl Into<CompactString>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Set the description.
    #[inline]
    pub fn with_description(mut self, description: impl Into<CompactString>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Target path when the value is an alias.
    #[inline]
    pub fn alias_target(&self) -> Option<&str> {
        parse_alias(&self.value)
    }

    /// Whether the value is an alias.
    #[inline]
    pub fn is_alias(&self) -> bool {
        self.alias_target().is_some()
    }

    /// Whether the token carries `$type` or `$description`.
    #[inline]
    pub fn has_metadata(&self) -> bool {
        self.kind.is_some() || self.description.is_some()
    }
}

impl From<&str> for Token {
    #[inline]
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Token {
    #[inline]
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<CompactString> for Token {
    #[inline]
    fn from(value: CompactString) -> Self {
        Self::new(value)
    }
}
