//! Error types for token registration, resolution and loading.

use std::fmt;
use std::path::PathBuf;

use compact_str::CompactString;

/// Result type for token store operations.
pub type TokenResult<T> = Result<T, TokenError>;

/// Errors produced while registering or resolving tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The path is empty or has a malformed segment.
    #[error("invalid token path '{path}': {reason}")]
    InvalidPath {
        path: CompactString,
        reason: &'static str,
    },

    /// No token exists at `path`.
    ///
    /// When the path was reached through an alias, `referenced_from` holds
    /// the token whose value pointed at it.
    #[error("token not found: '{path}'{}", ReferencedFrom(.referenced_from.as_deref()))]
    NotFound {
        path: CompactString,
        referenced_from: Option<CompactString>,
    },

    /// An alias chain came back to a path it had already visited.
    #[error("circular alias: {}", Chain(.cycle))]
    CircularAlias { cycle: Vec<CompactString> },

    /// An acyclic alias chain was longer than the configured limit.
    #[error("alias chain starting at '{path}' exceeds the maximum depth of {limit}")]
    AliasDepthExceeded { path: CompactString, limit: usize },
}

impl TokenError {
    /// Whether this is a missing-token failure.
    ///
    /// Callers commonly fall back to a default value for these.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this error points at a malformed token set.
    ///
    /// Cycles and over-deep chains are authoring mistakes; they are best
    /// reported at load time rather than papered over.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CircularAlias { .. } | Self::AliasDepthExceeded { .. }
        )
    }

    /// The path the error is about.
    ///
    /// For cycles this is the path where the cycle closes.
    pub fn path(&self) -> &str {
        match self {
            Self::InvalidPath { path, .. }
            | Self::NotFound { path, .. }
            | Self::AliasDepthExceeded { path, .. } => path.as_str(),
            Self::CircularAlias { cycle } => cycle.last().map(|p| p.as_str()).unwrap_or(""),
        }
    }
}

struct ReferencedFrom<'a>(Option<&'a str>);

impl fmt::Display for ReferencedFrom<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(from) => write!(f, " (referenced from '{}')", from),
            None => Ok(()),
        }
    }
}

struct Chain<'a>(&'a [CompactString]);

impl fmt::Display for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(path)?;
        }
        Ok(())
    }
}

/// Errors produced while reading a token collection from a file or string.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File extension is not one we know how to read.
    #[error("unsupported token file format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// The document parsed but does not describe a token collection.
    #[error("invalid token collection at '{path}': {message}")]
    InvalidCollection {
        path: CompactString,
        message: CompactString,
    },

    /// A token key could not be used as a path segment.
    #[error(transparent)]
    Token(#[from] TokenError),
}
