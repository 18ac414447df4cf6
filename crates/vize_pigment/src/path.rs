//! Token path and alias syntax.
//!
//! A path is a dotted sequence of segments (`color.brand.primary`). A token
//! value is an alias only when the *entire* string is one brace-wrapped path
//! (`{color.brand.primary}`); everything else, including values that merely
//! contain braces such as `calc({gap} * 2)`, is a literal.

use crate::error::{TokenError, TokenResult};

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Extract the target path of an alias value.
///
/// Returns `None` for literals. Whitespace inside the braces, empty braces
/// and empty segments all make the value a literal.
///
/// ```
/// use vize_pigment::path::parse_alias;
///
/// assert_eq!(parse_alias("{color.primary}"), Some("color.primary"));
/// assert_eq!(parse_alias("#3b82f6"), None);
/// assert_eq!(parse_alias("{ color.primary }"), None);
/// ```
#[inline]
pub fn parse_alias(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('{')?.strip_suffix('}')?;
    is_valid_path(inner).then_some(inner)
}

/// Whether `value` is an alias to another token.
#[inline]
pub fn is_alias(value: &str) -> bool {
    parse_alias(value).is_some()
}

/// Strip the alias braces from `input` if it is written as `{path}`.
///
/// Both spellings of a path map to the same key.
#[inline]
pub fn normalize_path(input: &str) -> &str {
    parse_alias(input).unwrap_or(input)
}

/// Whether `path` is a well-formed dotted path.
pub fn is_valid_path(path: &str) -> bool {
    !path.is_empty() && path.split(PATH_SEPARATOR).all(is_valid_segment)
}

/// Validate `path`, reporting what is wrong with it.
pub fn validate_path(path: &str) -> TokenResult<()> {
    let reason = if path.is_empty() {
        "path is empty"
    } else if path.split(PATH_SEPARATOR).any(str::is_empty) {
        "empty segment"
    } else if !path.split(PATH_SEPARATOR).all(is_valid_segment) {
        "segment contains braces or whitespace"
    } else {
        return Ok(());
    };

    Err(TokenError::InvalidPath {
        path: path.into(),
        reason,
    })
}

/// Whether a single segment can appear in a path.
#[inline]
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c == '{' || c == '}' || c == PATH_SEPARATOR || c.is_whitespace())
}

/// Split a path into its segments.
#[inline]
pub fn segments(path: &str) -> std::str::Split<'_, char> {
    path.split(PATH_SEPARATOR)
}

/// Append `segment` to `prefix`.
#[inline]
pub(crate) fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        return segment.to_string();
    }
    let mut out = String::with_capacity(prefix.len() + 1 + segment.len());
    out.push_str(prefix);
    out.push(PATH_SEPARATOR);
    out.push_str(segment);
    out
}
