//! Ordered, nested token collection.
//!
//! Every level keeps its keys in insertion order. Overwriting a key keeps its
//! original position, so walking the tree is stable across overrides.

use compact_str::CompactString;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{LoadError, TokenError, TokenResult};
use crate::path::{is_valid_segment, join, segments, validate_path, PATH_SEPARATOR};
use crate::token::Token;

type Level = IndexMap<CompactString, TokenNode, FxBuildHasher>;

/// Key `toml` uses when a datetime is deserialized into a generic map.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

/// A node in the token tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenNode {
    /// A leaf token.
    Token(Token),
    /// A nested group of tokens.
    Group(TokenCollection),
}

/// A nested mapping from path segments to tokens or groups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenCollection {
    entries: Level,
}

impl TokenCollection {
    /// Create an empty collection.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from `(path, value)` pairs.
    ///
    /// ```
    /// use vize_pigment::TokenCollection;
    ///
    /// let tokens = TokenCollection::from_pairs([
    ///     ("color.primary", "#3b82f6"),
    ///     ("color.accent", "{color.primary}"),
    /// ])
    /// .unwrap();
    /// assert_eq!(tokens.len(), 2);
    /// ```
    pub fn from_pairs<I, P, T>(pairs: I) -> TokenResult<Self>
    where
        I: IntoIterator<Item = (P, T)>,
        P: AsRef<str>,
        T: Into<Token>,
    {
        let mut collection = Self::new();
        for (path, token) in pairs {
            collection.insert(path.as_ref(), token.into())?;
        }
        Ok(collection)
    }

    /// Build a collection from a parsed JSON document.
    ///
    /// Strings, numbers and booleans become tokens. Objects carrying
    /// `$value` become tokens with metadata, other objects become groups.
    /// A group's `$type` is inherited by tokens below it that have none.
    /// Other `$`-prefixed group keys are ignored.
    pub fn from_json(value: &Value) -> Result<Self, LoadError> {
        let Value::Object(map) = value else {
            return Err(LoadError::InvalidCollection {
                path: CompactString::default(),
                message: "expected an object at the top level".into(),
            });
        };

        let mut collection = Self::new();
        collection.extend_from_json("", map, None)?;
        Ok(collection)
    }

    fn extend_from_json(
        &mut self,
        prefix: &str,
        map: &Map<String, Value>,
        inherited_kind: Option<&str>,
    ) -> Result<(), LoadError> {
        let group_kind = map
            .get("$type")
            .and_then(Value::as_str)
            .or(inherited_kind);

        for (key, value) in map {
            if key.starts_with('$') {
                continue;
            }

            let path = join(prefix, key);
            if !is_valid_segment(key) {
                return Err(TokenError::InvalidPath {
                    path: path.into(),
                    reason: "key is not a single path segment",
                }
                .into());
            }

            let node = match value {
                Value::Object(object) if object.contains_key("$value") => {
                    let mut token = token_from_object(&path, object)?;
                    if token.kind.is_none() {
                        token.kind = group_kind.map(CompactString::from);
                    }
                    TokenNode::Token(token)
                }
                Value::Object(object) if toml_datetime(object).is_none() => {
                    let mut group = Self::new();
                    group.extend_from_json(&path, object, group_kind)?;
                    TokenNode::Group(group)
                }
                scalar => {
                    let mut token = Token::new(scalar_to_string(&path, scalar)?);
                    token.kind = group_kind.map(CompactString::from);
                    TokenNode::Token(token)
                }
            };

            self.entries.insert(CompactString::from(key.as_str()), node);
        }

        Ok(())
    }

    /// Insert or overwrite the token at `path`.
    ///
    /// Missing groups along the path are created. A token sitting where a
    /// group is needed is replaced by a group, and a group at `path` itself
    /// is replaced by the token. Returns the token previously at `path`.
    pub fn insert(&mut self, path: &str, token: Token) -> TokenResult<Option<Token>> {
        validate_path(path)?;

        let (parents, leaf) = match path.rsplit_once(PATH_SEPARATOR) {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, path),
        };

        let mut level = self;
        if let Some(parents) = parents {
            for segment in segments(parents) {
                level = level.group_mut(segment);
            }
        }

        match level
            .entries
            .insert(CompactString::from(leaf), TokenNode::Token(token))
        {
            Some(TokenNode::Token(previous)) => Ok(Some(previous)),
            _ => Ok(None),
        }
    }

    fn group_mut(&mut self, segment: &str) -> &mut TokenCollection {
        let node = self
            .entries
            .entry(CompactString::from(segment))
            .or_insert_with(|| TokenNode::Group(TokenCollection::new()));

        if let TokenNode::Token(_) = node {
            *node = TokenNode::Group(TokenCollection::new());
        }

        match node {
            TokenNode::Group(group) => group,
            TokenNode::Token(_) => unreachable!("token nodes are replaced by groups above"),
        }
    }

    /// Remove the token at `path`, pruning groups left empty.
    ///
    /// Groups are never removed directly; a group path returns `None`.
    pub fn remove(&mut self, path: &str) -> Option<Token> {
        match path.split_once(PATH_SEPARATOR) {
            None => {
                if !matches!(self.entries.get(path)?, TokenNode::Token(_)) {
                    return None;
                }
                match self.entries.shift_remove(path) {
                    Some(TokenNode::Token(token)) => Some(token),
                    _ => None,
                }
            }
            Some((head, rest)) => {
                let TokenNode::Group(group) = self.entries.get_mut(head)? else {
                    return None;
                };
                let removed = group.remove(rest)?;
                if group.entries.is_empty() {
                    self.entries.shift_remove(head);
                }
                Some(removed)
            }
        }
    }

    /// Look up the node at `path`.
    pub fn get_node(&self, path: &str) -> Option<&TokenNode> {
        let mut level = self;
        let mut parts = segments(path).peekable();

        while let Some(segment) = parts.next() {
            let node = level.entries.get(segment)?;
            if parts.peek().is_none() {
                return Some(node);
            }
            match node {
                TokenNode::Group(group) => level = group,
                TokenNode::Token(_) => return None,
            }
        }

        None
    }

    /// Look up the token at `path`. Group paths return `None`.
    #[inline]
    pub fn get(&self, path: &str) -> Option<&Token> {
        match self.get_node(path)? {
            TokenNode::Token(token) => Some(token),
            TokenNode::Group(_) => None,
        }
    }

    /// Whether a token exists at exactly `path`.
    #[inline]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Number of tokens, counted across all levels.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .map(|node| match node {
                TokenNode::Token(_) => 1,
                TokenNode::Group(group) => group.len(),
            })
            .sum()
    }

    /// Whether the collection holds no tokens.
    ///
    /// Stops at the first token found.
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(|node| match node {
            TokenNode::Token(_) => false,
            TokenNode::Group(group) => group.is_empty(),
        })
    }

    /// Remove everything.
    #[inline]
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Direct children of this level, in insertion order.
    #[inline]
    pub fn children(&self) -> indexmap::map::Iter<'_, CompactString, TokenNode> {
        self.entries.iter()
    }

    /// Depth-first walk over every token and its dotted path.
    #[inline]
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            stack: vec![(String::new(), self.entries.iter())],
        }
    }

    /// Depth-first walk over every token path.
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        Keys(self.entries())
    }
}

fn token_from_object(path: &str, object: &Map<String, Value>) -> Result<Token, LoadError> {
    let value_path = join(path, "$value");
    let value = match object.get("$value") {
        Some(value) => scalar_to_string(&value_path, value)?,
        None => {
            return Err(LoadError::InvalidCollection {
                path: path.into(),
                message: "missing $value".into(),
            })
        }
    };

    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .map(CompactString::from)
    };

    Ok(Token {
        value,
        kind: text("$type"),
        description: text("$description"),
    })
}

/// The text of a TOML datetime, which arrives as a single-key map.
fn toml_datetime(object: &Map<String, Value>) -> Option<&str> {
    if object.len() != 1 {
        return None;
    }
    object.get(TOML_DATETIME_KEY).and_then(Value::as_str)
}

fn scalar_to_string(path: &str, value: &Value) -> Result<CompactString, LoadError> {
    let datetime = match value {
        Value::String(s) => return Ok(CompactString::from(s.as_str())),
        Value::Number(n) => return Ok(CompactString::from(n.to_string())),
        Value::Bool(b) => return Ok(CompactString::from(if *b { "true" } else { "false" })),
        Value::Object(object) => toml_datetime(object),
        Value::Null | Value::Array(_) => None,
    };

    datetime
        .map(CompactString::from)
        .ok_or_else(|| LoadError::InvalidCollection {
            path: path.into(),
            message: "expected a string, number or boolean".into(),
        })
}

/// Iterator over `(path, token)` pairs, see [`TokenCollection::entries`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    stack: Vec<(String, indexmap::map::Iter<'a, CompactString, TokenNode>)>,
}

impl<'a> Iterator for Entries<'a> {
    type Item = (String, &'a Token);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, iter) = self.stack.last_mut()?;
            match iter.next() {
                None => {
                    self.stack.pop();
                }
                Some((key, TokenNode::Token(token))) => {
                    return Some((join(prefix, key), token));
                }
                Some((key, TokenNode::Group(group))) => {
                    let path = join(prefix, key);
                    self.stack.push((path, group.entries.iter()));
                }
            }
        }
    }
}

impl std::iter::FusedIterator for Entries<'_> {}

/// Iterator over token paths, see [`TokenCollection::keys`].
#[derive(Debug, Clone)]
pub struct Keys<'a>(Entries<'a>);

impl Iterator for Keys<'_> {
    type Item = String;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(path, _)| path)
    }
}

impl std::iter::FusedIterator for Keys<'_> {}

impl<'a> IntoIterator for &'a TokenCollection {
    type Item = (String, &'a Token);
    type IntoIter = Entries<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl Serialize for TokenNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TokenNode::Token(token) if !token.has_metadata() => {
                serializer.serialize_str(&token.value)
            }
            TokenNode::Token(token) => token.serialize(serializer),
            TokenNode::Group(group) => group.serialize(serializer),
        }
    }
}

impl Serialize for TokenCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter())
    }
}

impl<'de> Deserialize<'de> for TokenCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> TokenCollection {
        TokenCollection::from_pairs([
            ("color.brand.primary", "#3b82f6"),
            ("color.brand.secondary", "{color.brand.primary}"),
            ("space.sm", "4px"),
            ("color.surface", "#ffffff"),
        ])
        .unwrap()
    }

    #[test]
    fn test_insert_creates_groups() {
        let tokens = sample();
        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens.get_node("color"), Some(TokenNode::Group(_))));
        assert!(matches!(tokens.get_node("color.brand"), Some(TokenNode::Group(_))));
        assert_eq!(tokens.get("space.sm"), Some(&Token::new("4px")));
        assert!(tokens.get("color.brand").is_none());
        assert!(tokens.get("space.sm.extra").is_none());
        assert!(tokens.get("missing").is_none());
    }

    #[test]
    fn test_insertion_order_is_depth_first() {
        let keys: Vec<_> = sample().keys().collect();
        assert_eq!(
            keys,
            [
                "color.brand.primary",
                "color.brand.secondary",
                "color.surface",
                "space.sm",
            ]
        );
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut tokens = sample();
        let previous = tokens
            .insert("color.brand.primary", Token::new("#000"))
            .unwrap();
        assert_eq!(previous, Some(Token::new("#3b82f6")));
        assert_eq!(tokens.keys().next().as_deref(), Some("color.brand.primary"));
        assert_eq!(tokens.get("color.brand.primary").unwrap().value, "#000");
    }

    #[test]
    fn test_token_and_group_replace_each_other() {
        let mut tokens = sample();

        // A group path through an existing token turns it into a group.
        tokens.insert("space.sm.half", Token::new("2px")).unwrap();
        assert!(tokens.get("space.sm").is_none());
        assert_eq!(tokens.get("space.sm.half").unwrap().value, "2px");

        // A token at a group path drops the group.
        tokens.insert("color.brand", Token::new("#111")).unwrap();
        assert_eq!(tokens.get("color.brand").unwrap().value, "#111");
        assert!(tokens.get("color.brand.primary").is_none());
    }

    #[test]
    fn test_insert_rejects_bad_paths() {
        let mut tokens = TokenCollection::new();
        assert!(tokens.insert("", Token::new("x")).is_err());
        assert!(tokens.insert("a..b", Token::new("x")).is_err());
        assert!(tokens.insert("{a}", Token::new("x")).is_err());
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_remove_prunes_empty_groups() {
        let mut tokens = sample();
        assert_eq!(tokens.remove("color.brand"), None);
        assert_eq!(tokens.remove("space.sm"), Some(Token::new("4px")));
        assert!(tokens.get_node("space").is_none());

        tokens.remove("color.brand.primary");
        tokens.remove("color.brand.secondary");
        assert!(tokens.get_node("color.brand").is_none());
        assert!(tokens.contains("color.surface"));
        assert_eq!(tokens.remove("nope.nothing"), None);
    }

    #[test]
    fn test_keys_restartable() {
        let tokens = sample();
        let first: Vec<_> = tokens.keys().collect();
        let second: Vec<_> = tokens.keys().collect();
        assert_eq!(first, second);

        let mut keys = tokens.keys();
        assert!(keys.by_ref().take(4).count() == 4);
        assert_eq!(keys.next(), None);
        assert_eq!(keys.next(), None);
    }

    #[test]
    fn test_from_json() {
        let doc = json!({
            "color": {
                "$type": "color",
                "primary": "#3b82f6",
                "accent": { "$value": "{color.primary}", "$description": "Accent" },
            },
            "radius": { "md": 8 },
            "motion": { "reduced": false },
        });
        let tokens = TokenCollection::from_json(&doc).unwrap();

        let primary = tokens.get("color.primary").unwrap();
        assert_eq!(primary.value, "#3b82f6");
        assert_eq!(primary.kind.as_deref(), Some("color"));

        let accent = tokens.get("color.accent").unwrap();
        assert_eq!(accent.alias_target(), Some("color.primary"));
        assert_eq!(accent.kind.as_deref(), Some("color"));
        assert_eq!(accent.description.as_deref(), Some("Accent"));

        assert_eq!(tokens.get("radius.md").unwrap().value, "8");
        assert_eq!(tokens.get("motion.reduced").unwrap().value, "false");
        assert!(tokens.get("radius.md").unwrap().kind.is_none());

        let keys: Vec<_> = tokens.keys().collect();
        assert_eq!(
            keys,
            ["color.primary", "color.accent", "radius.md", "motion.reduced"]
        );
    }

    #[test]
    fn test_from_json_rejects_non_tokens() {
        let err = TokenCollection::from_json(&json!({ "a": { "b": [1, 2] } })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid token collection at 'a.b': expected a string, number or boolean"
        );

        let err = TokenCollection::from_json(&json!("red")).unwrap_err();
        assert!(matches!(err, LoadError::InvalidCollection { .. }));

        let err = TokenCollection::from_json(&json!({ "a b": "x" })).unwrap_err();
        assert!(matches!(err, LoadError::Token(_)));
    }

    #[test]
    fn test_from_json_rejects_dotted_keys() {
        let doc = json!({ "color.primary": "red", "link": "{color.primary}" });
        let err = TokenCollection::from_json(&doc).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid token path 'color.primary': key is not a single path segment"
        );

        let nested = json!({ "theme": { "brand.blue": "#1867c0" } });
        match TokenCollection::from_json(&nested).unwrap_err() {
            LoadError::Token(TokenError::InvalidPath { path, .. }) => {
                assert_eq!(path, "theme.brand.blue");
            }
            other => panic!("expected InvalidPath, got {other:?}"),
        }
    }

    #[test]
    fn test_every_listed_key_is_reachable() {
        let doc = json!({
            "color": { "primary": "red", "on": { "primary": "#fff" } },
            "link": "{color.primary}",
        });
        let tokens = TokenCollection::from_json(&doc).unwrap();
        for key in tokens.keys() {
            assert!(tokens.contains(&key), "{key} is listed but not reachable");
        }
    }

    #[test]
    fn test_toml_datetime_object_is_a_literal() {
        let doc = json!({
            "release": {
                "date": { "$__toml_private_datetime": "2024-01-01" },
                "name": "v1",
            }
        });
        let tokens = TokenCollection::from_json(&doc).unwrap();
        assert_eq!(tokens.get("release.date").unwrap().value, "2024-01-01");
        assert_eq!(
            tokens.keys().collect::<Vec<_>>(),
            ["release.date", "release.name"]
        );
    }

    #[test]
    fn test_is_empty_ignores_empty_groups() {
        let tokens = TokenCollection::from_json(&json!({ "a": {}, "b": { "c": {} } })).unwrap();
        assert!(tokens.is_empty());
        assert_eq!(tokens.len(), 0);

        let mut tokens = tokens;
        tokens.insert("b.c.d", Token::new("1px")).unwrap();
        assert!(!tokens.is_empty());
        assert!(TokenCollection::new().is_empty());
    }

    #[test]
    fn test_serialize_round_shape() {
        let mut tokens = sample();
        tokens
            .insert("space.md", Token::new("8px").with_kind("dimension"))
            .unwrap();

        let json = serde_json::to_value(&tokens).unwrap();
        assert_eq!(
            json,
            json!({
                "color": {
                    "brand": {
                        "primary": "#3b82f6",
                        "secondary": "{color.brand.primary}",
                    },
                    "surface": "#ffffff",
                },
                "space": {
                    "sm": "4px",
                    "md": { "$value": "8px", "$type": "dimension" },
                },
            })
        );

        let back: TokenCollection = serde_json::from_value(json).unwrap();
        assert_eq!(back.get("space.md").unwrap().kind.as_deref(), Some("dimension"));
        assert_eq!(back.len(), tokens.len());
    }
}
