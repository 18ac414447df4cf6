//! Token store with alias resolution and memoization.

use std::cell::{Cell, RefCell};

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::collection::{Entries, Keys, TokenCollection};
use crate::error::{TokenError, TokenResult};
use crate::path::{normalize_path, parse_alias};
use crate::token::Token;

/// Default maximum number of alias hops.
pub const DEFAULT_MAX_ALIAS_DEPTH: usize = 32;

/// Store configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    /// Maximum number of alias hops followed before giving up.
    pub max_alias_depth: usize,
    /// Memoize resolved values.
    pub cache: bool,
}

impl Default for StoreOptions {
    #[inline]
    fn default() -> Self {
        Self {
            max_alias_depth: DEFAULT_MAX_ALIAS_DEPTH,
            cache: true,
        }
    }
}

/// Counters describing cache behaviour since the store was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Resolutions answered from the cache.
    pub hits: u64,
    /// Resolutions that walked the collection.
    pub misses: u64,
    /// Paths currently cached.
    pub entries: usize,
}

/// Outcome of resolving every token in a store.
#[derive(Debug, Clone, Default)]
pub struct ResolveReport {
    /// Successfully resolved `(path, value)` pairs, in key order.
    pub resolved: Vec<(String, CompactString)>,
    /// Failures, in key order.
    pub errors: Vec<(String, TokenError)>,
}

impl ResolveReport {
    /// Whether every token resolved.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A design-token store.
///
/// Holds a nested [`TokenCollection`] and answers "what literal does this
/// path resolve to?". Aliases are followed until a literal is reached; the
/// walk fails on missing tokens, cycles and chains longer than
/// [`StoreOptions::max_alias_depth`]. Successful resolutions are cached and
/// the whole cache is dropped on every mutation.
///
/// The cache uses interior mutability so that [`TokenStore::resolve`] takes
/// `&self`. The store is therefore not `Sync`; share it across threads
/// behind a lock.
///
/// ```
/// use vize_pigment::{TokenCollection, TokenStore};
///
/// let mut store = TokenStore::new(TokenCollection::new());
/// store.register("color.red", "#ef4444").unwrap();
/// store.register("color.danger", "{color.red}").unwrap();
///
/// assert_eq!(store.resolve("color.danger").unwrap(), "#ef4444");
/// assert_eq!(store.resolve("{color.danger}").unwrap(), "#ef4444");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    tokens: TokenCollection,
    options: StoreOptions,
    cache: RefCell<FxHashMap<CompactString, CompactString>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl TokenStore {
    /// Create a store seeded with `initial`.
    #[inline]
    pub fn new(initial: TokenCollection) -> Self {
        Self::with_options(initial, StoreOptions::default())
    }

    /// Create a store with explicit options.
    pub fn with_options(initial: TokenCollection, options: StoreOptions) -> Self {
        tracing::debug!(
            "creating token store with {} tokens (max alias depth {}, cache {})",
            initial.len(),
            options.max_alias_depth,
            options.cache
        );
        Self {
            tokens: initial,
            options,
            cache: RefCell::default(),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// Store options.
    #[inline]
    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// The underlying collection.
    #[inline]
    pub fn collection(&self) -> &TokenCollection {
        &self.tokens
    }

    /// Insert or overwrite the token at `id`.
    ///
    /// `id` may be written bare or wrapped as `{id}`. The value is stored as
    /// is; malformed alias syntax is not rejected here and simply behaves as
    /// a literal.
    #[inline]
    pub fn register(&mut self, id: &str, value: impl Into<CompactString>) -> TokenResult<()> {
        self.register_token(id, Token::new(value))
    }

    /// Insert or overwrite the token at `id`, keeping its metadata.
    pub fn register_token(&mut self, id: &str, token: Token) -> TokenResult<()> {
        let path = normalize_path(id);
        tracing::debug!("register {} = {}", path, token.value);
        self.tokens.insert(path, token)?;
        self.invalidate();
        Ok(())
    }

    /// Remove the token at `id`, returning it.
    pub fn unregister(&mut self, id: &str) -> Option<Token> {
        let removed = self.tokens.remove(normalize_path(id))?;
        tracing::debug!("unregister {}", normalize_path(id));
        self.invalidate();
        Some(removed)
    }

    /// Remove every token.
    pub fn clear(&mut self) {
        self.tokens.clear();
        self.invalidate();
    }

    /// Whether a token (alias or literal) exists at exactly `id`.
    #[inline]
    pub fn has(&self, id: &str) -> bool {
        self.tokens.contains(normalize_path(id))
    }

    /// The raw, unresolved token at `id`.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&Token> {
        self.tokens.get(normalize_path(id))
    }

    /// Every token path, depth first in insertion order.
    #[inline]
    pub fn keys(&self) -> Keys<'_> {
        self.tokens.keys()
    }

    /// Every `(path, token)` pair, depth first in insertion order.
    #[inline]
    pub fn entries(&self) -> Entries<'_> {
        self.tokens.entries()
    }

    /// Number of tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the store holds no tokens.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Resolve `id` to its literal value.
    ///
    /// `id` may be written bare or wrapped as `{id}`; both share a cache
    /// entry. An empty literal is a valid result, distinct from
    /// [`TokenError::NotFound`].
    pub fn resolve(&self, id: &str) -> TokenResult<CompactString> {
        let path = normalize_path(id);

        if self.options.cache {
            if let Some(value) = self.cache.borrow().get(path) {
                self.hits.set(self.hits.get() + 1);
                tracing::trace!("cache hit: {}", path);
                return Ok(value.clone());
            }
        }
        self.misses.set(self.misses.get() + 1);

        let (chain, value) = self.walk(path)?;

        if self.options.cache {
            let mut cache = self.cache.borrow_mut();
            for visited in chain {
                cache.insert(visited, value.clone());
            }
        }

        Ok(value)
    }

    /// Resolve a token *value*: aliases are followed, literals pass through.
    ///
    /// Handy for style values that may or may not reference a token.
    #[inline]
    pub fn resolve_value(&self, value: &str) -> TokenResult<CompactString> {
        match parse_alias(value) {
            Some(target) => self.resolve(target),
            None => Ok(CompactString::from(value)),
        }
    }

    /// Resolve every token, collecting successes and failures.
    pub fn resolve_all(&self) -> ResolveReport {
        let mut report = ResolveReport::default();
        for path in self.keys() {
            match self.resolve(&path) {
                Ok(value) => report.resolved.push((path, value)),
                Err(err) => report.errors.push((path, err)),
            }
        }
        report
    }

    /// Cache counters.
    #[inline]
    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            entries: self.cache.borrow().len(),
        }
    }

    /// Follow the alias chain starting at `path`.
    ///
    /// Returns every path visited, `path` first, along with the literal.
    fn walk(&self, path: &str) -> TokenResult<(Vec<CompactString>, CompactString)> {
        let mut chain = vec![CompactString::from(path)];
        let mut current = path;

        loop {
            let Some(token) = self.tokens.get(current) else {
                let referenced_from = chain
                    .len()
                    .checked_sub(2)
                    .map(|previous| chain[previous].clone());
                return Err(TokenError::NotFound {
                    path: current.into(),
                    referenced_from,
                });
            };

            let Some(target) = token.alias_target() else {
                return Ok((chain, token.value.clone()));
            };

            if chain.iter().any(|visited| visited.as_str() == target) {
                chain.push(target.into());
                return Err(TokenError::CircularAlias { cycle: chain });
            }

            // `chain.len()` hops once `target` is pushed.
            if chain.len() > self.options.max_alias_depth {
                return Err(TokenError::AliasDepthExceeded {
                    path: path.into(),
                    limit: self.options.max_alias_depth,
                });
            }

            chain.push(target.into());
            current = target;
        }
    }

    fn invalidate(&mut self) {
        let cache = self.cache.get_mut();
        if !cache.is_empty() {
            tracing::debug!("invalidating {} cached resolutions", cache.len());
            cache.clear();
        }
    }
}

/// Create a store seeded with `initial`.
#[inline]
pub fn create_store(initial: TokenCollection) -> TokenStore {
    TokenStore::new(initial)
}
