//! # vize_pigment
//!
//! Pigment - Design token resolution for Vize.
//!
//! ## Name Origin
//!
//! **Pigment** is the raw colour an artist grinds before it ever touches the
//! canvas. Design tokens play the same role for a component library: named
//! colours, spacings and radii that components reference instead of
//! hardcoding. `vize_pigment` stores those tokens and resolves references
//! between them.
//!
//! ## Concepts
//!
//! - **Token**: a named value stored at a dotted path (`color.brand.primary`)
//! - **Alias**: a token whose whole value is another path in braces
//!   (`{color.brand.primary}`)
//! - **Resolution**: following aliases to the final literal
//! - **Collection**: the nested, ordered tree holding every token
//!
//! ## Usage
//!
//! ```rust
//! use vize_pigment::{create_store, parse_collection, TokenError, TokenFormat};
//!
//! let tokens = parse_collection(
//!     r##"{
//!         "color": {
//!             "blue": "#1867c0",
//!             "primary": "{color.blue}",
//!             "link": "{color.primary}"
//!         }
//!     }"##,
//!     TokenFormat::Json,
//! )
//! .unwrap();
//!
//! let mut store = create_store(tokens);
//! assert_eq!(store.resolve("color.link").unwrap(), "#1867c0");
//!
//! // Overrides invalidate cached resolutions.
//! store.register("color.blue", "#2196f3").unwrap();
//! assert_eq!(store.resolve("color.link").unwrap(), "#2196f3");
//!
//! store.register("color.blue", "{color.link}").unwrap();
//! assert!(matches!(
//!     store.resolve("color.link"),
//!     Err(TokenError::CircularAlias { .. })
//! ));
//! ```
//!
//! ## Failure kinds
//!
//! [`TokenError::NotFound`] is recoverable (fall back to a default).
//! [`TokenError::CircularAlias`] and [`TokenError::AliasDepthExceeded`] mean
//! the token set itself is broken; [`TokenStore::resolve_all`] surfaces them
//! up front.

pub mod collection;
pub mod error;
pub mod loader;
pub mod path;
pub mod store;
pub mod token;

pub use collection::{Entries, Keys, TokenCollection, TokenNode};
pub use error::{LoadError, TokenError, TokenResult};
pub use loader::{load_collection, parse_collection, TokenFormat};
pub use path::{is_alias, normalize_path, parse_alias};
pub use store::{
    create_store, CacheStats, ResolveReport, StoreOptions, TokenStore, DEFAULT_MAX_ALIAS_DEPTH,
};
pub use token::Token;

// Re-export compact_str::CompactString for convenience
pub use compact_str::CompactString;
