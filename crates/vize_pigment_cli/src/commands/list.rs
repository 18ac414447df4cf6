//! List command - Print every token path

use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use vize_pigment::TokenStore;

use super::open_store_or_exit;
use crate::config::PigmentConfig;

#[derive(Args)]
pub struct ListArgs {
    /// Token file (.json or .toml)
    #[arg(short, long)]
    pub tokens: Option<PathBuf>,

    /// Show each token's resolved value
    #[arg(short, long)]
    pub resolved: bool,

    /// Only list paths under this prefix
    #[arg(short, long)]
    pub prefix: Option<String>,
}

pub fn run(args: ListArgs, config: &PigmentConfig) {
    let store = open_store_or_exit(args.tokens.as_deref(), config);
    print!("{}", render(&store, args.prefix.as_deref(), args.resolved));
}

/// Render the token listing.
pub fn render(store: &TokenStore, prefix: Option<&str>, resolved: bool) -> String {
    let mut out = String::new();

    for (path, token) in store.entries() {
        if let Some(prefix) = prefix {
            let under = path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'));
            if !under {
                continue;
            }
        }

        if !resolved {
            writeln!(out, "{}", path).ok();
            continue;
        }

        match store.resolve(&path) {
            Ok(value) if token.is_alias() => {
                writeln!(out, "{} = {} ({})", path, value, token.value).ok()
            }
            Ok(value) => writeln!(out, "{} = {}", path, value).ok(),
            Err(e) => writeln!(out, "{} = <{}>", path, e).ok(),
        };
    }

    out
}
