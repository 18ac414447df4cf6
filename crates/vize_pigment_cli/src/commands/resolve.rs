//! Resolve command - Print the literal value behind token paths

use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use vize_pigment::TokenStore;

use super::{open_store_or_exit, OutputFormat};
use crate::config::PigmentConfig;

#[derive(Args)]
pub struct ResolveArgs {
    /// Token paths, bare (`color.primary`) or wrapped (`{color.primary}`)
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Token file (.json or .toml)
    #[arg(short, long)]
    pub tokens: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

pub fn run(args: ResolveArgs, config: &PigmentConfig) {
    let store = open_store_or_exit(args.tokens.as_deref(), config);
    let (output, failed) = render(&store, &args.paths, OutputFormat::parse(&args.format));

    print!("{}", output);

    if failed {
        std::process::exit(1);
    }
}

/// Resolve `paths` and render the result. Returns whether any path failed.
pub fn render(store: &TokenStore, paths: &[String], format: OutputFormat) -> (String, bool) {
    let results: Vec<_> = paths
        .iter()
        .map(|path| (path.as_str(), store.resolve(path)))
        .collect();
    let failed = results.iter().any(|(_, r)| r.is_err());

    let output = match format {
        OutputFormat::Json => {
            let mut resolved = serde_json::Map::new();
            let mut errors = serde_json::Map::new();
            for (path, result) in &results {
                match result {
                    Ok(value) => {
                        resolved.insert(path.to_string(), value.as_str().into());
                    }
                    Err(e) => {
                        errors.insert(path.to_string(), e.to_string().into());
                    }
                }
            }
            let doc = serde_json::json!({ "resolved": resolved, "errors": errors });
            let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
            out.push('\n');
            out
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (path, result) in &results {
                match result {
                    Ok(value) => writeln!(out, "{} = {}", path, value).ok(),
                    Err(e) => writeln!(out, "error: {}", e).ok(),
                };
            }
            out
        }
    };

    (output, failed)
}
