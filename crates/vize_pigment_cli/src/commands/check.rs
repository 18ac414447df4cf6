//! Check command - Resolve every token and report broken ones

use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Instant;
use vize_pigment::{ResolveReport, TokenError};

use super::{open_store_or_exit, OutputFormat};
use crate::config::PigmentConfig;

#[derive(Args)]
pub struct CheckArgs {
    /// Token file (.json or .toml)
    #[arg(short, long)]
    pub tokens: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Quiet mode - only show summary
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn run(args: CheckArgs, config: &PigmentConfig) {
    let start = Instant::now();
    let store = open_store_or_exit(args.tokens.as_deref(), config);

    let report = store.resolve_all();
    let format = OutputFormat::parse(&args.format);

    if !args.quiet || !report.is_ok() {
        print!("{}", format_report(&report, format));
    }

    if format == OutputFormat::Text {
        println!("{}", format_summary(&report));
        println!(
            "Checked {} tokens in {:.4?}",
            report.resolved.len() + report.errors.len(),
            start.elapsed()
        );
    }

    if !report.is_ok() {
        std::process::exit(1);
    }
}

/// Short label for an error kind.
fn kind(error: &TokenError) -> &'static str {
    match error {
        TokenError::InvalidPath { .. } => "invalid-path",
        TokenError::NotFound { .. } => "not-found",
        TokenError::CircularAlias { .. } => "circular-alias",
        TokenError::AliasDepthExceeded { .. } => "alias-depth",
    }
}

/// Render every failure in the report.
pub fn format_report(report: &ResolveReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let errors: Vec<_> = report
                .errors
                .iter()
                .map(|(path, error)| {
                    serde_json::json!({
                        "path": path,
                        "kind": kind(error),
                        "message": error.to_string(),
                    })
                })
                .collect();
            let doc = serde_json::json!({
                "resolved": report.resolved.len(),
                "errors": errors,
            });
            let mut out = serde_json::to_string_pretty(&doc).unwrap_or_default();
            out.push('\n');
            out
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for (path, error) in &report.errors {
                writeln!(out, "error[{}] {}: {}", kind(error), path, error).ok();
            }
            out
        }
    }
}

/// One-line summary of the report.
pub fn format_summary(report: &ResolveReport) -> String {
    let total = report.resolved.len() + report.errors.len();
    if report.is_ok() {
        format!("\u{2713} all {} tokens resolve", total)
    } else {
        format!(
            "\u{2717} {} of {} tokens failed to resolve",
            report.errors.len(),
            total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vize_pigment::{TokenCollection, TokenStore};

    fn report() -> ResolveReport {
        TokenStore::new(
            TokenCollection::from_pairs([
                ("color.blue", "#1867c0"),
                ("color.primary", "{color.blue}"),
                ("color.broken", "{color.gone}"),
                ("color.a", "{color.b}"),
                ("color.b", "{color.a}"),
            ])
            .unwrap(),
        )
        .resolve_all()
    }

    #[test]
    fn test_format_report_text() {
        insta::assert_snapshot!(format_report(&report(), OutputFormat::Text), @r"
        error[not-found] color.broken: token not found: 'color.gone' (referenced from 'color.broken')
        error[circular-alias] color.a: circular alias: color.a -> color.b -> color.a
        error[circular-alias] color.b: circular alias: color.b -> color.a -> color.b
        ");
    }

    #[test]
    fn test_format_report_json() {
        let out = format_report(&report(), OutputFormat::Json);
        let doc: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(doc["resolved"], 2);
        assert_eq!(doc["errors"].as_array().unwrap().len(), 3);
        assert_eq!(doc["errors"][0]["kind"], "not-found");
        assert_eq!(doc["errors"][0]["path"], "color.broken");
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(
            format_summary(&report()),
            "\u{2717} 3 of 5 tokens failed to resolve"
        );
        assert_eq!(
            format_summary(&ResolveReport::default()),
            "\u{2713} all 0 tokens resolve"
        );
    }
}
