//! # pigment
//!
//! Command-line front end for `vize_pigment`. Loads a token file, resolves
//! aliases and reports broken token sets before they reach a build.

mod commands;
mod config;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pigment")]
#[command(about = "Design token resolution for Vize", long_about = None)]
#[command(version)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve one or more token paths
    Resolve(commands::resolve::ResolveArgs),

    /// Resolve every token and report missing targets and cycles
    Check(commands::check::CheckArgs),

    /// List token paths
    #[command(visible_alias = "ls")]
    List(commands::list::ListArgs),
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load_config(None);

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &config),
        Commands::Check(args) => commands::check::run(args, &config),
        Commands::List(args) => commands::list::run(args, &config),
    }
}
