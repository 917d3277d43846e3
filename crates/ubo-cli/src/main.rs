//! # ubo CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ubo_cli::categories::{run_categories, CategoriesArgs};
use ubo_cli::render::{run_render, RenderArgs};
use ubo_cli::validate::{run_validate, ValidateArgs};

/// UBO Atlas CLI
///
/// Inspects the category registry, validates atlas data directories, and
/// renders choropleth figures without starting the web service.
#[derive(Parser, Debug)]
#[command(name = "ubo", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List categories and their legends.
    Categories(CategoriesArgs),

    /// Load a data directory and check that every category renders.
    Validate(ValidateArgs),

    /// Print a figure as Plotly JSON.
    Render(RenderArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so `ubo render` output can be piped.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Categories(args) => run_categories(&args, &mut stdout),
        Commands::Validate(args) => run_validate(&args, &mut stdout),
        Commands::Render(args) => run_render(&args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
