//! # Render Subcommand
//!
//! Prints the Plotly figure JSON for one category or for the placeholder,
//! exactly as the web service would return it.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use crate::SourceArgs;

/// Arguments for the render subcommand.
#[derive(Args, Debug)]
#[command(group(
    clap::ArgGroup::new("target")
        .required(true)
        .args(["category", "placeholder"]),
))]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Category index to render, starting at 0.
    #[arg(long)]
    pub category: Option<usize>,

    /// Render the introductory map instead of a category.
    #[arg(long)]
    pub placeholder: bool,

    /// Pretty-print the JSON.
    #[arg(long)]
    pub pretty: bool,
}

pub fn run_render(args: &RenderArgs, out: &mut impl Write) -> Result<u8> {
    let atlas = args.source.load()?;

    let figure = match args.category {
        Some(index) => atlas
            .render(index)
            .with_context(|| format!("rendering category {index}"))?,
        None => atlas.placeholder(),
    };

    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &figure)?;
    } else {
        serde_json::to_writer(&mut *out, &figure)?;
    }
    writeln!(out)?;
    Ok(0)
}
