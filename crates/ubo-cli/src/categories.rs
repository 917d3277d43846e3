//! # Categories Subcommand
//!
//! Prints the registry in display order: title, description, and one
//! legend line per status with its code and colour.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::load_registry;

/// Arguments for the categories subcommand.
#[derive(Args, Debug)]
pub struct CategoriesArgs {
    /// YAML registry replacing the built-in categories.
    #[arg(long)]
    pub registry: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

pub fn run_categories(args: &CategoriesArgs, out: &mut impl Write) -> Result<u8> {
    let registry = load_registry(args.registry.as_deref())?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, registry.categories())?;
        writeln!(out)?;
        return Ok(0);
    }

    for (index, category) in registry.iter() {
        writeln!(out, "[{index}] {}", category.title)?;
        writeln!(out, "    {}", category.description)?;
        for entry in category.legend() {
            writeln!(out, "    {} {} {}", entry.code.code(), entry.color, entry.label)?;
        }
        if let Some(fallback) = category.fallback {
            writeln!(out, "    (unlisted values: {})", fallback.code())?;
        }
        writeln!(out)?;
    }
    writeln!(out, "Total: {} categories", registry.len())?;
    Ok(0)
}
