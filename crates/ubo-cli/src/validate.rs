//! # Validate Subcommand
//!
//! Loads a data directory the way the server does at startup, then renders
//! every category once. Exits 1 when any category fails, listing each fault
//! with the country, category and raw value involved.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use crate::SourceArgs;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Treat dataset country codes without a boundary polygon as faults.
    #[arg(long)]
    pub strict_geo: bool,
}

pub fn run_validate(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let atlas = args.source.load()?;

    let faults = atlas.integrity_faults();
    let unmatched = atlas.unmatched_codes();

    for (index, fault) in &faults {
        writeln!(out, "FAIL [{index}] {fault}")?;
    }
    for code in &unmatched {
        let tag = if args.strict_geo { "FAIL" } else { "WARN" };
        writeln!(out, "{tag} country code {code} has no boundary polygon")?;
    }

    let failed = !faults.is_empty() || (args.strict_geo && !unmatched.is_empty());
    writeln!(
        out,
        "{}: {} categories, {} countries, {} faults",
        if failed { "INVALID" } else { "OK" },
        atlas.registry().len(),
        atlas.dataset().countries().len(),
        faults.len()
    )?;

    if failed {
        tracing::warn!(faults = faults.len(), "validation failed");
        Ok(1)
    } else {
        Ok(0)
    }
}
