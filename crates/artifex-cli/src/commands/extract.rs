//! Extract command implementation.

use anyhow::Result;
use artifex_core::Extractor;

use crate::cli::ExtractArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;

pub fn execute(args: &ExtractArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let extractor = Extractor::new(args.cache.to_config());
    let extraction = add_path_context(
        extractor.extract_named(&args.archive, args.filename.as_deref()),
        &args.archive,
    )?;

    formatter.format_extraction(&args.archive, &extraction)?;

    Ok(())
}
