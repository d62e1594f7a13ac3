//! Sanitize command implementation

use std::fs;
use std::io;
use std::io::Write;

use anyhow::Context;
use anyhow::Result;
use artifex_core::text::AnsiCompat;
use artifex_core::text::check_ansi;
use artifex_core::text::sanitize;

use crate::cli::SanitizeArgs;
use crate::output::OutputFormatter;
use crate::output::SanitizeSummary;

pub fn execute(args: &SanitizeArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let raw = fs::read(&args.file)
        .with_context(|| format!("cannot read '{}'", args.file.display()))?;
    let cleaned = sanitize(&raw);
    let compat = check_ansi(&raw, &cleaned);

    let Some(output) = &args.output else {
        // Cleaned bytes go to stdout untouched; they are not necessarily UTF-8.
        if compat == AnsiCompat::Incompatible {
            formatter.format_warning("cursor movement or unknown escapes remain");
        }
        let mut stdout = io::stdout().lock();
        stdout.write_all(&cleaned)?;
        stdout.write_all(b"\n")?;
        return Ok(());
    };

    fs::write(output, &cleaned).with_context(|| format!("cannot write '{}'", output.display()))?;
    formatter.format_sanitized(&SanitizeSummary::new(
        &args.file,
        output,
        raw.len(),
        cleaned.len(),
        compat,
    ))
}
