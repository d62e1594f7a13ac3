//! Classify command implementation

use std::fs;

use anyhow::Context;
use anyhow::Result;
use artifex_core::signature;
use artifex_core::text::classify_text;
use artifex_core::text::sanitize;

use crate::cli::ClassifyArgs;
use crate::output::ClassifiedFile;
use crate::output::OutputFormatter;

pub fn execute(args: &ClassifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mut files = Vec::with_capacity(args.files.len());

    for path in &args.files {
        let size = fs::metadata(path)
            .with_context(|| format!("cannot read '{}'", path.display()))?
            .len();
        let sniffed = if args.whole {
            signature::classify_path(path)
        } else {
            signature::sniff_path(path)
        };
        let signature = sniffed.with_context(|| format!("cannot read '{}'", path.display()))?;

        let encoding = if signature.is_text() {
            let bytes =
                fs::read(path).with_context(|| format!("cannot read '{}'", path.display()))?;
            Some(classify_text(&sanitize(&bytes)))
        } else {
            None
        };

        files.push(ClassifiedFile {
            path: path.clone(),
            size,
            signature,
            category: signature.category(),
            encoding,
        });
    }

    formatter.format_classification(&files)
}
