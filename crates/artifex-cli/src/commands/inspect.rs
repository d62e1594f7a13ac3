//! Inspect command implementation

use std::fs;

use anyhow::Context;
use anyhow::Result;
use artifex_core::ArtifactSource;
use artifex_core::Dirs;
use artifex_core::Extractor;
use artifex_core::build_page;
use tracing::debug;

use crate::cli::InspectArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;

pub fn execute(args: &InspectArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let dirs = Dirs::under(&args.root);
    let filename = args.filename.clone().unwrap_or_else(|| args.id.clone());

    let mut source = ArtifactSource::new(args.id.clone(), filename)
        .with_platform(args.platform)
        .with_no_readme(args.no_readme);
    if let Some(listing) = &args.declared_listing {
        let text = fs::read_to_string(listing)
            .with_context(|| format!("cannot read declared listing '{}'", listing.display()))?;
        source = source.with_declared_listing(&text);
    }

    debug!(id = %args.id, root = %args.root.display(), "building page bundle");
    let extractor = Extractor::new(args.cache.to_config());
    let page = add_path_context(
        build_page(&source, &dirs, &extractor),
        &dirs.download.join(&args.id),
    )?;
    formatter.format_page(&page)
}
