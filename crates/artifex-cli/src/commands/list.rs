//! List command implementation

use anyhow::Result;
use artifex_core::ArtifactSource;
use artifex_core::Dirs;
use artifex_core::Extractor;
use artifex_core::ListingOutcome;
use artifex_core::inspection::list_dir;
use artifex_core::list_content;

use crate::cli::ListArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = args.cache.to_config().with_max_listed_entries(args.max_entries);

    let outcome = if args.path.is_dir() {
        ListingOutcome::Listed(add_path_context(
            list_dir(&args.path, args.platform, &config),
            &args.path,
        )?)
    } else {
        let filename = args
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let source = ArtifactSource::new(filename.clone(), filename)
            .with_path(&args.path)
            .with_platform(args.platform);
        list_content(&source, &Dirs::default(), &Extractor::new(config))
    };

    formatter.format_listing(&args.path, &outcome)?;
    if let ListingOutcome::Failed(reason) = outcome {
        anyhow::bail!("listing '{}' failed: {reason}", args.path.display());
    }
    Ok(())
}
