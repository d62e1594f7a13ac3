//! Readme command implementation

use anyhow::Result;
use artifex_core::ArtifactSource;
use artifex_core::Dirs;
use artifex_core::render_readme;

use crate::cli::ReadmeArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;

pub fn execute(args: &ReadmeArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let filename = args
        .file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source = ArtifactSource::new(filename.clone(), filename)
        .with_path(&args.file)
        .with_platform(args.platform);

    let outcome = add_path_context(render_readme(&source, &Dirs::default()), &args.file)?;
    formatter.format_readme(&args.file, &outcome, args.encoding)
}
