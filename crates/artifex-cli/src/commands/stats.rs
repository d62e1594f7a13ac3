//! Stats command implementation

use anyhow::Result;
use artifex_core::StatsCache;

use crate::cli::StatsArgs;
use crate::error::add_path_context;
use crate::output::OutputFormatter;

pub fn execute(args: &StatsArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let cache = StatsCache::new();
    let stats = add_path_context(cache.refresh(&args.dir), &args.dir)?;
    formatter.format_stats(&args.dir, &stats)
}
