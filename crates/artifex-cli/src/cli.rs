//! CLI argument parsing using clap.

use std::path::PathBuf;

use artifex_core::ArchiveLimits;
use artifex_core::InspectConfig;
use artifex_core::Platform;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "artifex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify file formats and text encodings
    Classify(ClassifyArgs),
    /// Strip ANSI escapes and SAUCE metadata from a text file
    Sanitize(SanitizeArgs),
    /// Render a readme as ISO-8859-1 and CP437
    Readme(ReadmeArgs),
    /// List the contents of an archive or extracted directory
    List(ListArgs),
    /// Extract an archive into the extraction cache
    Extract(ExtractArgs),
    /// Build the full page bundle for a stored artifact
    Inspect(InspectArgs),
    /// Count files per category in a download directory
    Stats(StatsArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

/// Extraction cache location and archive limits.
#[derive(clap::Args)]
pub struct CacheArgs {
    /// Extraction cache directory (default: <temp>/artifex)
    #[arg(long, value_name = "DIR")]
    pub scratch_root: Option<PathBuf>,

    /// Refuse to decompress sources larger than this
    #[arg(long, value_parser = parse_byte_size)]
    pub max_source_size: Option<u64>,

    /// Maximum number of files to extract
    #[arg(long, default_value = "10000")]
    pub max_files: usize,

    /// Maximum total extracted size in bytes
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum single file size in bytes
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Maximum compression ratio
    #[arg(long, default_value = "100", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_compression_ratio: u32,
}

impl CacheArgs {
    /// Builds the pipeline configuration from the flags.
    pub fn to_config(&self) -> InspectConfig {
        let defaults = ArchiveLimits::default();
        let limits = ArchiveLimits {
            max_file_count: self.max_files,
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            max_total_size: self.max_total_size.unwrap_or(defaults.max_total_size),
            max_compression_ratio: f64::from(self.max_compression_ratio),
        };

        let mut config = InspectConfig::default().with_limits(limits);
        if let Some(root) = &self.scratch_root {
            config = config.with_scratch_root(root);
        }
        if let Some(size) = self.max_source_size {
            config = config.with_max_source_size(size);
        }
        config
    }
}

#[derive(clap::Args)]
pub struct ClassifyArgs {
    /// Files to classify
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Classify the whole file instead of its first 512 bytes
    #[arg(long)]
    pub whole: bool,
}

#[derive(clap::Args)]
pub struct SanitizeArgs {
    /// Text file to clean
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Write cleaned bytes here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ReadmeArgs {
    /// Readme or text file to render
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Platform tag of the artifact (dos, textamiga, windows, ...)
    #[arg(short, long, default_value = "other", value_parser = parse_platform)]
    pub platform: Platform,

    /// Rendering to print
    #[arg(short, long, value_enum, default_value_t = Rendering::Auto)]
    pub encoding: Rendering,
}

/// Which decoding of a legacy readme to print.
#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Rendering {
    /// The detected encoding
    Auto,
    /// ISO-8859-1 (Amiga Topaz)
    Latin1,
    /// IBM code page 437 (VGA)
    Cp437,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Archive file or extracted directory
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Platform tag of the artifact
    #[arg(short, long, default_value = "other", value_parser = parse_platform)]
    pub platform: Platform,

    /// Entries shown before the listing is truncated
    #[arg(long, default_value = "200")]
    pub max_entries: usize,

    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Original filename, used when the content is not recognized
    #[arg(long, value_name = "NAME")]
    pub filename: Option<String>,

    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(clap::Args)]
pub struct InspectArgs {
    /// Stored artifact id (file name under <ROOT>/download)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Directory holding download/, preview/, thumbnail/ and extra/
    #[arg(short, long, value_name = "ROOT")]
    pub root: PathBuf,

    /// Original filename of the artifact (default: the id)
    #[arg(short, long, value_name = "NAME")]
    pub filename: Option<String>,

    /// Platform tag of the artifact
    #[arg(short, long, default_value = "other", value_parser = parse_platform)]
    pub platform: Platform,

    /// File with the declared member listing, one name per line
    #[arg(long, value_name = "FILE")]
    pub declared_listing: Option<PathBuf>,

    /// The record has no readme
    #[arg(long)]
    pub no_readme: bool,

    #[command(flatten)]
    pub cache: CacheArgs,
}

#[derive(clap::Args)]
pub struct StatsArgs {
    /// Download directory to count
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

#[allow(clippy::unnecessary_wraps)]
fn parse_platform(s: &str) -> Result<Platform, String> {
    Ok(Platform::from_tag(s))
}

/// Parse byte size with optional suffix (K, M, G, T)
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (digits, multiplier) = match s.char_indices().last() {
        Some((at, 'K')) => (&s[..at], 1024),
        Some((at, 'M')) => (&s[..at], 1024_u64.pow(2)),
        Some((at, 'G')) => (&s[..at], 1024_u64.pow(3)),
        Some((at, 'T')) => (&s[..at], 1024_u64.pow(4)),
        _ => (s, 1),
    };

    digits
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| n.checked_mul(multiplier).ok_or_else(|| format!("byte size overflow: {s}")))
}
