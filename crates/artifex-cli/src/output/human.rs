//! Human-readable output formatter with colors and styling.

use std::path::Path;

use anyhow::Result;
use artifex_core::CategoryStats;
use artifex_core::DisplayValue;
use artifex_core::Extraction;
use artifex_core::ListingOutcome;
use artifex_core::PageBundle;
use artifex_core::ReadmeOutcome;
use artifex_core::TextEncoding;
use console::Term;
use console::style;

use super::formatter::ClassifiedFile;
use super::formatter::OutputFormatter;
use super::formatter::SanitizeSummary;
use crate::cli::Rendering;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }

    fn heading(&self, mark: &str, text: &str) {
        if self.use_colors {
            self.line(&format!("{} {text}", style(mark).green().bold()));
        } else {
            self.line(text);
        }
    }

    fn note(&self, text: &str) {
        if self.use_colors {
            self.line(&format!("{}", style(text).dim()));
        } else {
            self.line(text);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_classification(&self, files: &[ClassifiedFile]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for file in files {
            let mut text = format!("{}: {}", file.path.display(), file.signature);
            if let Some(encoding) = file.encoding {
                text.push_str(&format!(", {encoding}"));
            }
            if self.verbose {
                text.push_str(&format!(" ({}, {})", file.category, DisplayValue::Bytes(file.size)));
            }
            self.line(&text);
        }
        Ok(())
    }

    fn format_sanitized(&self, summary: &SanitizeSummary) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.heading("✓", &format!("Cleaned text written to {}", summary.output.display()));
        self.line(&format!(
            "  {} → {}",
            DisplayValue::Bytes(summary.bytes_in as u64),
            DisplayValue::Bytes(summary.bytes_out as u64)
        ));
        if !summary.ansi_compatible {
            self.format_warning(
                "cursor movement or unknown escapes remain; the text will not render as shown",
            );
        }
        Ok(())
    }

    fn format_readme(
        &self,
        path: &Path,
        outcome: &ReadmeOutcome,
        rendering: Rendering,
    ) -> Result<()> {
        let readme = match outcome {
            ReadmeOutcome::Rendered(readme) => readme,
            ReadmeOutcome::Skipped(reason) => {
                self.format_warning(&format!("no readme for {}: {reason}", path.display()));
                return Ok(());
            }
        };
        if self.quiet {
            return Ok(());
        }

        if self.verbose {
            self.note(&format!(
                "{}: {}, {} lines, {} columns",
                path.display(),
                readme.encoding,
                DisplayValue::Count(i64::try_from(readme.line_count).unwrap_or(i64::MAX)),
                readme.max_line_width
            ));
        }
        let text: &str = match rendering {
            Rendering::Auto => readme.text(),
            Rendering::Latin1 => &readme.latin1,
            Rendering::Cp437 => &readme.cp437,
        };
        self.line(text);
        Ok(())
    }

    fn format_listing(&self, path: &Path, outcome: &ListingOutcome) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match outcome {
            ListingOutcome::Declared(listing) if listing.is_empty() => {
                self.format_warning(&format!("{} is not an archive", path.display()));
            }
            ListingOutcome::Listed(_) | ListingOutcome::Declared(_) => {
                for line in outcome.lines() {
                    self.line(&line);
                }
            }
            ListingOutcome::TooLarge | ListingOutcome::Failed(_) => {
                if let Some(note) = outcome.note() {
                    self.format_warning(note);
                }
            }
        }
        Ok(())
    }

    fn format_extraction(&self, archive: &Path, extraction: &Extraction) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match extraction {
            Extraction::Extracted { dir, report } => {
                self.heading("✓", &format!("Extracted {}", archive.display()));
                self.line(&format!("  Directory: {}", dir.display()));
                self.line(&format!(
                    "  Files extracted: {}",
                    DisplayValue::Count(i64::try_from(report.files_extracted).unwrap_or(i64::MAX))
                ));
                self.line(&format!("  Total size: {}", DisplayValue::Bytes(report.bytes_written)));
                if self.verbose {
                    self.line(&format!("  Unpacker: {}", report.unpacker));
                    self.line(&format!("  Directories: {}", report.directories_created));
                    self.line(&format!("  Duration: {:?}", report.duration));
                }
                for warning in &report.warnings {
                    self.format_warning(warning);
                }
            }
            Extraction::Cached { dir } => {
                self.heading("✓", &format!("Already extracted: {}", dir.display()));
            }
            Extraction::TooLarge { size, limit } => {
                self.format_warning(&format!(
                    "{} is too large to decompress ({} > {})",
                    archive.display(),
                    DisplayValue::Bytes(*size),
                    DisplayValue::Bytes(*limit)
                ));
            }
        }
        Ok(())
    }

    fn format_page(&self, page: &PageBundle) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let flag = |set: bool| if set { "no" } else { "yes" };
        self.line(&format!("Download:   {}", flag(page.no_download)));
        self.line(&format!("Screenshot: {}", flag(page.no_screenshot)));
        if page.no_readme {
            self.line("Readme:     no");
        } else {
            let encoding = if page.utf8_check {
                TextEncoding::Utf8
            } else if page.vga_check {
                TextEncoding::Cp437
            } else {
                TextEncoding::Latin1
            };
            self.line(&format!(
                "Readme:     {encoding}, {} lines, {} columns",
                page.readme_lines, page.readme_rows
            ));
        }

        if let Some(note) = &page.content_note {
            self.format_warning(note);
        }
        if !page.content_listing.is_empty() {
            self.line("");
            for line in &page.content_listing {
                self.line(line);
            }
        }
        if self.verbose && !page.no_readme {
            self.line("");
            let text = if page.vga_check {
                &page.readme_cp437
            } else {
                &page.readme_latin1
            };
            self.line(text);
        }
        Ok(())
    }

    fn format_stats(&self, dir: &Path, stats: &CategoryStats) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.heading("✓", &format!("Files in {}", dir.display()));
        for (category, count, bytes) in stats.rows() {
            self.line(&format!(
                "  {:<8} {:>10}  {:>8}",
                category.to_string(),
                count.to_string(),
                bytes.to_string()
            ));
        }
        let total = stats.total();
        self.line(&format!(
            "  {:<8} {:>10}  {:>8}",
            "total",
            DisplayValue::Count(total.count).to_string(),
            DisplayValue::Bytes(total.bytes).to_string()
        ));
        if let Some(at) = stats.refreshed_at {
            self.note(&format!("  counted {}", DisplayValue::Timestamp(at)));
        }
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            self.line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            self.line(&format!("WARNING: {message}"));
        }
    }
}
