//! The key/value bundle handed to the page template.

use serde::Serialize;

use crate::ArtifactSource;
use crate::Dirs;
use crate::Extractor;
use crate::Result;
use crate::inspection::list_content;
use crate::readme::ReadmeOutcome;
use crate::readme::render_readme;
use crate::text::TextEncoding;

/// Preview image extensions, in lookup order.
const PREVIEW_EXTENSIONS: [&str; 4] = ["webp", "png", "jpg", "avif"];

/// Everything the artifact page shows about contents and readme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBundle {
    /// Readme decoded as ISO-8859-1.
    pub readme_latin1: String,
    /// Readme decoded as CP437.
    #[serde(rename = "readmeCP437")]
    pub readme_cp437: String,
    /// Readme line count.
    pub readme_lines: usize,
    /// Widest readme line.
    pub readme_rows: usize,
    /// Pre-select the Amiga Topaz (ISO-8859-1) rendering.
    pub topaz_check: bool,
    /// Pre-select the VGA (CP437) rendering.
    pub vga_check: bool,
    /// The readme is UTF-8 and has a single rendering.
    pub utf8_check: bool,
    /// No preview image exists.
    pub no_screenshot: bool,
    /// No stored download exists.
    pub no_download: bool,
    /// No readme is shown.
    pub no_readme: bool,
    /// Content listing lines.
    pub content_listing: Vec<String>,
    /// Shown instead of, or next to, the listing.
    pub content_note: Option<String>,
}

/// Builds the page bundle for `source`.
///
/// Missing files and unsupported formats only change flags.
///
/// # Errors
///
/// Returns an error only when a readme classified as UTF-8 fails to
/// decode, or an I/O error other than a missing file occurs while loading
/// the readme.
pub fn build_page(
    source: &ArtifactSource,
    dirs: &Dirs,
    extractor: &Extractor,
) -> Result<PageBundle> {
    let mut page = PageBundle {
        no_screenshot: !has_preview(source, dirs),
        no_download: !source.download_path(dirs).is_some_and(|p| p.is_file()),
        ..PageBundle::default()
    };

    match render_readme(source, dirs)? {
        ReadmeOutcome::Rendered(readme) => {
            let preferred = readme.preferred();
            page.topaz_check = preferred == TextEncoding::Latin1;
            page.vga_check = preferred == TextEncoding::Cp437;
            page.utf8_check = preferred == TextEncoding::Utf8;
            page.readme_lines = readme.line_count;
            page.readme_rows = readme.max_line_width;
            page.readme_latin1 = readme.latin1;
            page.readme_cp437 = readme.cp437;
        }
        ReadmeOutcome::Skipped(_) => page.no_readme = true,
    }

    let listing = list_content(source, dirs, extractor);
    page.content_note = listing.note().map(str::to_owned);
    page.content_listing = listing.lines();
    Ok(page)
}

fn has_preview(source: &ArtifactSource, dirs: &Dirs) -> bool {
    let id = source.id.trim();
    if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
        return false;
    }
    PREVIEW_EXTENSIONS
        .iter()
        .any(|ext| dirs.preview.join(format!("{id}.{ext}")).is_file())
}
