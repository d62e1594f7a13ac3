//! Per-category statistics over a download directory.
//!
//! A [`StatsCache`] is owned by whoever serves the statistics. Refreshing
//! swaps in a new immutable snapshot; readers holding an older [`Arc`]
//! keep a consistent view.

use std::path::Path;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;
use tracing::warn;
use walkdir::WalkDir;

use crate::DisplayValue;
use crate::InspectError;
use crate::Result;
use crate::signature::Category;
use crate::signature::sniff_path;

/// File count and size of one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    /// Number of files.
    pub count: i64,
    /// Combined size in bytes.
    pub bytes: u64,
}

impl CategoryTotals {
    fn add(&mut self, bytes: u64) {
        self.count += 1;
        self.bytes = self.bytes.saturating_add(bytes);
    }
}

/// Totals for every category at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Raster images.
    pub image: CategoryTotals,
    /// Text files.
    pub text: CategoryTotals,
    /// Programs.
    pub program: CategoryTotals,
    /// Archives.
    pub archive: CategoryTotals,
    /// Everything else.
    pub other: CategoryTotals,
    /// When the totals were computed; `None` before the first refresh.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl CategoryStats {
    /// Totals of one category.
    #[must_use]
    pub const fn get(&self, category: Category) -> CategoryTotals {
        match category {
            Category::Image => self.image,
            Category::Text => self.text,
            Category::Program => self.program,
            Category::Archive => self.archive,
            Category::Other => self.other,
        }
    }

    const fn get_mut(&mut self, category: Category) -> &mut CategoryTotals {
        match category {
            Category::Image => &mut self.image,
            Category::Text => &mut self.text,
            Category::Program => &mut self.program,
            Category::Archive => &mut self.archive,
            Category::Other => &mut self.other,
        }
    }

    /// All files counted.
    #[must_use]
    pub fn total(&self) -> CategoryTotals {
        [self.image, self.text, self.program, self.archive, self.other]
            .into_iter()
            .fold(CategoryTotals::default(), |acc, t| CategoryTotals {
                count: acc.count + t.count,
                bytes: acc.bytes.saturating_add(t.bytes),
            })
    }

    /// One display row per category: name, file count and size.
    #[must_use]
    pub fn rows(&self) -> Vec<(Category, DisplayValue, DisplayValue)> {
        [
            Category::Image,
            Category::Text,
            Category::Program,
            Category::Archive,
            Category::Other,
        ]
        .into_iter()
        .map(|category| {
            let totals = self.get(category);
            (category, DisplayValue::Count(totals.count), DisplayValue::Bytes(totals.bytes))
        })
        .collect()
    }
}

/// Holds the latest [`CategoryStats`] for a download directory.
#[derive(Debug, Default)]
pub struct StatsCache {
    current: RwLock<Arc<CategoryStats>>,
}

impl StatsCache {
    /// An empty cache; [`StatsCache::snapshot`] returns zero totals until
    /// the first refresh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest totals.
    #[must_use]
    pub fn snapshot(&self) -> Arc<CategoryStats> {
        Arc::clone(&*self.current.read())
    }

    /// Recounts the files directly inside `dir` and publishes the result.
    ///
    /// Files that cannot be read are left out.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::Walk`] when `dir` cannot be read. The
    /// previous snapshot stays in place.
    pub fn refresh(&self, dir: &Path) -> Result<Arc<CategoryStats>> {
        let mut stats = CategoryStats::default();

        for item in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let item = match item {
                Ok(item) => item,
                Err(err) if err.depth() == 0 => {
                    return Err(InspectError::Walk {
                        path: dir.to_path_buf(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !item.file_type().is_file() {
                continue;
            }
            let counted = item
                .metadata()
                .map_err(std::io::Error::from)
                .and_then(|meta| Ok((meta.len(), sniff_path(item.path())?)));
            match counted {
                Ok((size, signature)) => stats.get_mut(signature.category()).add(size),
                Err(err) => warn!(path = %item.path().display(), error = %err, "not counted"),
            }
        }

        stats.refreshed_at = Some(Utc::now());
        let stats = Arc::new(stats);
        *self.current.write() = Arc::clone(&stats);
        debug!(dir = %dir.display(), files = stats.total().count, "refreshed category statistics");
        Ok(stats)
    }
}
