//! Extraction quota tracking.

use crate::ArchiveLimits;
use crate::InspectError;
use crate::Result;
use crate::error::QuotaResource;

/// Tracks resource usage while an archive is unpacked.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    files_extracted: usize,
    bytes_written: u64,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one member of `size` bytes before it is written.
    ///
    /// # Errors
    ///
    /// Returns [`InspectError::QuotaExceeded`] when any limit is crossed.
    pub fn record_file(&mut self, size: u64, limits: &ArchiveLimits) -> Result<()> {
        if size > limits.max_file_size {
            return Err(InspectError::QuotaExceeded {
                resource: QuotaResource::FileSize {
                    size,
                    max: limits.max_file_size,
                },
            });
        }

        self.files_extracted += 1;
        if self.files_extracted > limits.max_file_count {
            return Err(InspectError::QuotaExceeded {
                resource: QuotaResource::FileCount {
                    current: self.files_extracted,
                    max: limits.max_file_count,
                },
            });
        }

        self.bytes_written =
            self.bytes_written
                .checked_add(size)
                .ok_or(InspectError::QuotaExceeded {
                    resource: QuotaResource::IntegerOverflow,
                })?;
        if self.bytes_written > limits.max_total_size {
            return Err(InspectError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: self.bytes_written,
                    max: limits.max_total_size,
                },
            });
        }

        Ok(())
    }

    /// Returns the number of files recorded.
    #[must_use]
    pub const fn files_extracted(&self) -> usize {
        self.files_extracted
    }

    /// Returns the total bytes recorded.
    #[must_use]
    pub const fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_file() {
        let mut tracker = QuotaTracker::new();
        assert!(tracker.record_file(1000, &ArchiveLimits::default()).is_ok());
        assert_eq!(tracker.files_extracted(), 1);
        assert_eq!(tracker.bytes_written(), 1000);
    }

    #[test]
    fn test_exceed_file_count() {
        let mut tracker = QuotaTracker::new();
        let limits = ArchiveLimits {
            max_file_count: 2,
            ..Default::default()
        };

        assert!(tracker.record_file(100, &limits).is_ok());
        assert!(tracker.record_file(100, &limits).is_ok());
        let result = tracker.record_file(100, &limits);
        assert!(matches!(
            result,
            Err(InspectError::QuotaExceeded {
                resource: QuotaResource::FileCount { current: 3, max: 2 }
            })
        ));
    }

    #[test]
    fn test_exceed_total_size() {
        let mut tracker = QuotaTracker::new();
        let limits = ArchiveLimits {
            max_total_size: 1000,
            ..Default::default()
        };

        assert!(tracker.record_file(600, &limits).is_ok());
        let result = tracker.record_file(500, &limits);
        assert!(matches!(
            result,
            Err(InspectError::QuotaExceeded {
                resource: QuotaResource::TotalSize { .. }
            })
        ));
    }

    #[test]
    fn test_exceed_file_size() {
        let mut tracker = QuotaTracker::new();
        let limits = ArchiveLimits {
            max_file_size: 1000,
            ..Default::default()
        };

        let result = tracker.record_file(2000, &limits);
        assert!(matches!(
            result,
            Err(InspectError::QuotaExceeded {
                resource: QuotaResource::FileSize { size: 2000, max: 1000 }
            })
        ));
        assert_eq!(tracker.files_extracted(), 0);
    }
}
