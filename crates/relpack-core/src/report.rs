//! Packaging run reporting and progress callbacks.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of a completed packaging run.
///
/// # Examples
///
/// ```
/// use relpack_core::PackReport;
///
/// let mut report = PackReport::default();
/// report.bytes_written = 1000;
/// report.bytes_compressed = 250;
/// assert_eq!(report.compression_ratio(), 4.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Absolute path of the written archive.
    pub output_path: PathBuf,

    /// Number of validated whitelist entries.
    pub entries: usize,

    /// Number of files copied into the staging tree.
    pub files_staged: usize,

    /// Number of files written to the archive.
    pub files_archived: usize,

    /// Total uncompressed bytes written to the archive.
    pub bytes_written: u64,

    /// Size of the finished archive on disk.
    pub bytes_compressed: u64,

    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl PackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns uncompressed / compressed size, or 0.0 if either is zero.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_written == 0 {
            return 0.0;
        }
        self.bytes_written as f64 / self.bytes_compressed as f64
    }
}

/// Callback trait for progress reporting while archiving.
///
/// # Examples
///
/// ```
/// use relpack_core::ProgressCallback;
/// use std::path::Path;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called when starting to process an entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Archive path of the entry
    /// * `total` - Total number of entries
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called for each chunk of file data written to the archive.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been completely written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once the archive is finished.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_report() {
        let report = PackReport::new();
        assert_eq!(report.files_archived, 0);
        assert_eq!(report.files_staged, 0);
        assert_eq!(report.bytes_written, 0);
        assert_eq!(report.output_path, PathBuf::new());
    }

    #[test]
    fn test_compression_ratio_edge_cases() {
        let mut report = PackReport::new();
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.bytes_written = 1000;
        assert!(report.compression_ratio().abs() < f64::EPSILON);

        report.bytes_compressed = 1000;
        assert!((report.compression_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
