//! Error types for release packaging operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur while loading a whitelist, staging, or archiving.
#[derive(Error, Debug)]
pub enum PackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The whitelist file does not exist.
    #[error("whitelist file not found: {path}")]
    WhitelistNotFound {
        /// Resolved path of the missing whitelist.
        path: PathBuf,
    },

    /// The whitelist contains no usable entries after filtering.
    #[error("whitelist is empty: {path}")]
    EmptyWhitelist {
        /// Resolved path of the whitelist.
        path: PathBuf,
    },

    /// A whitelist entry normalized to an empty path.
    #[error("empty path in whitelist (line {line})")]
    EmptyPath {
        /// 1-based line number in the whitelist.
        line: usize,
    },

    /// A whitelist entry is an absolute path.
    #[error("absolute path is not allowed in whitelist (line {line}): {path}")]
    AbsolutePath {
        /// The offending entry.
        path: String,
        /// 1-based line number in the whitelist.
        line: usize,
    },

    /// A whitelist entry contains a `..` segment.
    #[error("path traversal is not allowed in whitelist (line {line}): {path}")]
    PathTraversal {
        /// The offending entry.
        path: String,
        /// 1-based line number in the whitelist.
        line: usize,
    },

    /// A whitelist entry resolves outside the repository root.
    #[error("whitelist path escapes repository root: {path}")]
    PathEscapesRoot {
        /// The offending entry.
        path: String,
    },

    /// A whitelisted source does not exist on disk.
    #[error("whitelist item not found: {path}")]
    SourceNotFound {
        /// The offending entry.
        path: String,
    },

    /// Root folder name is not a single normal path component.
    #[error("invalid root folder name: {name:?}")]
    InvalidRootName {
        /// The rejected name.
        name: String,
    },

    /// Compression level outside 1-9.
    #[error("invalid compression level {level}, must be 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// A whitelisted source is neither a regular file nor a directory.
    #[error("whitelist item is not a regular file or directory: {path}")]
    UnsupportedSource {
        /// The offending entry.
        path: String,
    },

    /// The staging base would remove the repository, the whitelist, or a
    /// whitelisted source when it is wiped.
    #[error("refusing to use staging directory {path}: {reason}")]
    UnsafeStageDir {
        /// The configured staging directory.
        path: PathBuf,
        /// Why the directory was rejected.
        reason: String,
    },

    /// Directory traversal failed while copying or archiving.
    #[error("failed to walk {path}: {reason}")]
    Walk {
        /// Directory being walked.
        path: PathBuf,
        /// Underlying walker error.
        reason: String,
    },

    /// The zip writer rejected an operation.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

impl PackError {
    /// Returns `true` for problems with the run's inputs rather than its
    /// contents: a missing or empty whitelist, a bad root name, level or
    /// staging directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use relpack_core::PackError;
    /// use std::path::PathBuf;
    ///
    /// let err = PackError::EmptyWhitelist {
    ///     path: PathBuf::from("release-whitelist.txt"),
    /// };
    /// assert!(err.is_configuration_error());
    ///
    /// let err = PackError::SourceNotFound {
    ///     path: "src/app.py".into(),
    /// };
    /// assert!(!err.is_configuration_error());
    /// ```
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::WhitelistNotFound { .. }
                | Self::EmptyWhitelist { .. }
                | Self::InvalidRootName { .. }
                | Self::InvalidCompressionLevel { .. }
                | Self::UnsafeStageDir { .. }
        )
    }

    /// Returns `true` if a whitelist entry was rejected as unsafe.
    ///
    /// # Examples
    ///
    /// ```
    /// use relpack_core::PackError;
    ///
    /// let err = PackError::PathTraversal {
    ///     path: "../secrets".into(),
    ///     line: 3,
    /// };
    /// assert!(err.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyPath { .. }
                | Self::AbsolutePath { .. }
                | Self::PathTraversal { .. }
                | Self::PathEscapesRoot { .. }
        )
    }

    /// Returns the whitelist line number the error refers to, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::EmptyPath { line }
            | Self::AbsolutePath { line, .. }
            | Self::PathTraversal { line, .. } => Some(*line),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PackError::PathTraversal {
            path: "../etc/passwd".into(),
            line: 4,
        };
        let display = err.to_string();
        assert!(display.contains("path traversal"));
        assert!(display.contains("../etc/passwd"));
        assert!(display.contains("line 4"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PackError = io_err.into();
        assert!(matches!(err, PackError::Io(_)));
        assert!(!err.is_configuration_error());
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_configuration_errors() {
        let err = PackError::WhitelistNotFound {
            path: PathBuf::from("missing.txt"),
        };
        assert!(err.is_configuration_error());
        assert!(err.to_string().contains("missing.txt"));

        let err = PackError::InvalidCompressionLevel { level: 0 };
        assert!(err.is_configuration_error());
        assert!(!err.is_validation_error());
    }

    #[test]
    fn test_validation_errors() {
        let err = PackError::AbsolutePath {
            path: "/etc".into(),
            line: 1,
        };
        assert!(err.is_validation_error());
        assert_eq!(err.line(), Some(1));

        let err = PackError::PathEscapesRoot {
            path: "link".into(),
        };
        assert!(err.is_validation_error());
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_source_not_found_is_neither() {
        let err = PackError::SourceNotFound {
            path: "assets".into(),
        };
        assert!(!err.is_configuration_error());
        assert!(!err.is_validation_error());
        assert_eq!(err.to_string(), "whitelist item not found: assets");
    }

    #[test]
    fn test_unsafe_stage_dir_is_configuration_error() {
        let err = PackError::UnsafeStageDir {
            path: PathBuf::from("src"),
            reason: "it contains whitelisted source src/app.py".into(),
        };
        assert!(err.is_configuration_error());
        assert!(!err.is_validation_error());
        assert!(err.to_string().contains("refusing to use staging directory src"));
    }

    #[test]
    fn test_unsupported_source_display() {
        let err = PackError::UnsupportedSource {
            path: "pipe".into(),
        };
        assert!(!err.is_configuration_error());
        assert_eq!(
            err.to_string(),
            "whitelist item is not a regular file or directory: pipe"
        );
    }
}
