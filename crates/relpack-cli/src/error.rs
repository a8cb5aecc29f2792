//! Error conversion utilities for CLI.
//!
//! Converts relpack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance, and maps them to
//! process exit codes.

use anyhow::Error;
use relpack_core::PackError;

/// Exit code for a missing or empty whitelist.
pub const EXIT_CONFIG: u8 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Converts `PackError` to an anyhow error whose message carries a hint.
///
/// The `PackError` stays in the chain so `exit_code` can recover it.
pub fn convert_pack_error(err: PackError) -> Error {
    let message = match &err {
        PackError::WhitelistNotFound { path } => format!(
            "whitelist file not found: {}\n\
             HINT: Pass --whitelist <PATH> or create release-whitelist.txt in the repository root.",
            path.display()
        ),
        PackError::EmptyWhitelist { path } => format!(
            "whitelist is empty: {}\n\
             HINT: List at least one repository-relative path; blank lines and # comments are ignored.",
            path.display()
        ),
        PackError::AbsolutePath { .. } | PackError::PathTraversal { .. } => format!(
            "{err}\n\
             HINT: Whitelist entries must be relative to the repository root and must not contain '..'."
        ),
        PackError::PathEscapesRoot { .. } => format!(
            "{err}\n\
             HINT: A symlink on this path points outside the repository."
        ),
        PackError::SourceNotFound { .. } => format!(
            "{err}\n\
             HINT: Check the spelling or remove the entry from the whitelist."
        ),
        PackError::UnsupportedSource { .. } => format!(
            "{err}\n\
             HINT: Sockets, FIFOs and device files cannot be packaged; remove the entry from the whitelist."
        ),
        PackError::UnsafeStageDir { .. } => format!(
            "{err}\n\
             HINT: --stage-dir is deleted on every run; pick a dedicated folder such as dist/.stage."
        ),
        PackError::InvalidRootName { .. } => format!(
            "{err}\n\
             HINT: --root-name must be a single folder name without separators."
        ),
        _ => format!("failed to build release archive: {err}"),
    };

    Error::new(err).context(message)
}

/// Returns the process exit code for an error produced by the CLI.
pub fn exit_code(err: &Error) -> u8 {
    match err.downcast_ref::<PackError>() {
        Some(PackError::WhitelistNotFound { .. } | PackError::EmptyWhitelist { .. }) => {
            EXIT_CONFIG
        }
        _ => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_convert_whitelist_not_found() {
        let err = PackError::WhitelistNotFound {
            path: PathBuf::from("/repo/release-whitelist.txt"),
        };
        let converted = convert_pack_error(err);
        let msg = converted.to_string();
        assert!(msg.contains("whitelist file not found"));
        assert!(msg.contains("release-whitelist.txt"));
        assert!(msg.contains("HINT"));
        assert_eq!(exit_code(&converted), EXIT_CONFIG);
    }

    #[test]
    fn test_convert_empty_whitelist() {
        let err = PackError::EmptyWhitelist {
            path: PathBuf::from("list.txt"),
        };
        let converted = convert_pack_error(err);
        assert!(converted.to_string().contains("whitelist is empty"));
        assert_eq!(exit_code(&converted), EXIT_CONFIG);
    }

    #[test]
    fn test_convert_traversal() {
        let err = PackError::PathTraversal {
            path: "../secret".into(),
            line: 3,
        };
        let converted = convert_pack_error(err);
        let msg = converted.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("../secret"));
        assert_eq!(exit_code(&converted), EXIT_FAILURE);
    }

    #[test]
    fn test_convert_unsafe_stage_dir() {
        let err = PackError::UnsafeStageDir {
            path: PathBuf::from("."),
            reason: "it must be a relative path below the repository root".into(),
        };
        let converted = convert_pack_error(err);
        let msg = converted.to_string();
        assert!(msg.contains("refusing to use staging directory ."));
        assert!(msg.contains("HINT: --stage-dir is deleted on every run"));
        assert_eq!(exit_code(&converted), EXIT_FAILURE);
    }

    #[test]
    fn test_convert_io_error() {
        let err = PackError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let converted = convert_pack_error(err);
        assert!(converted.to_string().contains("failed to build release archive"));
        assert!(converted.to_string().contains("denied"));
        assert_eq!(exit_code(&converted), EXIT_FAILURE);
    }

    #[test]
    fn test_unrelated_error_exit_code() {
        let err = anyhow::anyhow!("failed to get current directory");
        assert_eq!(exit_code(&err), EXIT_FAILURE);
    }
}
