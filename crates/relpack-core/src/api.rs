//! High-level public API for packaging a release.

use crate::NoopProgress;
use crate::PackConfig;
use crate::PackReport;
use crate::ProgressCallback;
use crate::Result;
use crate::archive::write_archive;
use crate::staging::StagingTree;
use crate::whitelist::Whitelist;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

/// Builds a release archive as described by `config`.
///
/// Steps, in order: validate the configuration, load and validate the
/// whitelist, rebuild the staging tree, write the archive. The whitelist is
/// fully validated, and checked against the staging directory, before the
/// staging tree is touched.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid, or the staging directory would remove
///   the whitelist or a whitelisted source
/// - The whitelist is missing, empty, or contains an unsafe entry
/// - A whitelisted path is missing or escapes the repository root
/// - I/O fails while staging or archiving
///
/// # Examples
///
/// ```no_run
/// use relpack_core::PackConfig;
/// use relpack_core::package_release;
///
/// let config = PackConfig::new(".")
///     .with_root_name("demo")
///     .with_output("dist/demo.zip");
/// let report = package_release(&config)?;
/// println!("zip built: {} (files: {})", report.output_path.display(), report.files_archived);
/// # Ok::<(), relpack_core::PackError>(())
/// ```
pub fn package_release(config: &PackConfig) -> Result<PackReport> {
    package_release_with_progress(config, &mut NoopProgress)
}

/// Builds a release archive, reporting archive progress to `progress`.
///
/// # Errors
///
/// Same as [`package_release`].
pub fn package_release_with_progress(
    config: &PackConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<PackReport> {
    let start = Instant::now();
    config.validate()?;

    let whitelist = Whitelist::load(&config.whitelist_path())?;
    config.check_stage_dir(whitelist.entries())?;

    let tree = StagingTree::prepare(&config.staging_base(), &config.root_name)?;
    let files_staged = tree.stage_all(&config.repo_root, whitelist.entries())?;

    let output_path = absolute(config.output_path());
    let archive = write_archive(tree.root(), &output_path, config.compression_level, progress)?;
    let output_path = fs::canonicalize(&output_path)?;

    Ok(PackReport {
        output_path,
        entries: whitelist.len(),
        files_staged,
        files_archived: archive.files_written,
        bytes_written: archive.bytes_written,
        bytes_compressed: archive.archive_size,
        duration: start.elapsed(),
    })
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::PackError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_package_release_end_to_end() {
        let repo = TempDir::new().unwrap();
        fs::create_dir_all(repo.path().join("src")).unwrap();
        fs::write(repo.path().join("src/app.py"), "print('hi')").unwrap();
        fs::write(repo.path().join("release-whitelist.txt"), "src/app.py\n").unwrap();

        let config = PackConfig::new(repo.path()).with_root_name("demo");
        let report = package_release(&config).unwrap();

        assert_eq!(report.entries, 1);
        assert_eq!(report.files_staged, 1);
        assert_eq!(report.files_archived, 1);
        assert!(report.output_path.is_absolute());
        assert!(report.output_path.ends_with("dist/release.zip"));
        assert!(report.bytes_compressed > 0);
    }

    #[test]
    fn test_invalid_whitelist_keeps_previous_staging() {
        let repo = TempDir::new().unwrap();
        let stale = repo.path().join("dist/.stage/release/old.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        fs::write(repo.path().join("release-whitelist.txt"), "../outside\n").unwrap();

        let err = package_release(&PackConfig::new(repo.path())).unwrap_err();

        assert!(matches!(err, PackError::PathTraversal { line: 1, .. }));
        assert!(stale.exists());
        assert!(!repo.path().join("dist/release.zip").exists());
    }

    #[test]
    fn test_stage_dir_over_sources_deletes_nothing() {
        let repo = TempDir::new().unwrap();
        fs::create_dir_all(repo.path().join("src")).unwrap();
        fs::write(repo.path().join("src/app.py"), "app").unwrap();
        fs::write(repo.path().join("src/lib.py"), "lib").unwrap();
        fs::write(repo.path().join("release-whitelist.txt"), "src/app.py\n").unwrap();

        for stage_dir in [".", "", "src", ".."] {
            let config = PackConfig::new(repo.path()).with_stage_dir(stage_dir);
            let err = package_release(&config).unwrap_err();

            assert!(
                matches!(err, PackError::UnsafeStageDir { .. }),
                "{stage_dir:?} gave {err:?}"
            );
            assert!(repo.path().join("src/app.py").is_file());
            assert!(repo.path().join("src/lib.py").is_file());
            assert!(repo.path().join("release-whitelist.txt").is_file());
        }
    }

    #[test]
    fn test_output_path_is_resolved() {
        let parent = TempDir::new().unwrap();
        let repo = parent.path().join("repo");
        fs::create_dir_all(repo.join("src")).unwrap();
        fs::write(repo.join("src/app.py"), "app").unwrap();
        fs::write(repo.join("release-whitelist.txt"), "src/app.py\n").unwrap();

        let config = PackConfig::new(&repo).with_output("../out/x.zip");
        let report = package_release(&config).unwrap();

        let expected = fs::canonicalize(parent.path()).unwrap().join("out/x.zip");
        assert_eq!(report.output_path, expected);
        assert!(report.output_path.is_file());
    }

    #[test]
    fn test_invalid_root_name_fails_first() {
        let repo = TempDir::new().unwrap();
        let config = PackConfig::new(repo.path()).with_root_name("../x");

        let err = package_release(&config).unwrap_err();
        assert!(matches!(err, PackError::InvalidRootName { .. }));
    }
}
