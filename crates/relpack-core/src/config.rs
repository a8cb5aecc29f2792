//! Configuration for a packaging run.

use crate::PackError;
use crate::Result;
use crate::whitelist::WhitelistEntry;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Default whitelist location, relative to the repository root.
pub const DEFAULT_WHITELIST: &str = "release-whitelist.txt";

/// Default archive location, relative to the repository root.
pub const DEFAULT_OUTPUT: &str = "dist/release.zip";

/// Default top-level folder name inside the archive.
pub const DEFAULT_ROOT_NAME: &str = "release";

/// Default staging base, relative to the repository root.
pub const DEFAULT_STAGE_DIR: &str = "dist/.stage";

/// Configuration for a packaging run.
///
/// Relative paths are resolved against `repo_root`.
///
/// # Examples
///
/// ```
/// use relpack_core::PackConfig;
///
/// let config = PackConfig::new("/work/repo")
///     .with_output("dist/demo.zip")
///     .with_root_name("demo")
///     .with_compression_level(9);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.staging_root(), std::path::Path::new("/work/repo/dist/.stage/demo"));
/// ```
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Repository root all whitelist entries are relative to.
    ///
    /// Default: `.`.
    pub repo_root: PathBuf,

    /// Whitelist file.
    ///
    /// Default: `release-whitelist.txt`.
    pub whitelist: PathBuf,

    /// Output archive path.
    ///
    /// Default: `dist/release.zip`.
    pub output: PathBuf,

    /// Top-level folder name inside the archive.
    ///
    /// Must be a single normal path component. Default: `release`.
    pub root_name: String,

    /// Staging base directory. Removed and recreated on every run.
    ///
    /// Must be a relative path of normal components below `repo_root` that
    /// holds neither the whitelist nor a whitelisted source.
    /// Default: `dist/.stage`.
    pub stage_dir: PathBuf,

    /// Deflate level (1-9).
    ///
    /// Default: `6`.
    pub compression_level: u8,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            repo_root: PathBuf::from("."),
            whitelist: PathBuf::from(DEFAULT_WHITELIST),
            output: PathBuf::from(DEFAULT_OUTPUT),
            root_name: DEFAULT_ROOT_NAME.to_string(),
            stage_dir: PathBuf::from(DEFAULT_STAGE_DIR),
            compression_level: 6,
        }
    }
}

impl PackConfig {
    /// Creates a configuration with defaults rooted at `repo_root`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(repo_root: P) -> Self {
        Self {
            repo_root: repo_root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Sets the whitelist path.
    #[must_use]
    pub fn with_whitelist<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.whitelist = path.as_ref().to_path_buf();
        self
    }

    /// Sets the output archive path.
    #[must_use]
    pub fn with_output<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }

    /// Sets the archive root folder name.
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    /// Sets the staging base directory.
    #[must_use]
    pub fn with_stage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.stage_dir = path.as_ref().to_path_buf();
        self
    }

    /// Sets the compression level.
    ///
    /// # Panics
    ///
    /// Panics if the level is not in the range 1-9.
    /// Use `validate()` for non-panicking validation.
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        assert!((1..=9).contains(&level), "compression level must be 1-9");
        self.compression_level = level;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// - `PackError::InvalidRootName` unless the root name is exactly one
    ///   normal path component
    /// - `PackError::InvalidCompressionLevel` if the level is outside 1-9
    /// - `PackError::UnsafeStageDir` if the staging directory is empty, not
    ///   strictly below the repository root, or contains the whitelist
    pub fn validate(&self) -> Result<()> {
        if !is_single_component(&self.root_name) {
            return Err(PackError::InvalidRootName {
                name: self.root_name.clone(),
            });
        }

        if !(1..=9).contains(&self.compression_level) {
            return Err(PackError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }

        if self.stage_dir.as_os_str().is_empty() {
            return Err(self.unsafe_stage_dir("it is empty".to_string()));
        }

        if !self
            .stage_dir
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(self.unsafe_stage_dir(
                "it must be a relative path below the repository root without '.' or '..' segments"
                    .to_string(),
            ));
        }

        if absolute(&self.whitelist_path()).starts_with(absolute(&self.staging_base())) {
            return Err(self.unsafe_stage_dir(format!(
                "it contains the whitelist {}",
                self.whitelist.display()
            )));
        }

        Ok(())
    }

    /// Checks that wiping the staging directory cannot remove any of
    /// `entries`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::UnsafeStageDir` if an entry is the staging
    /// directory or lies inside it.
    pub fn check_stage_dir(&self, entries: &[WhitelistEntry]) -> Result<()> {
        match entries
            .iter()
            .find(|entry| Path::new(entry.as_str()).starts_with(&self.stage_dir))
        {
            Some(entry) => Err(self.unsafe_stage_dir(format!(
                "it contains whitelisted source {entry} (line {})",
                entry.line()
            ))),
            None => Ok(()),
        }
    }

    fn unsafe_stage_dir(&self, reason: String) -> PackError {
        PackError::UnsafeStageDir {
            path: self.stage_dir.clone(),
            reason,
        }
    }

    /// Resolved whitelist path.
    #[must_use]
    pub fn whitelist_path(&self) -> PathBuf {
        self.repo_root.join(&self.whitelist)
    }

    /// Resolved output archive path.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.repo_root.join(&self.output)
    }

    /// Resolved staging base directory.
    #[must_use]
    pub fn staging_base(&self) -> PathBuf {
        self.repo_root.join(&self.stage_dir)
    }

    /// Resolved staging root (`<staging base>/<root name>`).
    #[must_use]
    pub fn staging_root(&self) -> PathBuf {
        self.staging_base().join(&self.root_name)
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn is_single_component(name: &str) -> bool {
    if name.is_empty() || name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
