//! Staging tree construction.
//!
//! The staging tree is an on-disk copy of every whitelisted item, laid out
//! under `<staging base>/<root name>`. It is wiped and rebuilt on every run
//! and left in place afterwards.

use crate::PackError;
use crate::Result;
use crate::whitelist::WhitelistEntry;
use std::fs;
use std::fs::File;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A freshly prepared staging directory.
#[derive(Debug, Clone)]
pub struct StagingTree {
    base: PathBuf,
    root: PathBuf,
}

impl StagingTree {
    /// Removes `base` if it exists, then creates `base/root_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the old tree cannot be removed or the new one
    /// cannot be created.
    pub fn prepare(base: &Path, root_name: &str) -> Result<Self> {
        match fs::symlink_metadata(base) {
            Ok(meta) if meta.is_dir() => {
                log::debug!("removing previous staging tree {}", base.display());
                fs::remove_dir_all(base)?;
            }
            Ok(_) => fs::remove_file(base)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(PackError::Io(e)),
        }

        let root = base.join(root_name);
        fs::create_dir_all(&root)?;

        // Canonical form so the copy walk can recognise the tree it is
        // writing into.
        let base = fs::canonicalize(base)?;
        let root = base.join(root_name);

        log::info!("prepared staging tree {}", root.display());
        Ok(Self { base, root })
    }

    /// Staging base directory (parent of the root folder).
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Staging root folder (`<base>/<root name>`).
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copies every entry into the tree, in order.
    ///
    /// Returns the total number of files copied.
    ///
    /// # Errors
    ///
    /// Stops at the first entry that escapes the repository, is missing, or
    /// fails to copy.
    pub fn stage_all(&self, repo_root: &Path, entries: &[WhitelistEntry]) -> Result<usize> {
        let repo_root = fs::canonicalize(repo_root)?;
        let mut files = 0;
        for entry in entries {
            files += self.stage_resolved_root(&repo_root, entry)?;
        }
        Ok(files)
    }

    /// Copies one whitelisted file or directory tree into the staging root.
    ///
    /// Directories merge into whatever earlier entries already created.
    ///
    /// # Errors
    ///
    /// - `PackError::PathEscapesRoot` if the source resolves outside
    ///   `repo_root`
    /// - `PackError::SourceNotFound` if the source does not exist
    /// - `PackError::UnsupportedSource` if the source is neither a regular
    ///   file nor a directory
    /// - `PackError::Io` or `PackError::Walk` if copying fails
    pub fn stage(&self, repo_root: &Path, entry: &WhitelistEntry) -> Result<usize> {
        let repo_root = fs::canonicalize(repo_root)?;
        self.stage_resolved_root(&repo_root, entry)
    }

    fn stage_resolved_root(&self, repo_root: &Path, entry: &WhitelistEntry) -> Result<usize> {
        let src = resolve_source(repo_root, entry)?;
        let dest = entry.join_to(&self.root);

        let file_type = fs::metadata(&src)?.file_type();
        let files = if file_type.is_dir() {
            self.copy_tree(&src, &dest)?
        } else if file_type.is_file() {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            copy_file(&src, &dest)?;
            1
        } else {
            return Err(PackError::UnsupportedSource {
                path: entry.as_str().to_string(),
            });
        };

        log::debug!("staged {entry} ({files} files)");
        Ok(files)
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> Result<usize> {
        let mut files = 0;
        fs::create_dir_all(dest)?;

        let walker = WalkDir::new(src)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            // Whitelisting a parent of the staging base must not copy the
            // tree into itself.
            .filter_entry(|e| !e.path().starts_with(&self.base));

        for entry in walker {
            let entry = entry.map_err(|e| PackError::Walk {
                path: src.to_path_buf(),
                reason: e.to_string(),
            })?;

            let rel = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| io::Error::other(e.to_string()))?;
            let target = dest.join(rel);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir_all(&target)?;
            } else if file_type.is_file() {
                copy_file(entry.path(), &target)?;
                files += 1;
            } else {
                log::warn!("skipping special file {}", entry.path().display());
            }
        }

        Ok(files)
    }
}

/// Resolves a whitelist entry against a canonical repository root.
///
/// # Errors
///
/// - `PackError::SourceNotFound` if nothing exists at the resolved path
/// - `PackError::PathEscapesRoot` if symlinks lead outside `repo_root`
pub fn resolve_source(repo_root: &Path, entry: &WhitelistEntry) -> Result<PathBuf> {
    let candidate = entry.join_to(repo_root);
    let resolved = match fs::canonicalize(&candidate) {
        Ok(path) => path,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PackError::SourceNotFound {
                path: entry.as_str().to_string(),
            });
        }
        Err(e) => return Err(PackError::Io(e)),
    };

    if !resolved.starts_with(repo_root) {
        return Err(PackError::PathEscapesRoot {
            path: entry.as_str().to_string(),
        });
    }

    Ok(resolved)
}

/// Copies file contents, then carries over modification time and
/// permissions.
fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
    let mut reader = File::open(src)?;
    let metadata = reader.metadata()?;

    let mut writer = File::create(dest)?;
    let bytes = io::copy(&mut reader, &mut writer)?;
    if let Ok(modified) = metadata.modified() {
        writer.set_modified(modified)?;
    }
    drop(writer);

    fs::set_permissions(dest, metadata.permissions())?;
    Ok(bytes)
}
