//! Whitelist loading and entry validation.
//!
//! A whitelist is a UTF-8 text file with one repository-relative path per
//! line. Blank lines and lines starting with `#` are ignored, and both `/` and
//! `\` separators are accepted.

use crate::PackError;
use crate::Result;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

/// A validated, normalized, repository-relative whitelist path.
///
/// Always non-empty, relative, `/`-separated and free of `..` segments.
///
/// # Examples
///
/// ```
/// use relpack_core::WhitelistEntry;
///
/// let entry = WhitelistEntry::new("src/app.py", 1)?;
/// assert_eq!(entry.as_str(), "src/app.py");
///
/// assert!(WhitelistEntry::new("../secrets", 2).is_err());
/// assert!(WhitelistEntry::new("/etc/passwd", 3).is_err());
/// # Ok::<(), relpack_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhitelistEntry {
    path: String,
    line: usize,
}

impl WhitelistEntry {
    /// Validates an already-normalized relative path.
    ///
    /// # Errors
    ///
    /// - `PackError::EmptyPath` if `rel` is empty
    /// - `PackError::AbsolutePath` if `rel` is absolute
    /// - `PackError::PathTraversal` if any segment is `..`
    pub fn new(rel: impl Into<String>, line: usize) -> Result<Self> {
        let path = rel.into();

        if path.is_empty() {
            return Err(PackError::EmptyPath { line });
        }

        // `\` has already been rewritten, so a leading `/` covers rooted
        // Windows paths too.
        if path.starts_with('/') || Path::new(&path).is_absolute() {
            return Err(PackError::AbsolutePath { path, line });
        }

        if path
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "."))
            .any(|segment| segment == "..")
        {
            return Err(PackError::PathTraversal { path, line });
        }

        Ok(Self { path, line })
    }

    /// Returns the normalized path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Returns the 1-based whitelist line this entry came from.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.line
    }

    /// Resolves the entry against `base`.
    #[must_use]
    pub fn join_to(&self, base: &Path) -> PathBuf {
        self.path
            .split('/')
            .filter(|segment| !matches!(*segment, "" | "."))
            .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
    }
}

impl fmt::Display for WhitelistEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl AsRef<str> for WhitelistEntry {
    fn as_ref(&self) -> &str {
        &self.path
    }
}

/// Normalizes one raw whitelist line.
///
/// Returns `None` for blank lines, comments, and entries that reduce to `.`.
///
/// # Examples
///
/// ```
/// use relpack_core::whitelist::normalize_line;
///
/// assert_eq!(normalize_line("  ./src\\app.py  "), Some("src/app.py".to_string()));
/// assert_eq!(normalize_line("././assets/"), Some("assets/".to_string()));
/// assert_eq!(normalize_line("# comment"), None);
/// assert_eq!(normalize_line("   "), None);
/// assert_eq!(normalize_line("./."), None);
/// ```
#[must_use]
pub fn normalize_line(line: &str) -> Option<String> {
    let raw = line.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return None;
    }

    let normalized = raw.replace('\\', "/");
    let mut rest = normalized.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }

    if rest.is_empty() || rest == "." {
        return None;
    }

    Some(rest.to_string())
}

/// Parses whitelist text into validated entries, in order.
///
/// Touches no files. Stops at the first invalid line.
///
/// # Errors
///
/// Returns the validation error of the first offending line.
///
/// # Examples
///
/// ```
/// use relpack_core::whitelist::parse_whitelist;
///
/// let entries = parse_whitelist("# release\nsrc/app.py\n\nassets/\n")?;
/// let paths: Vec<_> = entries.iter().map(|e| e.as_str()).collect();
/// assert_eq!(paths, ["src/app.py", "assets/"]);
/// # Ok::<(), relpack_core::PackError>(())
/// ```
pub fn parse_whitelist(text: &str) -> Result<Vec<WhitelistEntry>> {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| normalize_line(line).map(|rel| (idx + 1, rel)))
        .map(|(line, rel)| WhitelistEntry::new(rel, line))
        .collect()
}

/// The validated contents of a whitelist file.
#[derive(Debug, Clone)]
pub struct Whitelist {
    source: PathBuf,
    entries: Vec<WhitelistEntry>,
}

impl Whitelist {
    /// Reads and validates the whitelist at `path`.
    ///
    /// # Errors
    ///
    /// - `PackError::WhitelistNotFound` if the file does not exist
    /// - `PackError::EmptyWhitelist` if no line survives filtering
    /// - a validation error for the first bad entry
    /// - `PackError::Io` for other read failures (including invalid UTF-8)
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(PackError::WhitelistNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(PackError::Io(e)),
        };

        let entries = parse_whitelist(&text)?;
        if entries.is_empty() {
            return Err(PackError::EmptyWhitelist {
                path: path.to_path_buf(),
            });
        }

        log::info!(
            "loaded {} whitelist entries from {}",
            entries.len(),
            path.display()
        );

        Ok(Self {
            source: path.to_path_buf(),
            entries,
        })
    }

    /// Path the whitelist was read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Validated entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false` for a loaded whitelist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
