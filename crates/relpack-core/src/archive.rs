//! Deterministic ZIP archive creation from a staging tree.
//!
//! Every regular file below the staging root becomes one Deflate entry named
//! by its path relative to the root's parent, so all names start with the
//! root folder. Directories get no entries of their own. Entries are written
//! in sorted order with the fixed ZIP epoch as timestamp.
//!
//! Staged files keep their source mtime on disk, but that mtime is not
//! recorded in the archive: entry headers always carry 1980-01-01 00:00, so
//! identical staged content produces a byte-identical archive. Consumers
//! that need file dates must read them from the staging tree.

use crate::PackError;
use crate::ProgressCallback;
use crate::Result;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Size of the read buffer used when streaming file data into the archive.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// A regular file found in the staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Full filesystem path.
    pub path: PathBuf,

    /// Name inside the archive (`/`-separated, prefixed with the root name).
    pub archive_name: String,

    /// Size in bytes.
    pub size: u64,
}

/// Statistics from writing one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Number of file entries written.
    pub files_written: usize,

    /// Uncompressed bytes written.
    pub bytes_written: u64,

    /// Size of the finished archive file.
    pub archive_size: u64,
}

/// Lists every regular file under `staging_root` in sorted order.
///
/// # Errors
///
/// Returns an error if the tree cannot be walked or a path is not valid
/// UTF-8.
///
/// # Examples
///
/// ```no_run
/// use relpack_core::archive::collect_files;
/// use std::path::Path;
///
/// let files = collect_files(Path::new("dist/.stage/demo"))?;
/// for file in &files {
///     println!("{}", file.archive_name); // demo/...
/// }
/// # Ok::<(), relpack_core::PackError>(())
/// ```
pub fn collect_files(staging_root: &Path) -> Result<Vec<StagedFile>> {
    let base = staging_root.parent().unwrap_or(staging_root);
    let mut files = Vec::new();

    for entry in WalkDir::new(staging_root).sort_by_file_name() {
        let entry = entry.map_err(|e| PackError::Walk {
            path: staging_root.to_path_buf(),
            reason: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata().map_err(|e| PackError::Walk {
            path: entry.path().to_path_buf(),
            reason: e.to_string(),
        })?;

        files.push(StagedFile {
            archive_name: archive_name(entry.path(), base)?,
            path: entry.path().to_path_buf(),
            size: metadata.len(),
        });
    }

    Ok(files)
}

/// Writes `staging_root` into a fresh ZIP archive at `output`.
///
/// The output's parent directory is created and any existing file at
/// `output` is removed first.
///
/// # Errors
///
/// Returns an error if the staging tree cannot be read or the archive cannot
/// be written.
pub fn write_archive(
    staging_root: &Path,
    output: &Path,
    compression_level: u8,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveReport> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    match fs::remove_file(output) {
        Ok(()) => log::info!("replaced existing archive {}", output.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(PackError::Io(e)),
    }

    let files = collect_files(staging_root)?;
    let file = File::create(output)?;
    let mut report = write_entries(file, &files, compression_level, progress)?;
    report.archive_size = fs::metadata(output)?.len();

    log::info!(
        "wrote {} files to {} ({} bytes)",
        report.files_written,
        output.display(),
        report.archive_size
    );

    Ok(report)
}

/// Writes the given files into a ZIP stream in order.
fn write_entries<W: Write + Seek>(
    writer: W,
    files: &[StagedFile],
    compression_level: u8,
    progress: &mut dyn ProgressCallback,
) -> Result<ArchiveReport> {
    let mut zip = ZipWriter::new(writer);
    let mut report = ArchiveReport::default();
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(i64::from(compression_level)))
        .last_modified_time(DateTime::default());

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    let total = files.len();

    for (idx, staged) in files.iter().enumerate() {
        let display = Path::new(&staged.archive_name);
        progress.on_entry_start(display, total, idx + 1);

        let mut file = File::open(&staged.path)?;
        let metadata = file.metadata()?;
        let file_options = entry_options(options, &metadata);

        zip.start_file(staged.archive_name.as_str(), file_options)?;

        let mut bytes_written = 0u64;
        loop {
            let bytes_read = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(PackError::Io(e)),
            };
            zip.write_all(&buffer[..bytes_read])?;
            bytes_written += bytes_read as u64;
            progress.on_bytes_written(bytes_read as u64);
        }

        log::debug!("archived {} ({bytes_written} bytes)", staged.archive_name);
        report.files_written += 1;
        report.bytes_written += bytes_written;
        progress.on_entry_complete(display);
    }

    zip.finish()?;
    progress.on_complete();

    Ok(report)
}

fn entry_options(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    let options = options.large_file(metadata.len() >= u64::from(u32::MAX));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        options.unix_permissions(metadata.permissions().mode())
    }
    #[cfg(not(unix))]
    {
        options
    }
}

/// Builds the `/`-separated archive name of `path` relative to `base`.
///
/// ZIP requires forward slashes regardless of platform.
fn archive_name(path: &Path, base: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(base)
        .map_err(|e| io::Error::other(format!("{}: {e}", path.display())))?;

    let parts = rel
        .components()
        .map(|c| {
            c.as_os_str().to_str().ok_or_else(|| {
                PackError::Io(io::Error::other(format!(
                    "path is not valid UTF-8: {}",
                    path.display()
                )))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(parts.join("/"))
}
