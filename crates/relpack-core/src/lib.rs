//! Whitelist-driven release packaging.
//!
//! `relpack-core` reads a whitelist of repository-relative paths, copies the
//! listed files and directory trees into a fresh staging tree, and writes the
//! staging tree into a Deflate-compressed ZIP whose entries all live under a
//! single root folder.
//!
//! Whitelist entries are validated before anything is copied: absolute
//! paths and `..` segments are rejected, and every source must resolve
//! inside the repository root.
//!
//! # Examples
//!
//! ```no_run
//! use relpack_core::PackConfig;
//! use relpack_core::package_release;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackConfig::new(".").with_root_name("demo");
//! let report = package_release(&config)?;
//! println!("Archived {} files", report.files_archived);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod error;
pub mod report;
pub mod staging;
pub mod whitelist;

// Re-export main API types
pub use api::package_release;
pub use api::package_release_with_progress;
pub use archive::ArchiveReport;
pub use config::PackConfig;
pub use error::PackError;
pub use error::Result;
pub use report::NoopProgress;
pub use report::PackReport;
pub use report::ProgressCallback;
pub use staging::StagingTree;
pub use whitelist::Whitelist;
pub use whitelist::WhitelistEntry;
