//! Data acquisition for the provcrate generator.
//!
//! Everything that touches the outside world lives here: the provenance
//! log, the YAML configuration, the filesystem, and the host environment.
//! The reconciliation and common-path algorithms downstream only see the
//! [`FsProbe`] seam, so they can be exercised without real files.

pub mod config;
pub mod host;
pub mod log;
pub mod sources;

use provcrate_core::error::{CrateError, CrateResult};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use config::RunConfig;
pub use host::HostContext;
pub use log::ProvenanceLog;
pub use sources::SourceSet;

/// Capability interface over the filesystem facts the pipeline needs.
pub trait FsProbe {
    fn exists(&self, path: &Path) -> bool;
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn size(&self, path: &Path) -> CrateResult<u64>;
    fn mtime(&self, path: &Path) -> CrateResult<SystemTime>;
    /// Canonical absolute form (symlinks and `.`/`..` resolved).
    fn resolve(&self, path: &Path) -> CrateResult<PathBuf>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl FsProbe for RealFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn size(&self, path: &Path) -> CrateResult<u64> {
        let meta = std::fs::metadata(path)
            .map_err(|e| CrateError::Filesystem(format!("cannot stat {}: {e}", path.display())))?;
        Ok(meta.len())
    }

    fn mtime(&self, path: &Path) -> CrateResult<SystemTime> {
        let meta = std::fs::metadata(path)
            .map_err(|e| CrateError::Filesystem(format!("cannot stat {}: {e}", path.display())))?;
        meta.modified()
            .map_err(|e| CrateError::Filesystem(format!("no mtime for {}: {e}", path.display())))
    }

    fn resolve(&self, path: &Path) -> CrateResult<PathBuf> {
        std::fs::canonicalize(path).map_err(|e| {
            CrateError::Filesystem(format!("cannot resolve {}: {e}", path.display()))
        })
    }
}

/// Expand a leading `~` to the user's home directory.
///
/// Paths without a tilde pass through unchanged; if `HOME` is unset the
/// tilde is left in place and the later existence probe will reject it.
pub fn expand_user(path: &str) -> PathBuf {
    if path == "~" {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home);
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return Path::new(&home).join(rest);
        }
    }
    PathBuf::from(path)
}
