//! I/O boundary traits for testability
//!
//! These traits abstract the host platform (scene retrieval, annotation
//! publishing) and the filesystem, allowing services to be tested in memory.

use std::io;
use std::path::Path;

use crate::domain::SceneRoot;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Supplies the scene snapshot for the current run.
pub trait TreeSource: Send + Sync {
    /// Receive the root of the scene.
    ///
    /// Malformed scenes are reported as `io::ErrorKind::InvalidData`.
    fn receive(&self) -> io::Result<SceneRoot>;
}

/// Publishes classification results back to the host.
pub trait Annotator: Send + Sync {
    /// Attach an informational message to objects.
    fn attach_info_to_objects(
        &self,
        category: &str,
        message: &str,
        object_ids: &[String],
    ) -> io::Result<()>;

    /// Attach a warning message to objects.
    fn attach_warning_to_objects(
        &self,
        category: &str,
        message: &str,
        object_ids: &[String],
    ) -> io::Result<()>;

    /// Mark the run as succeeded.
    fn mark_run_success(&self, message: &str) -> io::Result<()>;

    /// Mark the run as failed.
    fn mark_run_failed(&self, message: &str) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
