//! I/O boundary traits for testability
//!
//! These traits abstract Graph requests and local file access, allowing
//! services to be tested with fake implementations.

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::domain::Query;
use crate::infrastructure::InfraResult;

/// Microsoft Graph request abstraction.
///
/// Paths are relative to the configured base URL and start with `/`,
/// e.g. `/me/messages`.
pub trait GraphClient: Send + Sync {
    /// `GET` a JSON resource.
    fn get_json(&self, path: &str, query: &Query) -> InfraResult<Value>;

    /// `POST` a JSON body. Returns `None` for empty (202/204) responses.
    fn post_json(&self, path: &str, body: &Value) -> InfraResult<Option<Value>>;

    /// `PATCH` a JSON body and return the updated resource.
    fn patch_json(&self, path: &str, body: &Value) -> InfraResult<Value>;

    /// `DELETE` a resource.
    fn delete(&self, path: &str) -> InfraResult<()>;

    /// `GET` raw content (file downloads, OneNote page HTML).
    fn get_bytes(&self, path: &str) -> InfraResult<Vec<u8>>;

    /// `PUT` raw content and return the resulting resource.
    fn put_bytes(&self, path: &str, content_type: &str, body: Vec<u8>) -> InfraResult<Value>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes to file, replacing it.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Size of a regular file in bytes.
    fn file_size(&self, path: &Path) -> io::Result<u64>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }
        Ok(meta.len())
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
