//! OneDrive file service

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::json;
use tracing::{debug, instrument};

use super::{decode, decode_created};
use crate::application::{ApplicationResult, GraphResultExt, IoResultExt};
use crate::domain::{Collection, DomainError, DriveItem, DrivePath, Query, SIMPLE_UPLOAD_LIMIT};
use crate::infrastructure::traits::{FileSystem, GraphClient};

/// Result of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Browse, transfer and organize OneDrive items.
#[derive(Clone)]
pub struct DriveService {
    graph: Arc<dyn GraphClient>,
    fs: Arc<dyn FileSystem>,
}

impl DriveService {
    pub fn new(graph: Arc<dyn GraphClient>, fs: Arc<dyn FileSystem>) -> Self {
        Self { graph, fs }
    }

    /// Children of a folder (root when `path` is empty).
    #[instrument(skip(self))]
    pub fn list(&self, path: &DrivePath) -> ApplicationResult<Collection<DriveItem>> {
        let value = self
            .graph
            .get_json(&path.children_url(), &Query::new())
            .context(&format!("list {}", path))?;
        decode(value, "drive items")
    }

    #[instrument(skip(self))]
    pub fn get(&self, path: &DrivePath) -> ApplicationResult<DriveItem> {
        let value = self
            .graph
            .get_json(&path.item_url(), &Query::new())
            .context(&format!("get {}", path))?;
        decode(value, "drive item")
    }

    /// Download a file to `dest`, or to its own name in the working directory.
    #[instrument(skip(self))]
    pub fn download(&self, path: &DrivePath, dest: Option<&Path>) -> ApplicationResult<Download> {
        let name = path.file_name().ok_or(DomainError::EmptyValue("path"))?;
        let dest = dest
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(name));

        let bytes = self
            .graph
            .get_bytes(&path.content_url())
            .context(&format!("download {}", path))?;

        self.fs
            .ensure_parent(&dest)
            .with_path_context("create parent directory", &dest)?;
        self.fs
            .write(&dest, &bytes)
            .with_path_context("write", &dest)?;

        debug!("download: {} -> {} ({} bytes)", path, dest.display(), bytes.len());
        Ok(Download {
            path: dest,
            bytes: bytes.len() as u64,
        })
    }

    /// Upload a local file with a single PUT.
    ///
    /// `remote` defaults to the local file name in the drive root; a value
    /// ending in `/` names the target folder.
    #[instrument(skip(self))]
    pub fn upload(&self, local: &Path, remote: Option<&str>) -> ApplicationResult<DriveItem> {
        let size = self
            .fs
            .file_size(local)
            .with_path_context("read", local)?;
        if size > SIMPLE_UPLOAD_LIMIT {
            return Err(DomainError::UploadTooLarge {
                size,
                limit: SIMPLE_UPLOAD_LIMIT,
            }
            .into());
        }

        let target = upload_target(local, remote)?;
        let content = self.fs.read(local).with_path_context("read", local)?;

        let value = self
            .graph
            .put_bytes(&target.content_url(), "application/octet-stream", content)
            .context(&format!("upload {}", target))?;
        debug!("upload: {} -> {} ({} bytes)", local.display(), target, size);
        decode(value, "drive item")
    }

    /// Create a folder; fails if the name is taken.
    #[instrument(skip(self))]
    pub fn mkdir(&self, path: &DrivePath) -> ApplicationResult<DriveItem> {
        let name = path.file_name().ok_or(DomainError::EmptyValue("path"))?;
        let body = json!({
            "name": name,
            "folder": {},
            "@microsoft.graph.conflictBehavior": "fail",
        });
        let created = self
            .graph
            .post_json(&path.parent().children_url(), &body)
            .context(&format!("create folder {}", path))?;
        decode_created(created, "folder")
    }

    #[instrument(skip(self))]
    pub fn remove(&self, path: &DrivePath) -> ApplicationResult<()> {
        if path.is_root() {
            return Err(DomainError::EmptyValue("path").into());
        }
        self.graph
            .delete(&path.item_url())
            .context(&format!("delete {}", path))
    }
}

fn upload_target(local: &Path, remote: Option<&str>) -> ApplicationResult<DrivePath> {
    let local_name = local
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(DomainError::EmptyValue("file name"))?;
    let target = match remote {
        None => DrivePath::root().join(local_name),
        Some(r) if r.ends_with('/') || r.trim().is_empty() => DrivePath::parse(r).join(local_name),
        Some(r) => DrivePath::parse(r),
    };
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_remote_when_upload_target_then_root_with_local_name() {
        let target = upload_target(Path::new("/tmp/notes.txt"), None).unwrap();
        assert_eq!(target, DrivePath::parse("notes.txt"));
    }

    #[test]
    fn given_folder_remote_when_upload_target_then_joins_local_name() {
        let target = upload_target(Path::new("notes.txt"), Some("Documents/")).unwrap();
        assert_eq!(target, DrivePath::parse("Documents/notes.txt"));
    }

    #[test]
    fn given_file_remote_when_upload_target_then_used_verbatim() {
        let target = upload_target(Path::new("notes.txt"), Some("Documents/renamed.txt")).unwrap();
        assert_eq!(target, DrivePath::parse("Documents/renamed.txt"));
    }
}
