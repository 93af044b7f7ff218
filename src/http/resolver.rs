//! Maps request targets onto regular files below the static root.

use std::fs::Metadata;
use std::io::ErrorKind;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::fs::{self, File};
use tokio::io::AsyncReadExt;

use crate::config::Limits;
use crate::error::{Result, ServeError};
use crate::http::parser::RequestTarget;

/// Read-only view of the static content directory, shared by all
/// connections.
#[derive(Debug, Clone)]
pub struct StaticRoot {
    root: PathBuf,
    max_path: usize,
    max_body: usize,
}

impl StaticRoot {
    pub fn new(root: impl Into<PathBuf>, limits: &Limits) -> Self {
        Self {
            root: root.into(),
            max_path: limits.max_path,
            max_body: limits.max_body,
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Builds `root/target`, failing instead of truncating when the result
    /// is longer than the path limit.
    pub fn join(&self, target: &RequestTarget) -> Result<PathBuf> {
        let root = self.root.as_os_str();
        let len = root.len() + 1 + target.as_str().len();
        if len > self.max_path {
            return Err(ServeError::PathOverflow {
                len,
                max: self.max_path,
            });
        }

        let mut joined = root.to_os_string();
        joined.push("/");
        joined.push(target.as_str());
        Ok(PathBuf::from(joined))
    }

    /// Reads the file named by `target`.
    ///
    /// Anything that is missing or not a regular file (symlinks included)
    /// is [`ServeError::NotFound`]. The file is checked with lstat before
    /// opening and its identity compared afterwards, so a file swapped in
    /// between is rejected with [`ServeError::FileChanged`].
    pub async fn resolve(&self, target: &RequestTarget) -> Result<Bytes> {
        let path = self.join(target)?;

        let before = match fs::symlink_metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if is_missing(e.kind()) => return Err(ServeError::NotFound(path)),
            Err(e) => return Err(e.into()),
        };
        if !before.file_type().is_file() {
            tracing::debug!(path = %path.display(), "Not a regular file");
            return Err(ServeError::NotFound(path));
        }

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if is_missing(e.kind()) => return Err(ServeError::NotFound(path)),
            Err(e) => return Err(e.into()),
        };
        let after = file.metadata().await?;
        if !same_file(&before, &after) {
            return Err(ServeError::FileChanged(path));
        }

        let max = self.max_body as u64;
        if after.len() > max {
            return Err(ServeError::ResourceTooLarge { path, max });
        }

        // One extra byte tells a file that grew since fstat from one that
        // fits exactly.
        let mut body = Vec::with_capacity(after.len() as usize);
        file.take(max + 1).read_to_end(&mut body).await?;
        if body.len() as u64 > max {
            return Err(ServeError::ResourceTooLarge { path, max });
        }

        Ok(Bytes::from(body))
    }
}

fn is_missing(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::NotFound | ErrorKind::NotADirectory)
}

fn same_file(a: &Metadata, b: &Metadata) -> bool {
    a.dev() == b.dev() && a.ino() == b.ino()
}
