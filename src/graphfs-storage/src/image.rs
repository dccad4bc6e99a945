//! On-disk image of a persistent file system.
//!
//! The image is the clone stream of the store at its last unmount or
//! replication. Saves go through a temporary file and a rename so a crash
//! never leaves a half-written image behind.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::AsyncWriteExt;

use common_error::{GraphFsError, GraphFsResult};

/// Location of a store image.
#[derive(Debug, Clone)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    /// Create a handle for the image at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the image.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the image, or `None` if it has never been written.
    pub async fn load(&self) -> GraphFsResult<Option<Bytes>> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GraphFsError::IoError(e)),
        }
    }

    /// Replace the image atomically and durably.
    ///
    /// The stream is written and synced to a hidden sibling file, renamed
    /// over the image, and the directory entry is synced.
    pub async fn save(&self, stream: &[u8]) -> GraphFsResult<()> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent).await?;

        let tmp_path = self.tmp_path()?;
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(stream).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp_path, &self.path).await?;
        sync_dir(parent).await?;

        log::debug!(
            "Saved {} byte image to {}",
            stream.len(),
            self.path.display()
        );
        Ok(())
    }

    /// `.<name>.tmp` next to the image.
    fn tmp_path(&self) -> GraphFsResult<PathBuf> {
        let name = self.path.file_name().ok_or_else(|| {
            GraphFsError::invalid_parameter(format!(
                "image path {} has no file name",
                self.path.display()
            ))
        })?;
        let mut tmp_name = OsString::from(".");
        tmp_name.push(name);
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

#[cfg(unix)]
async fn sync_dir(dir: &Path) -> GraphFsResult<()> {
    tokio::fs::File::open(dir).await?.sync_all().await?;
    Ok(())
}

// Directories cannot be opened for syncing here; the rename is the commit.
#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> GraphFsResult<()> {
    Ok(())
}
