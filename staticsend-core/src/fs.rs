//! Filesystem capability consumed by the sender.
//!
//! Every method on [`FileSystem`] is a suspension point; the sender never
//! touches the disk except through it.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::time::SystemTime;
use tokio::io::AsyncRead;

/// Readable byte stream over an opened file.
pub type FileReader = Box<dyn AsyncRead + Send + Unpin>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    /// Sockets, fifos, devices. Never served.
    Other,
}

/// The subset of filesystem metadata the sender needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub kind: FileKind,
}

impl FileStat {
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Directory
    }

    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }
}

impl From<std::fs::Metadata> for FileStat {
    fn from(metadata: std::fs::Metadata) -> Self {
        let kind = if metadata.is_file() {
            FileKind::File
        } else if metadata.is_dir() {
            FileKind::Directory
        } else {
            FileKind::Other
        };

        Self {
            size: metadata.len(),
            modified: metadata.modified().ok(),
            kind,
        }
    }
}

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Returns true if anything (file or directory) exists at `path`.
    async fn exists(&self, path: &Path) -> bool;

    async fn stat(&self, path: &Path) -> io::Result<FileStat>;

    async fn open(&self, path: &Path) -> io::Result<FileReader>;
}

/// Default [`FileSystem`] backed by `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFs;

#[async_trait]
impl FileSystem for TokioFs {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        tokio::fs::metadata(path).await.map(FileStat::from)
    }

    async fn open(&self, path: &Path) -> io::Result<FileReader> {
        let file = tokio::fs::File::open(path).await?;
        Ok(Box::new(file))
    }
}
