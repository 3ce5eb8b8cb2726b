use crate::conf::SendOptions;
use crate::fs::{FileReader, FileStat, FileSystem, TokioFs};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

//-----------------------------------------------------------------------------
// Fixture tree
//-----------------------------------------------------------------------------
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    pub fn file(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    pub fn options(&self) -> SendOptions {
        SendOptions::new(self.root())
    }
}

//-----------------------------------------------------------------------------
// Filesystem doubles
//-----------------------------------------------------------------------------

/// Delegates to `tokio::fs` and remembers every path it was asked about.
#[derive(Default)]
pub struct RecordingFs {
    inner: TokioFs,
    probes: Mutex<Vec<PathBuf>>,
}

impl RecordingFs {
    pub fn probes(&self) -> Vec<PathBuf> {
        self.probes.lock().unwrap().clone()
    }

    fn record(&self, path: &Path) {
        self.probes.lock().unwrap().push(path.to_path_buf());
    }
}

#[async_trait]
impl FileSystem for RecordingFs {
    async fn exists(&self, path: &Path) -> bool {
        self.record(path);
        self.inner.exists(path).await
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        self.record(path);
        self.inner.stat(path).await
    }

    async fn open(&self, path: &Path) -> io::Result<FileReader> {
        self.record(path);
        self.inner.open(path).await
    }
}

/// Every stat fails with the given error kind.
pub struct FailingFs(pub io::ErrorKind);

#[async_trait]
impl FileSystem for FailingFs {
    async fn exists(&self, _path: &Path) -> bool {
        false
    }

    async fn stat(&self, _path: &Path) -> io::Result<FileStat> {
        Err(io::Error::new(self.0, "simulated failure"))
    }

    async fn open(&self, _path: &Path) -> io::Result<FileReader> {
        Err(io::Error::new(self.0, "simulated failure"))
    }
}
