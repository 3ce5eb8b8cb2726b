use staticsend_core::{SendCtx, SendError, SendOptions, SendOutcome, send};
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::TempDir;

/// A throwaway site root on disk.
pub struct SiteFixture {
    dir: TempDir,
}

impl SiteFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Site root nested one level down so tests can place files next to it.
    pub fn root(&self) -> PathBuf {
        self.dir.path().join("site")
    }

    /// Path relative to the temp dir, outside the site root.
    pub fn outside(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    pub fn options(&self) -> SendOptions {
        SendOptions::new(self.root())
    }

    pub fn file(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        write_file(self.root().join(rel), contents.as_ref())
    }

    pub fn outside_file(&self, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        write_file(self.outside(rel), contents.as_ref())
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.root().join(rel);
        std::fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes brotli-compressed `rel.br`.
    pub fn with_brotli(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let mut compressed = Vec::new();
        {
            let mut writer = brotli::CompressorWriter::new(&mut compressed, 4096, 9, 22);
            writer.write_all(contents).unwrap();
        }
        write_file(self.root().join(format!("{rel}.br")), &compressed)
    }

    /// Writes gzip-compressed `rel.gz`.
    pub fn with_gzip(&self, rel: &str, contents: &[u8]) -> PathBuf {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(contents).unwrap();
        let compressed = encoder.finish().unwrap();
        write_file(self.root().join(format!("{rel}.gz")), &compressed)
    }

    /// Sends `url` through the sender with an optional Accept-Encoding header
    /// and drains the body.
    pub async fn get(
        &self,
        url: &str,
        accept_encoding: Option<&str>,
        options: &SendOptions,
    ) -> Response {
        let mut ctx = SendCtx::new(url);
        if let Some(value) = accept_encoding {
            ctx = ctx.with_accept_encoding(value);
        }

        let request_path = ctx.path().to_string();
        let result = send(&mut ctx, &request_path, options).await;
        let body = std::mem::take(&mut ctx.body)
            .into_bytes()
            .await
            .unwrap()
            .to_vec();

        Response { result, ctx, body }
    }
}

impl Default for SiteFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn write_file(path: PathBuf, contents: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

pub struct Response {
    pub result: Result<SendOutcome, SendError>,
    pub ctx: SendCtx,
    pub body: Vec<u8>,
}

impl Response {
    pub fn outcome(&self) -> &SendOutcome {
        match &self.result {
            Ok(outcome) => outcome,
            Err(e) => panic!("expected an outcome, got error: {e}"),
        }
    }

    pub fn error(&self) -> &SendError {
        match &self.result {
            Ok(outcome) => panic!("expected an error, got {outcome:?}"),
            Err(e) => e,
        }
    }

    pub fn header(&self, name: http::HeaderName) -> Option<&str> {
        self.ctx.header_str(&name)
    }
}

pub fn unbrotli(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    brotli::Decompressor::new(bytes, 4096)
        .read_to_end(&mut out)
        .unwrap();
    out
}

pub fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .unwrap();
    out
}
