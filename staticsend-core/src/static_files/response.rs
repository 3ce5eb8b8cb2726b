use crate::fs::FileReader;
use bytes::Bytes;
use std::fmt;
use std::io;
use tokio::io::AsyncReadExt;

#[derive(Default)]
pub enum StaticBody {
    #[default]
    Empty,
    /// Streamed from disk.
    Stream(FileReader),
}

impl StaticBody {
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes: Bytes = bytes.into();
        Self::Stream(Box::new(io::Cursor::new(bytes)))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Drains the body into memory.
    pub async fn into_bytes(self) -> io::Result<Bytes> {
        match self {
            Self::Empty => Ok(Bytes::new()),
            Self::Stream(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                Ok(Bytes::from(buf))
            }
        }
    }
}

impl fmt::Debug for StaticBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
