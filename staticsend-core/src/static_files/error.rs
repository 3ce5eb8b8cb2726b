use crate::conf::ConfigError;
use http::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    /// Malformed options; raised before any filesystem access.
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("bad request path: {reason}")]
    BadRequest { reason: &'static str },

    /// The request path normalizes to somewhere outside the root.
    #[error("request path escapes the root directory")]
    Forbidden,

    #[error("not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    #[error("failed to access {}: {source}", path.display())]
    Internal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SendError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message is safe to show to the client.
    pub fn expose(&self) -> bool {
        self.status().is_client_error()
    }

    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound {
            path: path.into(),
            source: None,
        }
    }
}
