use crate::conf::ConfigError;
use crate::fs::FileStat;
use http::HeaderMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked with the outgoing headers, the final path and its stats
/// right before the sender writes its own headers.
pub type SetHeaders = Arc<dyn Fn(&mut HeaderMap, &Path, &FileStat) + Send + Sync>;

/// Options for a single [`send`](crate::send) call.
///
/// Read-only for the duration of a call and safe to share between concurrent
/// calls.
#[derive(Clone)]
pub struct SendOptions {
    /// Base directory. Nothing outside of it is ever probed.
    pub root: PathBuf,

    /// Filename served for directory and trailing-slash requests.
    pub index: Option<String>,

    /// Rendered as whole seconds in `Cache-Control: max-age`.
    pub max_age: Duration,

    pub immutable: bool,

    /// Allow path segments starting with a dot.
    pub hidden: bool,

    /// When false, a directory requested without a trailing slash is redirected
    /// to the slashed URL instead of being expanded to its index.
    pub format: bool,

    /// Ordered suffixes tried when the exact path does not exist.
    pub extensions: Option<Vec<String>>,

    pub brotli: bool,
    pub gzip: bool,

    pub set_headers: Option<SetHeaders>,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: None,
            max_age: Duration::ZERO,
            immutable: false,
            hidden: false,
            format: true,
            extensions: None,
            brotli: true,
            gzip: true,
            set_headers: None,
        }
    }
}

impl fmt::Debug for SendOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendOptions")
            .field("root", &self.root)
            .field("index", &self.index)
            .field("max_age", &self.max_age)
            .field("immutable", &self.immutable)
            .field("hidden", &self.hidden)
            .field("format", &self.format)
            .field("extensions", &self.extensions)
            .field("brotli", &self.brotli)
            .field("gzip", &self.gzip)
            .field("set_headers", &self.set_headers.as_ref().map(|_| ".."))
            .finish()
    }
}

impl SendOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    pub fn with_immutable(mut self, immutable: bool) -> Self {
        self.immutable = immutable;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_format(mut self, format: bool) -> Self {
        self.format = format;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_brotli(mut self, brotli: bool) -> Self {
        self.brotli = brotli;
        self
    }

    pub fn with_gzip(mut self, gzip: bool) -> Self {
        self.gzip = gzip;
        self
    }

    pub fn with_set_headers<F>(mut self, set_headers: F) -> Self
    where
        F: Fn(&mut HeaderMap, &Path, &FileStat) + Send + Sync + 'static,
    {
        self.set_headers = Some(Arc::new(set_headers));
        self
    }

    /// Checks the option shape. Runs before any filesystem access.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(index) = &self.index {
            validate_index(index)?;
        }

        for (position, ext) in self.extensions.iter().flatten().enumerate() {
            if ext.trim_start_matches('.').is_empty() {
                return Err(ConfigError::invalid_extension(position, "an empty string"));
            }
            if ext.chars().any(|c| is_separator(c) || c == '\0') {
                return Err(ConfigError::invalid_extension(
                    position,
                    format!("'{ext}' (contains a path separator)"),
                ));
            }
        }

        Ok(())
    }

    /// Absolute, lexically normalized root directory.
    pub fn root_dir(&self) -> Result<PathBuf, ConfigError> {
        let absolute = std::path::absolute(&self.root).map_err(|e| ConfigError::InvalidRoot {
            path: self.root.clone(),
            reason: e.to_string(),
        })?;

        Ok(normalize_lexically(&absolute))
    }

    /// Extension list with a leading dot on every entry; empty when disabled.
    pub(crate) fn fallback_extensions(&self) -> Vec<String> {
        self.extensions
            .iter()
            .flatten()
            .map(|ext| {
                if ext.starts_with('.') {
                    ext.clone()
                } else {
                    format!(".{ext}")
                }
            })
            .collect()
    }
}

fn validate_index(index: &str) -> Result<(), ConfigError> {
    let reason = if index.is_empty() {
        Some("must not be empty")
    } else if index == "." || index == ".." {
        Some("must name a file")
    } else if index.chars().any(|c| is_separator(c) || c == '\0') {
        Some("must be a single path segment")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidIndex {
            index: index.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

pub(crate) fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

/// Resolves `.` and `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
