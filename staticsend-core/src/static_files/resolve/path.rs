use crate::static_files::SendError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedPath {
    /// Absolute candidate, always under the root.
    pub path: PathBuf,
    /// The raw request path ended in a separator.
    pub trailing_slash: bool,
}

fn is_separator(c: char) -> bool {
    c == '/' || (cfg!(windows) && c == '\\')
}

/// A `%` not followed by two hex digits.
fn has_malformed_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| {
        *b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

/// Percent-decode ONCE, as UTF-8.
pub(crate) fn decode_request_path(raw: &str) -> Result<String, SendError> {
    if has_malformed_escape(raw) {
        return Err(SendError::BadRequest {
            reason: "failed to decode",
        });
    }

    let decoded = percent_encoding::percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| SendError::BadRequest {
            reason: "failed to decode",
        })?;

    if decoded.contains('\0') {
        return Err(SendError::BadRequest {
            reason: "path contains a NUL byte",
        });
    }

    Ok(decoded.into_owned())
}

/// Decodes `raw` and joins it onto `root` without leaving it.
///
/// Leading separators are dropped so the remainder is always relative to
/// `root`. `.` segments and empty segments are skipped, `..` pops the previous
/// segment; popping past `root` is `Forbidden`.
pub(crate) fn resolve_request_path(root: &Path, raw: &str) -> Result<ResolvedPath, SendError> {
    if raw.is_empty() {
        return Err(SendError::BadRequest {
            reason: "path is empty",
        });
    }

    let trailing_slash = raw.ends_with('/');
    let decoded = decode_request_path(raw)?;
    let relative = decoded.trim_start_matches(is_separator);

    let mut stack: Vec<&str> = Vec::new();
    for segment in relative.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(SendError::Forbidden);
                }
            }
            // Drive prefixes would replace the root when pushed.
            s if cfg!(windows) && s.contains(':') => return Err(SendError::Forbidden),
            s => stack.push(s),
        }
    }

    let mut path = root.to_path_buf();
    path.extend(stack);

    ensure_confined(root, &path)?;

    Ok(ResolvedPath {
        path,
        trailing_slash,
    })
}

/// `path` with `suffix` appended to its final component (`a.js` + `.br`).
pub(crate) fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_owned();
    s.push(suffix);
    PathBuf::from(s)
}

/// `path` + `suffix`, or `None` when the result lands outside `root`.
///
/// Only happens when `path` is the root itself (`/srv` + `.br` is `/srv.br`);
/// such a sibling is treated as absent and never probed.
pub(crate) fn suffixed_within(root: &Path, path: &Path, suffix: &str) -> Option<PathBuf> {
    let suffixed = with_suffix(path, suffix);
    if suffixed.starts_with(root) {
        Some(suffixed)
    } else {
        tracing::debug!(path = %suffixed.display(), "skipping probe outside the root");
        None
    }
}

/// Component-wise containment check for the joined request path.
pub(crate) fn ensure_confined(root: &Path, path: &Path) -> Result<(), SendError> {
    if path.starts_with(root) {
        Ok(())
    } else {
        tracing::warn!(
            root = %root.display(),
            path = %path.display(),
            "candidate left the root directory"
        );
        Err(SendError::Forbidden)
    }
}
