use crate::static_files::SendError;
use crate::static_files::resolve::ResolvedPath;
use std::path::{Component, Path};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PolicyOutcome {
    Candidate(ResolvedPath),
    /// Not ours to serve; the caller falls through to its own handling.
    Declined,
}

/// Trailing slash means "serve the index"; otherwise hidden segments are
/// declined unless `hidden` is allowed. Never touches the filesystem.
pub(crate) fn apply_index_and_hidden(
    root: &Path,
    resolved: ResolvedPath,
    index: Option<&str>,
    hidden: bool,
) -> Result<PolicyOutcome, SendError> {
    if resolved.trailing_slash {
        return match index {
            Some(index) => Ok(PolicyOutcome::Candidate(ResolvedPath {
                path: resolved.path.join(index),
                trailing_slash: true,
            })),
            None => Err(SendError::not_found(resolved.path)),
        };
    }

    if !hidden && is_hidden(root, &resolved.path) {
        return Ok(PolicyOutcome::Declined);
    }

    Ok(PolicyOutcome::Candidate(resolved))
}

/// True if any segment between `root` and `path` starts with a dot.
/// A path outside `root` counts as hidden.
pub(crate) fn is_hidden(root: &Path, path: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return true;
    };

    relative.components().any(|component| match component {
        Component::Normal(segment) => segment.as_encoded_bytes().first() == Some(&b'.'),
        _ => false,
    })
}
