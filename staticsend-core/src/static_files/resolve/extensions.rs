use crate::fs::FileSystem;
use crate::static_files::resolve::suffixed_within;
use std::path::{Path, PathBuf};

/// Tries `candidate + ext` for each extension in order when `candidate` itself
/// does not exist. The first hit wins; no hit leaves `candidate` as is.
/// Suffixes that would leave `root` are skipped.
///
/// `extensions` are expected to carry their leading dot already.
pub(crate) async fn apply_extension_fallback<F>(
    fs: &F,
    root: &Path,
    candidate: PathBuf,
    extensions: &[String],
) -> PathBuf
where
    F: FileSystem + ?Sized,
{
    if extensions.is_empty() || fs.exists(&candidate).await {
        return candidate;
    }

    for ext in extensions {
        let Some(suffixed) = suffixed_within(root, &candidate, ext) else {
            continue;
        };

        if fs.exists(&suffixed).await {
            tracing::debug!(path = %suffixed.display(), "extension fallback matched");
            return suffixed;
        }
    }

    candidate
}
