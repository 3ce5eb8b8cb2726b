use crate::conf::SendOptions;
use crate::ctx::RequestContext;
use crate::fs::{FileStat, FileSystem};
use crate::static_files::SendError;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub(crate) enum Target {
    File { path: PathBuf, stat: FileStat },
    Redirect(String),
    Declined,
}

/// Maps a filesystem failure onto the error taxonomy.
///
/// Missing files, over-long names and non-directory path prefixes are
/// `NotFound`; everything else is `Internal` with the cause preserved.
pub(crate) fn classify_io_error(path: &Path, err: io::Error) -> SendError {
    if is_not_found(&err) {
        SendError::NotFound {
            path: path.to_path_buf(),
            source: Some(err),
        }
    } else {
        tracing::warn!(path = %path.display(), error = %err, "filesystem error");
        SendError::Internal {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound || is_not_found_errno(err)
}

#[cfg(unix)]
fn is_not_found_errno(err: &io::Error) -> bool {
    use nix::errno::Errno;

    err.raw_os_error().is_some_and(|code| {
        matches!(
            Errno::from_raw(code),
            Errno::ENOENT | Errno::ENAMETOOLONG | Errno::ENOTDIR
        )
    })
}

#[cfg(not(unix))]
fn is_not_found_errno(_err: &io::Error) -> bool {
    false
}

async fn stat_path<F>(fs: &F, path: &Path) -> Result<FileStat, SendError>
where
    F: FileSystem + ?Sized,
{
    fs.stat(path).await.map_err(|e| classify_io_error(path, e))
}

/// Escaped in a redirect Location. `%` is kept so existing escapes survive.
const LOCATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Location for the slashed form of the request URL; the query string is kept.
/// Always a valid header value: controls and non-ASCII bytes are escaped.
pub(crate) fn trailing_slash_location(url: &str) -> String {
    let url = utf8_percent_encode(url, LOCATION).to_string();
    match url.split_once('?') {
        Some((path, query)) => format!("{path}/?{query}"),
        None => format!("{url}/"),
    }
}

/// Stats the final candidate and settles directory-vs-file.
///
/// A directory either redirects (`format` off), expands to its index once, or
/// is declined. The index is stat'ed without a second directory check, so
/// anything but a regular file there is `NotFound`.
pub(crate) async fn resolve_target<F, C>(
    fs: &F,
    ctx: &mut C,
    path: PathBuf,
    options: &SendOptions,
) -> Result<Target, SendError>
where
    F: FileSystem + ?Sized,
    C: RequestContext + ?Sized,
{
    let stat = stat_path(fs, &path).await?;

    if !stat.is_dir() {
        return regular_file(path, stat);
    }

    if !options.format {
        let location = trailing_slash_location(ctx.url());
        tracing::debug!(location, "redirecting directory request");
        ctx.redirect(&location);
        return Ok(Target::Redirect(location));
    }

    match options.index.as_deref() {
        Some(index) => {
            let index_path = path.join(index);
            let stat = stat_path(fs, &index_path).await?;
            regular_file(index_path, stat)
        }
        None => {
            tracing::debug!(path = %path.display(), "directory without index declined");
            Ok(Target::Declined)
        }
    }
}

fn regular_file(path: PathBuf, stat: FileStat) -> Result<Target, SendError> {
    if stat.is_file() {
        Ok(Target::File { path, stat })
    } else {
        Err(SendError::not_found(path))
    }
}
