use crate::conf::SendOptions;
use crate::ctx::RequestContext;
use crate::fs::{FileSystem, TokioFs};
use crate::static_files::SendError;
use crate::static_files::render::compose_response;
use crate::static_files::resolve::{
    PolicyOutcome, Target, apply_extension_fallback, apply_index_and_hidden, negotiate_variant,
    resolve_request_path, resolve_target,
};
use std::path::PathBuf;

/// Result of a [`send`] call that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The file at this path is now the response body.
    Served(PathBuf),
    /// A directory was requested without a trailing slash; the response now
    /// redirects to this location.
    Redirected(String),
    /// Nothing was written; the caller should continue with its own handling.
    Declined,
}

/// Serves `request_path` from `options.root` into `ctx` using `tokio::fs`.
pub async fn send<C>(
    ctx: &mut C,
    request_path: &str,
    options: &SendOptions,
) -> Result<SendOutcome, SendError>
where
    C: RequestContext + ?Sized,
{
    send_with(&TokioFs, ctx, request_path, options).await
}

/// [`send`] over a caller-supplied [`FileSystem`].
///
/// Stages run in order: path resolution, index/hidden policy, extension
/// fallback, precompressed variant negotiation, stat, composition. Each
/// filesystem call is awaited in sequence; nothing is retried.
pub async fn send_with<F, C>(
    fs: &F,
    ctx: &mut C,
    request_path: &str,
    options: &SendOptions,
) -> Result<SendOutcome, SendError>
where
    F: FileSystem + ?Sized,
    C: RequestContext + ?Sized,
{
    options.validate()?;
    let root = options.root_dir()?;

    tracing::debug!(request_path, root = %root.display(), "send");

    let resolved = resolve_request_path(&root, request_path)?;

    let resolved = match apply_index_and_hidden(
        &root,
        resolved,
        options.index.as_deref(),
        options.hidden,
    )? {
        PolicyOutcome::Candidate(resolved) => resolved,
        PolicyOutcome::Declined => {
            tracing::debug!(request_path, "hidden path declined");
            return Ok(SendOutcome::Declined);
        }
    };

    let candidate = if resolved.trailing_slash {
        resolved.path
    } else {
        apply_extension_fallback(fs, &root, resolved.path, &options.fallback_extensions()).await
    };

    let (candidate, encoding) = negotiate_variant(fs, ctx, &root, candidate, options).await;

    match resolve_target(fs, ctx, candidate, options).await? {
        Target::File { path, stat } => {
            compose_response(fs, ctx, options, &path, &stat, encoding).await?;
            Ok(SendOutcome::Served(path))
        }
        Target::Redirect(location) => Ok(SendOutcome::Redirected(location)),
        Target::Declined => Ok(SendOutcome::Declined),
    }
}
