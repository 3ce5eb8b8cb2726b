use crate::conf::SendOptions;
use crate::ctx::RequestContext;
use crate::fs::FileSystem;
use crate::static_files::resolve::suffixed_within;
use http::{HeaderValue, header};
use std::path::{Path, PathBuf};

/// A precompressed sibling of the requested file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precompressed {
    Brotli,
    Gzip,
}

impl Precompressed {
    /// Negotiation order.
    pub const ALL: [Precompressed; 2] = [Precompressed::Brotli, Precompressed::Gzip];

    /// Content-Encoding token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Precompressed::Brotli => "br",
            Precompressed::Gzip => "gzip",
        }
    }

    /// Suffix of the sibling file on disk.
    pub fn suffix(&self) -> &'static str {
        match self {
            Precompressed::Brotli => ".br",
            Precompressed::Gzip => ".gz",
        }
    }

    fn enabled(&self, options: &SendOptions) -> bool {
        match self {
            Precompressed::Brotli => options.brotli,
            Precompressed::Gzip => options.gzip,
        }
    }
}

/// Swaps `candidate` for its `.br` or `.gz` sibling when the client prefers that
/// encoding over identity and the sibling exists. Brotli is tried first; at most
/// one variant is chosen.
pub(crate) async fn negotiate_variant<F, C>(
    fs: &F,
    ctx: &mut C,
    root: &Path,
    candidate: PathBuf,
    options: &SendOptions,
) -> (PathBuf, Option<Precompressed>)
where
    F: FileSystem + ?Sized,
    C: RequestContext + ?Sized,
{
    for encoding in Precompressed::ALL {
        if !encoding.enabled(options) {
            continue;
        }

        let token = encoding.as_str();
        if ctx.accepts_encodings(&[token, "identity"]) != Some(token) {
            continue;
        }

        let Some(variant) = suffixed_within(root, &candidate, encoding.suffix()) else {
            continue;
        };

        if fs.exists(&variant).await {
            tracing::debug!(path = %variant.display(), encoding = token, "serving precompressed variant");

            ctx.set_response_header(header::CONTENT_ENCODING, HeaderValue::from_static(token));
            // Recomputed from the variant's own size.
            ctx.remove_response_header(&header::CONTENT_LENGTH);

            return (variant, Some(encoding));
        }
    }

    (candidate, None)
}
