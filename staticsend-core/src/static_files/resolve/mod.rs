mod encoding;
mod extensions;
pub(crate) mod metadata;
pub(crate) mod path;
pub(crate) mod policy;

pub use encoding::Precompressed;

pub(crate) use encoding::negotiate_variant;
pub(crate) use extensions::apply_extension_fallback;
pub(crate) use metadata::{Target, classify_io_error, resolve_target};
pub(crate) use path::{ResolvedPath, resolve_request_path, suffixed_within};
pub(crate) use policy::{PolicyOutcome, apply_index_and_hidden};
