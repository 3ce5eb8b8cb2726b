use crate::conf::SendOptions;
use crate::ctx::RequestContext;
use crate::fs::{FileStat, FileSystem};
use crate::static_files::render::headers::{
    cache_control_value, content_type_for, last_modified_value,
};
use crate::static_files::resolve::classify_io_error;
use crate::static_files::{Precompressed, SendError, StaticBody};
use http::{HeaderValue, header};
use std::path::Path;

/// Writes the file-serving headers and attaches the body.
///
/// `set_headers` runs first, so Last-Modified and Cache-Control it sets are
/// kept; Content-Length and Content-Type are always the sender's.
pub(crate) async fn compose_response<F, C>(
    fs: &F,
    ctx: &mut C,
    options: &SendOptions,
    path: &Path,
    stat: &FileStat,
    encoding: Option<Precompressed>,
) -> Result<(), SendError>
where
    F: FileSystem + ?Sized,
    C: RequestContext + ?Sized,
{
    if let Some(set_headers) = &options.set_headers {
        set_headers(ctx.response_headers_mut(), path, stat);
    }

    ctx.set_response_header(header::CONTENT_LENGTH, HeaderValue::from(stat.size));

    if ctx.response_header(&header::LAST_MODIFIED).is_none() {
        if let Some(value) = last_modified_value(stat.modified)
            .and_then(|v| HeaderValue::from_str(&v).ok())
        {
            ctx.set_response_header(header::LAST_MODIFIED, value);
        }
    }

    if ctx.response_header(&header::CACHE_CONTROL).is_none() {
        let value = cache_control_value(options.max_age, options.immutable);
        if let Ok(value) = HeaderValue::from_str(&value) {
            ctx.set_response_header(header::CACHE_CONTROL, value);
        }
    }

    ctx.set_content_type(&content_type_for(path, encoding));

    let reader = fs.open(path).await.map_err(|e| classify_io_error(path, e))?;
    ctx.set_body(StaticBody::Stream(reader));

    Ok(())
}
