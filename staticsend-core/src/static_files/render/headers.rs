use crate::static_files::Precompressed;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// `max-age=<whole seconds>[,immutable]`
pub(crate) fn cache_control_value(max_age: Duration, immutable: bool) -> String {
    let mut value = format!("max-age={}", max_age.as_secs());

    if immutable {
        value.push_str(",immutable");
    }

    value
}

pub(crate) fn last_modified_value(modified: Option<SystemTime>) -> Option<String> {
    modified.map(httpdate::fmt_http_date)
}

/// Text-like types get an explicit UTF-8 charset.
fn wants_charset(mime: &mime_guess::Mime) -> bool {
    if mime.type_() == mime_guess::mime::TEXT {
        return true;
    }

    mime.type_() == mime_guess::mime::APPLICATION
        && matches!(mime.subtype().as_str(), "json" | "javascript" | "x-javascript")
}

/// Content type of the file the client asked for, not of the variant on disk:
/// `app.js.br` served for brotli is `text/javascript`.
pub(crate) fn content_type_for(path: &Path, encoding: Option<Precompressed>) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let requested: &str = match encoding {
        Some(encoding) => file_name
            .strip_suffix(encoding.suffix())
            .unwrap_or(&file_name),
        None => &file_name,
    };

    let mime = mime_guess::from_path(requested).first_or_octet_stream();

    if wants_charset(&mime) {
        format!("{}; charset=utf-8", mime.essence_str())
    } else {
        mime.essence_str().to_string()
    }
}
