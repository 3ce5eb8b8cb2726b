use crate::static_files::StaticBody;
use http::{HeaderMap, HeaderName, HeaderValue};

/// The request/response surface the sender drives.
///
/// Implemented by the embedding server. [`SendCtx`](crate::ctx::SendCtx) is the
/// in-memory implementation.
pub trait RequestContext: Send {
    /// Request URL as received (path and query).
    fn url(&self) -> &str;

    /// Best client-accepted encoding among `candidates`, or `None` if the client
    /// accepts none of them. Ties go to the earlier candidate.
    fn accepts_encodings<'a>(&self, candidates: &[&'a str]) -> Option<&'a str>;

    fn response_header(&self, name: &HeaderName) -> Option<&HeaderValue>;

    fn set_response_header(&mut self, name: HeaderName, value: HeaderValue);

    fn remove_response_header(&mut self, name: &HeaderName);

    /// Handle passed to the `set_headers` callback.
    fn response_headers_mut(&mut self) -> &mut HeaderMap;

    fn redirect(&mut self, location: &str);

    fn set_content_type(&mut self, content_type: &str);

    fn set_body(&mut self, body: StaticBody);
}
