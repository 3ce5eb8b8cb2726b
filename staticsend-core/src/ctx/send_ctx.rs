use crate::ctx::{RequestContext, preferred_encoding};
use crate::static_files::StaticBody;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};

/// In-memory request/response pair.
///
/// Holds the request URL and headers plus whatever the sender writes back:
/// status, headers and body.
#[derive(Debug)]
pub struct SendCtx {
    url: String,
    request_headers: HeaderMap,

    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: StaticBody,
}

impl SendCtx {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_headers: HeaderMap::new(),
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: StaticBody::Empty,
        }
    }

    /// Adds a request header. Invalid values are ignored.
    pub fn with_request_header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.request_headers.append(name, value);
        }
        self
    }

    pub fn with_accept_encoding(self, value: &str) -> Self {
        self.with_request_header(header::ACCEPT_ENCODING, value)
    }

    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    /// URL path without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or("")
    }

    /// Response header as a string, if present and visible ASCII.
    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.header_str(&header::LOCATION)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header_str(&header::CONTENT_TYPE)
    }
}

impl RequestContext for SendCtx {
    fn url(&self) -> &str {
        &self.url
    }

    fn accepts_encodings<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        let accept_encoding = self
            .request_headers
            .get_all(header::ACCEPT_ENCODING)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>();

        if accept_encoding.is_empty() {
            return preferred_encoding(None, candidates);
        }

        preferred_encoding(Some(accept_encoding.join(",").as_str()), candidates)
    }

    fn response_header(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    fn set_response_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    fn remove_response_header(&mut self, name: &HeaderName) {
        self.headers.remove(name);
    }

    fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn redirect(&mut self, location: &str) {
        match HeaderValue::from_str(location) {
            Ok(value) => {
                self.headers.insert(header::LOCATION, value);
                self.status = StatusCode::FOUND;
            }
            Err(e) => {
                tracing::warn!(error = %e, location, "refusing to redirect to invalid location");
            }
        }
    }

    fn set_content_type(&mut self, content_type: &str) {
        match HeaderValue::from_str(content_type) {
            Ok(value) => {
                self.headers.insert(header::CONTENT_TYPE, value);
            }
            Err(_) => {
                self.headers.remove(header::CONTENT_TYPE);
            }
        }
    }

    fn set_body(&mut self, body: StaticBody) {
        self.status = StatusCode::OK;
        self.body = body;
    }
}
