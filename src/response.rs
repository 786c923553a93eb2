use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use crate::headers::{self, Header, DEFAULT_CONTENT_CHARSET};

/// Normalized successful (or cache-valid) outcome of executing a request.
///
/// The body is never absent; a zero-length body represents "no content"
/// (e.g. HTTP 204). `elapsed` covers the entire retry sequence, not just the
/// final attempt. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct NetworkResponse {
    status: StatusCode,
    body: Bytes,
    not_modified: bool,
    elapsed: Duration,
    headers: Vec<Header>,
}

impl NetworkResponse {
    pub fn new(
        status: StatusCode,
        body: Bytes,
        not_modified: bool,
        elapsed: Duration,
        headers: Vec<Header>,
    ) -> Self {
        Self {
            status,
            body,
            not_modified,
            elapsed,
            headers,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// True when the server answered 304 Not Modified; merging against a
    /// cached entry is the caller's concern.
    pub fn not_modified(&self) -> bool {
        self.not_modified
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Case-insensitive header lookup; later duplicates win.
    pub fn header(&self, name: &str) -> Option<&str> {
        headers::header_value(&self.headers, name)
    }

    /// The header sequence reduced to a lookup map, later entries overriding
    /// earlier ones.
    pub fn header_map(&self) -> HeaderMap {
        headers::to_header_map(&self.headers)
    }

    /// Charset declared by the Content-Type header, defaulting to the HTTP
    /// default ISO-8859-1.
    pub fn charset(&self) -> String {
        headers::parse_charset(&self.headers, DEFAULT_CONTENT_CHARSET)
    }

    /// Decodes the body as text using the declared charset.
    ///
    /// ISO-8859-1 is decoded exactly; anything else is treated as UTF-8 with
    /// lossy replacement.
    pub fn text(&self) -> String {
        let charset = self.charset();
        if charset.eq_ignore_ascii_case(DEFAULT_CONTENT_CHARSET)
            || charset.eq_ignore_ascii_case("latin1")
        {
            return self.body.iter().map(|&byte| byte as char).collect();
        }
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T>(&self) -> Result<T, serde_json::Error>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice(&self.body)
    }
}
