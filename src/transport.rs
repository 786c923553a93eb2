use std::io::Read;

use http::{HeaderMap, StatusCode};

use crate::error::TransportError;
use crate::headers::Header;
use crate::request::Request;

/// The collaborator performing the actual socket/TLS exchange for one
/// request attempt.
///
/// A GET exchange is performed when the request carries no body and a
/// POST-like exchange otherwise, with the Content-Type taken from the
/// request. `additional_headers` are sent alongside the request's own
/// headers; the executor currently passes an empty map.
pub trait Transport: Send + Sync {
    fn execute_request(
        &self,
        request: &Request,
        additional_headers: &HeaderMap,
    ) -> Result<RawResponse, TransportError>;
}

/// Raw outcome of one transport exchange: the status line, the ordered
/// header sequence, and an optional body stream with its declared length.
pub struct RawResponse {
    status: StatusCode,
    headers: Vec<Header>,
    body: Option<Box<dyn Read + Send>>,
    content_length: Option<usize>,
}

impl RawResponse {
    pub fn new(status: StatusCode, headers: Vec<Header>) -> Self {
        Self {
            status,
            headers,
            body: None,
            content_length: None,
        }
    }

    /// Attaches the response body stream and the declared content length, if
    /// the transport knows it.
    pub fn with_body(
        mut self,
        body: Box<dyn Read + Send>,
        content_length: Option<usize>,
    ) -> Self {
        self.body = Some(body);
        self.content_length = content_length;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        StatusCode,
        Vec<Header>,
        Option<Box<dyn Read + Send>>,
        Option<usize>,
    ) {
        (self.status, self.headers, self.body, self.content_length)
    }
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("has_body", &self.body.is_some())
            .field("content_length", &self.content_length)
            .finish()
    }
}
