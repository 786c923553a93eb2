use bytes::Bytes;
use http::Method;

use crate::headers::Header;
use crate::retry::{BackoffRetryPolicy, RetryPolicy};

/// One request to execute.
///
/// The execution core reads only the target URL, the optional body and its
/// content type, the retry-server-errors flag, and the owned retry policy;
/// everything else is the transport's business. The method is implied by the
/// body: no body means GET, a body means POST.
pub struct Request {
    url: String,
    body: Option<Bytes>,
    body_content_type: Option<String>,
    headers: Vec<Header>,
    retry_policy: Box<dyn RetryPolicy>,
    retry_server_errors: bool,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: None,
            body_content_type: None,
            headers: Vec::new(),
            retry_policy: Box::new(BackoffRetryPolicy::new()),
            retry_server_errors: false,
        }
    }

    /// Attaches a request body, turning this into a POST-like request.
    pub fn body(mut self, body: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.body_content_type = Some(content_type.into());
        self
    }

    /// Adds an extra request header for the transport to send.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn retry_policy(mut self, retry_policy: impl RetryPolicy + 'static) -> Self {
        self.retry_policy = Box::new(retry_policy);
        self
    }

    /// Whether 5xx responses should be retried through the policy instead of
    /// failing immediately.
    pub fn retry_server_errors(mut self, retry: bool) -> Self {
        self.retry_server_errors = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> Method {
        if self.body.is_some() {
            Method::POST
        } else {
            Method::GET
        }
    }

    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn body_content_type(&self) -> Option<&str> {
        self.body_content_type.as_deref()
    }

    pub fn headers(&self) -> &[Header] {
        &self.headers
    }

    pub fn should_retry_server_errors(&self) -> bool {
        self.retry_server_errors
    }

    pub(crate) fn retry_policy_mut(&mut self) -> &mut dyn RetryPolicy {
        self.retry_policy.as_mut()
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Request")
            .field("url", &self.url)
            .field("method", &self.method())
            .field("body_len", &self.body.as_ref().map(Bytes::len))
            .field("body_content_type", &self.body_content_type)
            .field("headers", &self.headers)
            .field("retry_server_errors", &self.retry_server_errors)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::Request;
    use http::Method;

    #[test]
    fn method_is_implied_by_body_presence() {
        let get = Request::new("https://api.example.com/v1/items");
        assert_eq!(get.method(), Method::GET);

        let post = Request::new("https://api.example.com/v1/items")
            .body(&b"{\"name\":\"demo\"}"[..], "application/json");
        assert_eq!(post.method(), Method::POST);
        assert_eq!(post.body_content_type(), Some("application/json"));
    }
}
