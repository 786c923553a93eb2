//! `reqrun` is the execution layer of an HTTP request library: it performs
//! the HTTP exchange through a pluggable [`Transport`], reads response
//! bodies through a shared [`BufferPool`], classifies outcomes, and drives a
//! per-request [`RetryPolicy`] until the request succeeds, is fatally
//! rejected, or exhausts its retries.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use http::{HeaderMap, StatusCode};
//! use reqrun::prelude::{
//!     BackoffRetryPolicy, NetworkExecutor, RawResponse, Request, Transport, TransportError,
//! };
//!
//! struct EchoTransport;
//!
//! impl Transport for EchoTransport {
//!     fn execute_request(
//!         &self,
//!         request: &Request,
//!         _additional_headers: &HeaderMap,
//!     ) -> Result<RawResponse, TransportError> {
//!         let body = request.url().as_bytes().to_vec();
//!         let length = body.len();
//!         Ok(RawResponse::new(StatusCode::OK, Vec::new())
//!             .with_body(Box::new(std::io::Cursor::new(body)), Some(length)))
//!     }
//! }
//!
//! let executor = NetworkExecutor::new(Arc::new(EchoTransport));
//! let mut request = Request::new("https://api.example.com/v1/items")
//!     .retry_policy(BackoffRetryPolicy::new().max_retries(2))
//!     .retry_server_errors(true);
//!
//! let response = executor.execute(&mut request).expect("request succeeds");
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.body().as_ref(), b"https://api.example.com/v1/items");
//! ```
//!
//! # Boundaries
//!
//! The raw socket/TLS exchange, the dispatcher that schedules requests onto
//! workers, and any response cache are external collaborators. This crate
//! only passes a 304 through as a `not_modified` response; merging it with a
//! cached entry is the cache layer's job.

mod body;
mod error;
mod executor;
mod headers;
mod pool;
mod request;
mod response;
mod retry;
mod transport;

pub use crate::body::BodyReader;
pub use crate::error::{ExecutionError, ExecutionErrorKind, TransportError};
pub use crate::executor::NetworkExecutor;
pub use crate::headers::{
    header_value, parse_charset, to_header_list, to_header_map, Header, DEFAULT_CONTENT_CHARSET,
};
pub use crate::pool::{BufferPool, DEFAULT_POOL_BUDGET};
pub use crate::request::Request;
pub use crate::response::NetworkResponse;
pub use crate::retry::{BackoffRetryPolicy, RetryPolicy};
pub use crate::transport::{RawResponse, Transport};

pub type ReqrunResult<T> = std::result::Result<T, ExecutionError>;

pub mod prelude {
    pub use crate::{
        BackoffRetryPolicy, BufferPool, ExecutionError, ExecutionErrorKind, Header,
        NetworkExecutor, NetworkResponse, RawResponse, ReqrunResult, Request, RetryPolicy,
        Transport, TransportError,
    };
}
