use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use tracing::{debug, warn};

use crate::body::BodyReader;
use crate::error::{ExecutionError, TransportError};
use crate::pool::BufferPool;
use crate::request::Request;
use crate::response::NetworkResponse;
use crate::transport::Transport;

/// The network execution control loop.
///
/// One `execute` call performs transport attempts until the request
/// succeeds, fails terminally, or its retry policy signals exhaustion. The
/// executor holds no per-request state, so independent requests may be
/// executed concurrently from a worker pool; all of them share the one
/// [`BufferPool`].
pub struct NetworkExecutor {
    transport: Arc<dyn Transport>,
    pool: Arc<BufferPool>,
}

impl NetworkExecutor {
    /// Builds an executor with a default-sized buffer pool.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_pool(transport, Arc::new(BufferPool::default()))
    }

    pub fn with_pool(transport: Arc<dyn Transport>, pool: Arc<BufferPool>) -> Self {
        Self { transport, pool }
    }

    pub fn buffer_pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    /// Executes `request` to completion.
    ///
    /// Elapsed time on the returned response covers every attempt of the
    /// retry sequence, measured from one start instant taken before the
    /// first attempt. On retry exhaustion the policy's error is propagated
    /// unchanged so callers can distinguish the root cause.
    pub fn execute(&self, request: &mut Request) -> Result<NetworkResponse, ExecutionError> {
        let started = Instant::now();
        // Reserved for a collaborating cache layer's conditional headers.
        let additional_headers = HeaderMap::new();

        loop {
            let raw = match self.transport.execute_request(request, &additional_headers) {
                Ok(raw) => raw,
                Err(TransportError::Timeout) => {
                    let error = ExecutionError::Timeout {
                        url: request.url().to_owned(),
                    };
                    self.attempt_retry(request, error)?;
                    continue;
                }
                Err(TransportError::MalformedUrl { url, source }) => {
                    // Caller bug, never a transport condition.
                    return Err(ExecutionError::MalformedUrl { url, source });
                }
                Err(TransportError::Io { source }) => {
                    let error = ExecutionError::Transport {
                        url: request.url().to_owned(),
                        source: Some(Box::new(source)),
                    };
                    self.attempt_retry(request, error)?;
                    continue;
                }
            };

            let (status, headers, body_stream, content_length) = raw.into_parts();

            if status == StatusCode::NOT_MODIFIED {
                // Cache validation: never read a 304 body; the stream is
                // dropped unread. Merging with the cached entry is the
                // caller's cache layer's job.
                return Ok(NetworkResponse::new(
                    status,
                    Bytes::new(),
                    true,
                    started.elapsed(),
                    headers,
                ));
            }

            let body = match BodyReader::new(&self.pool).drain(body_stream, content_length) {
                Ok(body) => body,
                Err(source) => {
                    // The response became unusable mid-body; retry as a
                    // transport failure with no snapshot attached.
                    warn!(
                        url = request.url(),
                        status = status.as_u16(),
                        error = %source,
                        "failed to drain response body"
                    );
                    let error = ExecutionError::Transport {
                        url: request.url().to_owned(),
                        source: Some(Box::new(source)),
                    };
                    self.attempt_retry(request, error)?;
                    continue;
                }
            };

            if status.is_success() {
                return Ok(NetworkResponse::new(
                    status,
                    body,
                    false,
                    started.elapsed(),
                    headers,
                ));
            }

            // Non-2xx: classify with the drained body retained so the policy
            // and caller can inspect the server's error payload.
            let response =
                NetworkResponse::new(status, body, false, started.elapsed(), headers);
            let url = request.url().to_owned();
            match status.as_u16() {
                401 | 403 => {
                    self.attempt_retry(request, ExecutionError::Auth { url, response })?;
                }
                400..=499 => {
                    return Err(ExecutionError::Client { url, response });
                }
                500..=599 => {
                    let error = ExecutionError::Server { url, response };
                    if request.should_retry_server_errors() {
                        self.attempt_retry(request, error)?;
                    } else {
                        return Err(error);
                    }
                }
                _ => {
                    // 3xx and friends: no reason to retry.
                    return Err(ExecutionError::UnexpectedStatus { url, response });
                }
            }
        }
    }

    /// Consults the request's retry policy; `Err` ends the loop with the
    /// policy's error propagated unchanged.
    fn attempt_retry(
        &self,
        request: &mut Request,
        error: ExecutionError,
    ) -> Result<(), ExecutionError> {
        let retries = request.retry_policy_mut().current_retry_count();
        debug!(
            url = request.url(),
            kind = error.kind().as_str(),
            retries,
            "consulting retry policy"
        );
        request.retry_policy_mut().retry(error)
    }
}

impl std::fmt::Debug for NetworkExecutor {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("NetworkExecutor")
            .field("pool", &self.pool)
            .finish()
    }
}
