use thiserror::Error;

use crate::response::NetworkResponse;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Stable machine-readable tags for the execution failure taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExecutionErrorKind {
    Transport,
    Timeout,
    Auth,
    Client,
    Server,
    UnexpectedStatus,
    MalformedUrl,
}

impl ExecutionErrorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Timeout => "timeout",
            Self::Auth => "auth",
            Self::Client => "client",
            Self::Server => "server",
            Self::UnexpectedStatus => "unexpected_status",
            Self::MalformedUrl => "malformed_url",
        }
    }
}

impl std::fmt::Display for ExecutionErrorKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Terminal (or retry-candidate) outcome of executing a request.
///
/// Status-classified variants carry the [`NetworkResponse`] snapshot that was
/// assembled before the failure was raised, so retry policies and callers can
/// inspect a server-provided error payload. Pure transport failures carry no
/// snapshot because no response was ever obtained.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExecutionError {
    #[error("transport failure for {url}")]
    Transport {
        url: String,
        #[source]
        source: Option<BoxError>,
    },
    #[error("transport timed out for {url}")]
    Timeout { url: String },
    #[error("authentication failure {status} for {url}", status = .response.status())]
    Auth { url: String, response: NetworkResponse },
    #[error("client error {status} for {url}", status = .response.status())]
    Client { url: String, response: NetworkResponse },
    #[error("server error {status} for {url}", status = .response.status())]
    Server { url: String, response: NetworkResponse },
    #[error("unexpected status {status} for {url}", status = .response.status())]
    UnexpectedStatus { url: String, response: NetworkResponse },
    #[error("malformed request url {url}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ExecutionError {
    pub const fn kind(&self) -> ExecutionErrorKind {
        match self {
            Self::Transport { .. } => ExecutionErrorKind::Transport,
            Self::Timeout { .. } => ExecutionErrorKind::Timeout,
            Self::Auth { .. } => ExecutionErrorKind::Auth,
            Self::Client { .. } => ExecutionErrorKind::Client,
            Self::Server { .. } => ExecutionErrorKind::Server,
            Self::UnexpectedStatus { .. } => ExecutionErrorKind::UnexpectedStatus,
            Self::MalformedUrl { .. } => ExecutionErrorKind::MalformedUrl,
        }
    }

    /// The response snapshot obtained before this error was raised, if any.
    pub const fn response(&self) -> Option<&NetworkResponse> {
        match self {
            Self::Auth { response, .. }
            | Self::Client { response, .. }
            | Self::Server { response, .. }
            | Self::UnexpectedStatus { response, .. } => Some(response),
            Self::Transport { .. } | Self::Timeout { .. } | Self::MalformedUrl { .. } => None,
        }
    }

    /// Whether this failure may be handed to a retry policy.
    ///
    /// Server errors are additionally gated on the request's
    /// retry-server-errors flag; the executor applies that gate.
    pub const fn is_retry_candidate(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Auth { .. } | Self::Server { .. }
        )
    }
}

/// Failure reported by a [`Transport`](crate::Transport) when no usable
/// response was produced.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("socket timed out")]
    Timeout,
    #[error("malformed url {url}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("i/o failure")]
    Io {
        #[source]
        source: std::io::Error,
    },
}
