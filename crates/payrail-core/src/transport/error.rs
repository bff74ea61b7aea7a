//! Transport failure type and curl error classification.

use std::fmt;
use thiserror::Error;

/// Failure class of a request that produced no HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    /// Connect or transfer timed out.
    Timeout,
    /// Connection refused, reset, or closed without a response.
    Connection,
    /// Host (or proxy) name could not be resolved.
    Dns,
    /// Stopped by the caller's cancellation token.
    Cancelled,
    /// Anything else (TLS setup, invalid URL, ...). Not retried.
    Other,
}

impl TransportFailure {
    /// Fixed allow-list of transport failures that may be retried.
    pub fn is_retry_eligible(self) -> bool {
        matches!(
            self,
            TransportFailure::Timeout | TransportFailure::Connection | TransportFailure::Dns
        )
    }

    /// Classify a curl error.
    pub fn from_curl(e: &curl::Error) -> Self {
        if e.is_operation_timedout() {
            return TransportFailure::Timeout;
        }
        if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
            return TransportFailure::Dns;
        }
        if e.is_couldnt_connect()
            || e.is_read_error()
            || e.is_recv_error()
            || e.is_send_error()
            || e.is_got_nothing()
            || e.is_partial_file()
        {
            return TransportFailure::Connection;
        }
        if e.is_aborted_by_callback() {
            return TransportFailure::Cancelled;
        }
        TransportFailure::Other
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::Connection => write!(f, "connection failure"),
            TransportFailure::Dns => write!(f, "name resolution failure"),
            TransportFailure::Cancelled => write!(f, "cancelled"),
            TransportFailure::Other => write!(f, "transport failure"),
        }
    }
}

/// Error returned by a `Transport` when no HTTP response was obtained.
#[derive(Debug, Error)]
#[error("{failure}: {message}")]
pub struct TransportError {
    pub failure: TransportFailure,
    pub message: String,
    #[source]
    source: Option<curl::Error>,
}

impl TransportError {
    pub fn new(failure: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            failure,
            message: message.into(),
            source: None,
        }
    }

    pub fn cancelled() -> Self {
        Self::new(TransportFailure::Cancelled, "request cancelled")
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        Self {
            failure: TransportFailure::from_curl(&e),
            message: e.description().to_string(),
            source: Some(e),
        }
    }
}
