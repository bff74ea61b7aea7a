//! Terminal error of a service call.

use thiserror::Error;

use crate::retry::ErrorKind;
use crate::transport::TransportError;

/// Why a service call failed.
///
/// `Api` covers every failed HTTP exchange after retries; the other variants
/// never reach the network or fail after a successful response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status, or the request never
    /// produced a response.
    #[error("{kind} after {attempts} attempt(s): {message}")]
    Api {
        kind: ErrorKind,
        status: Option<u16>,
        /// Sanitized; never echoes request data.
        message: String,
        attempts: u32,
        #[source]
        source: Option<TransportError>,
    },
    /// A success response whose body could not be decoded into `target`.
    /// Never retried.
    #[error("cannot decode response as {target}: {source}")]
    Decode {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },
    /// The request payload could not be serialized.
    #[error("cannot encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    /// The call was rejected before it was sent (missing path parameter, bad URL).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The caller's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Kind of an `Api` failure; `None` for every other variant.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => *status,
            _ => None,
        }
    }

    /// Attempts made before giving up (0 when nothing was sent).
    pub fn attempts(&self) -> u32 {
        match self {
            ApiError::Api { attempts, .. } => *attempts,
            _ => 0,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ApiError::Api {
                kind: ErrorKind::NotFound,
                ..
            }
        )
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn api(kind: ErrorKind, status: Option<u16>) -> ApiError {
        ApiError::Api {
            kind,
            status,
            message: "nope".to_string(),
            attempts: 2,
            source: None,
        }
    }

    #[test]
    fn accessors() {
        let e = api(ErrorKind::NotFound, Some(404));
        assert!(e.is_not_found());
        assert_eq!(e.kind(), Some(ErrorKind::NotFound));
        assert_eq!(e.status(), Some(404));
        assert_eq!(e.attempts(), 2);
        assert!(!ApiError::Cancelled.is_not_found());
        assert_eq!(ApiError::Cancelled.attempts(), 0);
        assert!(ApiError::Cancelled.is_cancelled());
    }

    #[test]
    fn display_includes_kind_and_attempts() {
        let e = api(
            ErrorKind::RateLimited {
                retry_after: Duration::from_secs(15),
            },
            Some(429),
        );
        assert_eq!(
            e.to_string(),
            "rate limited (retry after 15s) after 2 attempt(s): nope"
        );
    }
}
