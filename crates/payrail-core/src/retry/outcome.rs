//! Per-attempt outcome, classified before the retry decision is made.

use super::classify::{classify_response, classify_transport, FailureCause};
use super::policy::ErrorKind;
use crate::error::ApiError;
use crate::transport::{HttpResponse, TransportError};

/// Result of one transport attempt. Lives only inside one executor call.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(HttpResponse),
    Failure(AttemptFailure),
}

impl AttemptOutcome {
    /// Classify the raw result of a transport call.
    pub fn from_result(result: Result<HttpResponse, TransportError>) -> Self {
        match result {
            Ok(response) if response.is_success() => AttemptOutcome::Success(response),
            Ok(response) => AttemptOutcome::Failure(classify_response(&response)),
            Err(e) => AttemptOutcome::Failure(classify_transport(e)),
        }
    }
}

/// A classified failed attempt.
#[derive(Debug)]
pub struct AttemptFailure {
    pub kind: ErrorKind,
    /// HTTP status, when a response was received.
    pub status: Option<u16>,
    /// Sanitized, safe to show to users.
    pub message: String,
    pub cause: FailureCause,
    pub source: Option<TransportError>,
}

impl AttemptFailure {
    /// Terminal error for a call that made `attempts` attempts.
    pub fn into_error(self, attempts: u32) -> ApiError {
        ApiError::Api {
            kind: self.kind,
            status: self.status,
            message: self.message,
            attempts,
            source: self.source,
        }
    }
}
