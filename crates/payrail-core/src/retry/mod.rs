//! Retry and backoff policy.
//!
//! This module encapsulates failure classification (status codes, transport
//! failures, safe error messages) and backoff decisions so that every service
//! call shares one consistent policy.

mod classify;
mod outcome;
mod policy;
mod run;

pub use classify::{
    classify_response, classify_status, classify_transport, extract_message, parse_retry_after,
    sanitize_message, FailureCause, DEFAULT_RETRY_AFTER,
};
pub use outcome::{AttemptFailure, AttemptOutcome};
pub use policy::{
    BackoffStrategy, ErrorKind, RetryDecision, RetryPolicy, DEFAULT_RETRYABLE_STATUS_CODES,
};
pub use run::run_with_retry;
