//! Retry loop: run an attempt until success, a terminal failure, or cancellation.

use std::future::Future;
use tokio_util::sync::CancellationToken;

use super::outcome::AttemptOutcome;
use super::policy::{RetryDecision, RetryPolicy};
use crate::error::ApiError;
use crate::transport::{HttpResponse, TransportError, TransportFailure};

/// Runs `attempt` until it returns a success status or the policy says stop.
///
/// On a retryable failure, waits for the backoff delay then tries again. The
/// wait and the attempt itself are abandoned as soon as `cancel` fires, and the
/// call reports `ApiError::Cancelled` rather than the last failure.
pub async fn run_with_retry<F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut attempt: F,
) -> Result<HttpResponse, ApiError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<HttpResponse, TransportError>>,
{
    let mut made = 0u32;
    loop {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        made += 1;
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            result = attempt() => result,
        };
        if cancel.is_cancelled()
            || matches!(&result, Err(e) if e.failure == TransportFailure::Cancelled)
        {
            return Err(ApiError::Cancelled);
        }

        let failure = match AttemptOutcome::from_result(result) {
            AttemptOutcome::Success(response) => {
                if made > 1 {
                    tracing::info!(attempts = made, "request succeeded after retry");
                }
                return Ok(response);
            }
            AttemptOutcome::Failure(failure) => failure,
        };

        tracing::warn!(
            attempt = made,
            kind = %failure.kind,
            status = ?failure.status,
            "request attempt failed"
        );

        match policy.decide(made, failure.kind, failure.cause) {
            RetryDecision::NoRetry => return Err(failure.into_error(made)),
            RetryDecision::RetryAfter(delay) => {
                tracing::debug!(
                    attempt = made,
                    delay = ?delay,
                    "backing off before retry"
                );
                tokio::select! {
                    _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
            }
        }
    }
}
