//! Single-level endpoint fallback on `NotFound`.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::executor::{Call, RequestExecutor};

/// A current endpoint and the legacy path that serves the same call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPair {
    pub primary: &'static str,
    pub fallback: &'static str,
}

impl EndpointPair {
    pub const fn new(primary: &'static str, fallback: &'static str) -> Self {
        Self { primary, fallback }
    }
}

/// Routes a call to the primary path, then once to the fallback path if and
/// only if the primary ends in `NotFound`.
#[derive(Clone)]
pub struct FallbackRouter {
    executor: Arc<RequestExecutor>,
}

impl FallbackRouter {
    pub fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Both legs get the full retry policy and the same serialized call. A
    /// `NotFound` from the fallback is returned as is.
    pub async fn call<T>(
        &self,
        pair: EndpointPair,
        call: &Call,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        match self.executor.execute(pair.primary, call, cancel).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(
                    primary = pair.primary,
                    fallback = pair.fallback,
                    "primary endpoint not found, using fallback"
                );
                self.executor.execute(pair.fallback, call, cancel).await
            }
            other => other,
        }
    }
}
