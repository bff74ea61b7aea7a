//! Resilient client for a payment-processing API.
//!
//! Every service call goes through one `RequestExecutor`: a bounded retry loop
//! with configurable backoff, failure classification into `ErrorKind`, optional
//! single-level endpoint fallback on `NotFound`, and tolerant decoding of
//! numbers-as-strings and mixed date formats.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod executor;
pub mod fallback;
pub mod logging;
pub mod retry;
pub mod services;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::ApiClient;
pub use error::ApiError;
pub use tokio_util::sync::CancellationToken;
