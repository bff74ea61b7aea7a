//! Request executor: build the URL, run the retry loop, decode the body.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::ApiError;
use crate::retry::{run_with_retry, RetryPolicy};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

/// One logical call, minus its path: method, path parameters, query string
/// and an already serialized body.
///
/// The body is serialized once, so retries and fallback resend identical bytes.
#[derive(Debug, Clone)]
pub struct Call {
    method: Method,
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl Call {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            params: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Value for a `{name}` placeholder in the path template.
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds the pair only when `value` is present.
    pub fn query_opt<V: ToString>(self, name: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Serialize `payload` as the JSON body.
    pub fn json<P: Serialize + ?Sized>(mut self, payload: &P) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_vec(payload).map_err(ApiError::Encode)?);
        Ok(self)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Runs calls against one API base URL with one retry policy.
///
/// Holds no per-call state; share it behind an `Arc` across concurrent calls.
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    base_url: Url,
    policy: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>, base_url: Url, policy: RetryPolicy) -> Self {
        Self {
            transport,
            base_url,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a path template such as `payments/{id}/refunds` against the
    /// base URL. Placeholder values are percent-encoded as single segments.
    pub fn build_url(&self, path: &str, call: &Call) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ApiError::InvalidRequest(format!("base URL cannot have a path: {}", self.base_url))
            })?;
            segments.pop_if_empty();
            for segment in path.split('/').filter(|s| !s.is_empty()) {
                match placeholder(segment) {
                    Some(name) => {
                        let value = call.param_value(name).ok_or_else(|| {
                            ApiError::InvalidRequest(format!(
                                "missing path parameter {{{}}} for {}",
                                name, path
                            ))
                        })?;
                        if value.is_empty() {
                            return Err(ApiError::InvalidRequest(format!(
                                "empty path parameter {{{}}} for {}",
                                name, path
                            )));
                        }
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }
        if !call.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in &call.query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Execute `call` against `path` with retries, decoding a success body
    /// into `T`. An empty body or 204 yields `T::default()`.
    pub async fn execute<T>(
        &self,
        path: &str,
        call: &Call,
        cancel: &CancellationToken,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let request = HttpRequest {
            method: call.method,
            url: self.build_url(path, call)?,
            body: call.body.clone(),
        };
        tracing::debug!(method = call.method.as_str(), path, "executing call");

        let transport: &dyn Transport = self.transport.as_ref();
        let request = &request;
        let response =
            run_with_retry(&self.policy, cancel, move || transport.send(request, cancel)).await?;
        decode_body(&response)
    }
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

fn trim_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Decode a success body; decode failures are terminal and not retried.
fn decode_body<T: DeserializeOwned + Default>(response: &HttpResponse) -> Result<T, ApiError> {
    let body = trim_whitespace(&response.body);
    if response.status == 204 || body.is_empty() || body == b"null" {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|source| {
        let target = std::any::type_name::<T>();
        tracing::warn!(target_type = target, error = %source, "response body did not decode");
        ApiError::Decode { target, source }
    })
}
