//! libcurl-backed transport.
//!
//! Each request runs on its own `Easy` handle inside `spawn_blocking`.
//! Cancellation, or dropping the `send` future, sets an abort flag that the
//! progress callback reads, which makes libcurl stop the transfer.

use async_trait::async_trait;
use std::fmt;
use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::parse::parse_headers;
use super::{HttpRequest, HttpResponse, Method, Transport, TransportError, TransportFailure};
use crate::config::ClientConfig;

/// Sent when the client acts for a sub-merchant.
pub const HEADER_ON_BEHALF_OF: &str = "X-ON-BEHALF-OF";
/// Sent when the call carries customer authorization.
pub const HEADER_CUSTOMER_AUTH: &str = "X-CUSTOMER-AUTH";

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
struct Settings {
    username: String,
    password: String,
    /// Extra header lines ("Name: value").
    headers: Vec<String>,
    connect_timeout: Duration,
    request_timeout: Duration,
}

/// HTTPS transport with Basic authentication.
#[derive(Clone)]
pub struct CurlTransport {
    settings: Arc<Settings>,
}

impl fmt::Debug for CurlTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurlTransport")
            .field("username", &self.settings.username)
            .field("connect_timeout", &self.settings.connect_timeout)
            .field("request_timeout", &self.settings.request_timeout)
            .finish_non_exhaustive()
    }
}

impl CurlTransport {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            settings: Arc::new(Settings {
                username: username.into(),
                password: password.into(),
                headers: Vec::new(),
                connect_timeout: DEFAULT_CONNECT_TIMEOUT,
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
            }),
        }
    }

    /// Credentials, optional delegation headers and timeouts from config.
    pub fn from_config(cfg: &ClientConfig) -> Self {
        let mut transport = Self::new(&cfg.username, &cfg.password).with_timeouts(
            Duration::from_secs(cfg.connect_timeout_secs),
            Duration::from_secs(cfg.request_timeout_secs),
        );
        if let Some(v) = cfg.on_behalf_of.as_deref().filter(|v| !v.is_empty()) {
            transport = transport.with_header(HEADER_ON_BEHALF_OF, v);
        }
        if let Some(v) = cfg.customer_auth.as_deref().filter(|v| !v.is_empty()) {
            transport = transport.with_header(HEADER_CUSTOMER_AUTH, v);
        }
        transport
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        Arc::make_mut(&mut self.settings)
            .headers
            .push(format!("{}: {}", name.trim(), value.trim()));
        self
    }

    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        let settings = Arc::make_mut(&mut self.settings);
        settings.connect_timeout = connect;
        settings.request_timeout = request;
        self
    }
}

#[async_trait]
impl Transport for CurlTransport {
    async fn send(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        let abort = AbortOnDrop(Arc::new(AtomicBool::new(false)));
        let task = tokio::task::spawn_blocking({
            let settings = Arc::clone(&self.settings);
            let request = request.clone();
            let abort = Arc::clone(&abort.0);
            move || perform(&settings, &request, &abort)
        });

        tokio::select! {
            joined = task => match joined {
                Ok(result) => result,
                Err(e) => Err(TransportError::new(
                    TransportFailure::Other,
                    format!("transfer task failed: {}", e),
                )),
            },
            _ = cancel.cancelled() => Err(TransportError::cancelled()),
        }
    }
}

/// Raises the abort flag when the `send` future is dropped.
struct AbortOnDrop(Arc<AtomicBool>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Runs one request on the current thread.
fn perform(
    settings: &Settings,
    request: &HttpRequest,
    abort: &AtomicBool,
) -> Result<HttpResponse, TransportError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(request.url.as_str())?;
    easy.connect_timeout(settings.connect_timeout)?;
    easy.timeout(settings.request_timeout)?;

    easy.username(&settings.username)?;
    easy.password(&settings.password)?;
    let mut auth = curl::easy::Auth::new();
    auth.basic(true);
    easy.http_auth(&auth)?;

    match request.method {
        Method::Get => easy.get(true)?,
        Method::Post => easy.post(true)?,
        other => easy.custom_request(other.as_str())?,
    }
    match &request.body {
        Some(body) => easy.post_fields_copy(body)?,
        None if request.method == Method::Post => easy.post_field_size(0)?,
        None => {}
    }

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    if request.body.is_some() {
        list.append("Content-Type: application/json")?;
    }
    for line in &settings.headers {
        list.append(line)?;
    }
    easy.http_headers(list)?;
    easy.progress(true)?;

    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        // Returning false aborts the transfer.
        transfer.progress_function(|_, _, _, _| !abort.load(Ordering::Relaxed))?;
        if let Err(e) = transfer.perform() {
            if abort.load(Ordering::Relaxed) {
                return Err(TransportError::cancelled());
            }
            return Err(e.into());
        }
    }

    let status = easy.response_code()? as u16;
    tracing::debug!(
        method = request.method.as_str(),
        path = request.url.path(),
        status,
        "response received"
    );
    Ok(HttpResponse {
        status,
        headers: parse_headers(&header_lines),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delegation_headers_only_when_configured() {
        let mut cfg = ClientConfig::default();
        cfg.on_behalf_of = Some("sub-merchant-7".to_string());
        cfg.customer_auth = Some(String::new());
        let t = CurlTransport::from_config(&cfg);
        assert_eq!(t.settings.headers, vec!["X-ON-BEHALF-OF: sub-merchant-7".to_string()]);
    }

    #[test]
    fn timeouts_from_config() {
        let mut cfg = ClientConfig::default();
        cfg.connect_timeout_secs = 3;
        cfg.request_timeout_secs = 9;
        let t = CurlTransport::from_config(&cfg);
        assert_eq!(t.settings.connect_timeout, Duration::from_secs(3));
        assert_eq!(t.settings.request_timeout, Duration::from_secs(9));
    }

    #[test]
    fn debug_omits_password() {
        let t = CurlTransport::new("merchant", "s3cret");
        let out = format!("{:?}", t);
        assert!(out.contains("merchant"));
        assert!(!out.contains("s3cret"));
    }
}
