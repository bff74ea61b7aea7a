//! HTTP transport seam.
//!
//! The executor only sees `Transport`; production code uses the libcurl-backed
//! `CurlTransport`, tests substitute scripted transports. Implementations must
//! be safe to share across concurrent calls.

mod curl_transport;
mod error;
mod parse;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

pub use curl_transport::{CurlTransport, HEADER_CUSTOMER_AUTH, HEADER_ON_BEHALF_OF};
pub use error::{TransportError, TransportFailure};
pub use parse::parse_headers;

/// HTTP method of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// A fully built request: absolute URL plus optional JSON body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub body: Option<Vec<u8>>,
}

/// Raw response as received; the status is not interpreted here.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    /// Headers of the final response, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header with this name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Issues one HTTP request. No retries, no status interpretation.
///
/// When `cancel` fires the implementation should stop the in-flight request and
/// return a `TransportFailure::Cancelled` error. Callers do not rely on this:
/// the retry loop drops the `send` future as soon as the token fires, so
/// implementations must also release the request when dropped.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError>;
}
