//! Classify HTTP responses and transport failures into retry policy error kinds.

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::time::Duration;

use super::outcome::AttemptFailure;
use super::policy::ErrorKind;
use crate::transport::{HttpResponse, TransportError, TransportFailure};

/// Reported to the caller when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Longest message (in chars) surfaced in an error.
const MAX_MESSAGE_LEN: usize = 300;

/// What the retry allow-lists are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// Non-success HTTP status.
    Status(u16),
    /// The request never produced a response.
    Transport(TransportFailure),
}

/// Classify a non-success HTTP status code.
///
/// 429 gets the default retry-after here; `classify_response` reads the header.
pub fn classify_status(code: u16) -> ErrorKind {
    match code {
        400 => ErrorKind::Validation,
        401 => ErrorKind::Unauthorized,
        403 => ErrorKind::Forbidden,
        404 => ErrorKind::NotFound,
        408 => ErrorKind::Transport,
        429 => ErrorKind::RateLimited {
            retry_after: DEFAULT_RETRY_AFTER,
        },
        500..=599 => ErrorKind::ServerError,
        _ => ErrorKind::Unknown,
    }
}

/// Classify a non-success response, extracting a safe message from its body.
pub fn classify_response(response: &HttpResponse) -> AttemptFailure {
    let status = response.status;
    let kind = match classify_status(status) {
        ErrorKind::RateLimited { .. } => ErrorKind::RateLimited {
            retry_after: response
                .header("retry-after")
                .and_then(|v| parse_retry_after(v, Utc::now()))
                .unwrap_or(DEFAULT_RETRY_AFTER),
        },
        kind => kind,
    };
    // 400 bodies often echo the submitted payload; only the `message` field is trusted.
    let message = match kind {
        ErrorKind::Validation => field_message(&response.body, &["message"]),
        _ => extract_message(&response.body),
    }
    .unwrap_or_else(|| fallback_message(kind, status));

    AttemptFailure {
        kind,
        status: Some(status),
        message: sanitize_message(&message),
        cause: FailureCause::Status(status),
        source: None,
    }
}

/// Classify a transport failure. Every transport failure is `ErrorKind::Transport`;
/// the failure class decides retry eligibility.
pub fn classify_transport(error: TransportError) -> AttemptFailure {
    AttemptFailure {
        kind: ErrorKind::Transport,
        status: None,
        message: sanitize_message(&error.to_string()),
        cause: FailureCause::Transport(error.failure),
        source: Some(error),
    }
}

/// Best-effort `message` (or `error`) field from a JSON error body.
///
/// Malformed or non-JSON bodies yield `None`; this never fails.
pub fn extract_message(body: &[u8]) -> Option<String> {
    field_message(body, &["message", "error"])
}

fn field_message(body: &[u8], fields: &[&str]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let object = value.as_object()?;
    fields
        .iter()
        .filter_map(|name| object.get(*name))
        .find_map(|field| match field {
            Value::String(s) => Some(s.as_str()),
            Value::Object(nested) => nested.get("message").and_then(Value::as_str),
            _ => None,
        })
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn fallback_message(kind: ErrorKind, status: u16) -> String {
    match kind {
        ErrorKind::Unauthorized => "authentication failed; check API credentials".to_string(),
        ErrorKind::Forbidden => "access to this resource is forbidden".to_string(),
        ErrorKind::Validation => "request validation failed".to_string(),
        ErrorKind::NotFound => "resource not found".to_string(),
        ErrorKind::RateLimited { .. } => "too many requests".to_string(),
        ErrorKind::ServerError => format!("upstream server error (HTTP {})", status),
        ErrorKind::Transport => format!("upstream request timed out (HTTP {})", status),
        ErrorKind::Unknown => format!("unexpected HTTP status {}", status),
    }
}

/// Mask card-number-like digit runs (13-19 digits, optionally grouped by
/// single spaces or dashes) to their last four digits and bound the message
/// length.
pub fn sanitize_message(message: &str) -> String {
    let chars: Vec<char> = message.chars().collect();
    let mut out = String::with_capacity(message.len());
    let mut i = 0;
    while i < chars.len() {
        if !chars[i].is_ascii_digit() {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let end = digit_run_end(&chars, i);
        push_run(&mut out, &chars[i..end]);
        i = end;
    }

    if out.chars().count() > MAX_MESSAGE_LEN {
        let mut cut: String = out.chars().take(MAX_MESSAGE_LEN).collect();
        cut.push_str("...");
        return cut;
    }
    out
}

/// End of the digit run starting at `start`. A single space or dash between
/// two digits stays inside the run.
fn digit_run_end(chars: &[char], start: usize) -> usize {
    let mut j = start;
    while j < chars.len() {
        let c = chars[j];
        let joins = (c == ' ' || c == '-')
            && chars.get(j + 1).is_some_and(|n| n.is_ascii_digit());
        if c.is_ascii_digit() || (joins && j > start) {
            j += 1;
        } else {
            break;
        }
    }
    j
}

fn push_run(out: &mut String, run: &[char]) {
    let digits: String = run.iter().filter(|c| c.is_ascii_digit()).collect();
    if (13..=19).contains(&digits.len()) {
        out.push_str("****");
        out.push_str(&digits[digits.len() - 4..]);
    } else {
        out.extend(run);
    }
}

/// Parse a `Retry-After` value: delta seconds or an HTTP-date.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}
