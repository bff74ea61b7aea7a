//! Parse raw HTTP response header lines into name/value pairs.

/// Parse collected header lines. A status line (`HTTP/...`) starts a new
/// header block, so only the final response's headers are kept (interim
/// `100 Continue` responses are discarded).
pub fn parse_headers(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}
