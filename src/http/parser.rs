use crate::http::request::{Method, Request};
use std::collections::HashMap;

#[derive(Debug)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidHeader,
    InvalidContentLength,
    Incomplete,
}

/// Parses the request line and header block from the front of `buf`.
///
/// Returns the request (with an empty body) and the number of bytes consumed
/// up to and including the blank line. Body framing is resolved separately,
/// since the body may still be in flight on the socket.
///
/// Header keys are lowercased; values are trimmed of surrounding whitespace.
/// A Content-Length header that is present but not a non-negative decimal
/// integer fails the whole request with `InvalidContentLength`.
pub fn parse_request_head(buf: &[u8]) -> Result<(Request, usize), ParseError> {

    // Look for header/body separator
    let headers_end = find_headers_end(buf).ok_or(ParseError::Incomplete)?;
    let header_bytes = &buf[..headers_end];

    let headers_str = std::str::from_utf8(header_bytes)
        .map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest);
    let mut parts = request_line?.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::InvalidHeader)?;

        headers.insert(
           key.trim().to_ascii_lowercase(),
           value.trim().to_string(),
        );
    }

    // A declared length must parse now; rejecting late would mean reading
    // a body whose end we cannot locate.
    if let Some(v) = headers.get("content-length") {
        v.parse::<usize>().map_err(|_| ParseError::InvalidContentLength)?;
    }

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body: Vec::new(),
    };

    Ok((request, headers_end + 4))

}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4)
        .position(|w| w == b"\r\n\r\n")
}
