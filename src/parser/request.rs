//! Request-head parsing and representation.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::parser::error::Error;
use crate::parser::method::Method;
use crate::parser::query::parse_query;

/// The parsed head of an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestHead {
    /// The HTTP method (always GET)
    pub method: Method,
    /// The request path, without the query string
    pub path: String,
    /// Everything after the first `?` of the request target, if present
    pub raw_query: Option<String>,
    /// The protocol token, verbatim from the request line
    pub protocol: String,
    /// The headers, names and values exactly as received
    pub headers: HashMap<String, String>,
}

impl RequestHead {
    /// Create a new request head from its parts.
    pub fn new(
        method: Method,
        path: String,
        raw_query: Option<String>,
        protocol: String,
        headers: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            path,
            raw_query,
            protocol,
            headers,
        }
    }

    /// Derive the query parameters from the raw query.
    ///
    /// Returns an empty map when the request target had no `?`.
    pub fn query_params(&self) -> HashMap<String, String> {
        self.raw_query
            .as_deref()
            .map(parse_query)
            .unwrap_or_default()
    }

    /// Get a header value by its exact name.
    ///
    /// Names are not case-normalized, so `host` and `Host` are different keys.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Check if a header exists under its exact name.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }
}

/// Parse a request head from a byte slice.
///
/// The input is split into lines on `\n`, and a single `\r` before each
/// terminator is dropped. The first line must read `GET <target> <protocol>`.
/// Following lines up to the first empty one are headers split on their first
/// `:`; anything after the empty line is ignored.
///
/// Each line is decoded as UTF-8 on its own, so bad bytes are reported as a
/// malformed request line or as an invalid header, depending on where they are.
pub fn parse_request(input: &[u8]) -> Result<RequestHead, Error> {
    let mut lines = input
        .split(|&b| b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line));

    let request_line = match lines.next() {
        Some(line) if !line.is_empty() => line,
        _ => return Err(Error::EmptyRequest),
    };
    let request_line = std::str::from_utf8(request_line)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;

    let (method, rest) = request_line
        .split_once(' ')
        .ok_or_else(|| Error::MalformedRequestLine(request_line.to_string()))?;
    let method = Method::from_str(method)?;

    // The protocol runs to the end of the line and is echoed back unmodified
    let (target, protocol) = rest
        .split_once(' ')
        .ok_or_else(|| Error::MalformedRequestLine(request_line.to_string()))?;
    if protocol.is_empty() {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    }

    let (path, raw_query) = match target.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (target, None),
    };
    if path.is_empty() {
        return Err(Error::InvalidPath);
    }

    let mut headers = HashMap::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        let line = std::str::from_utf8(line)
            .map_err(|_| Error::InvalidHeaderFormat(String::from_utf8_lossy(line).into_owned()))?;

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Error::InvalidHeaderFormat(line.to_string()))?;
        headers.insert(name.to_string(), value.to_string());
    }

    Ok(RequestHead::new(
        method,
        path.to_string(),
        raw_query,
        protocol.to_string(),
        headers,
    ))
}
