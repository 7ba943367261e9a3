//! Error types for the HTTP parser.

use thiserror::Error;

/// Errors that can occur while reading or parsing a request head.
#[derive(Debug, Error)]
pub enum Error {
    /// The connection closed before sending a single byte.
    #[error("Empty request")]
    EmptyRequest,

    /// The connection closed before the blank line ending the head.
    #[error("Incomplete request: connection closed before end of headers")]
    IncompleteRequest,

    /// The head exceeded the configured size limit.
    #[error("Request head exceeds {0} bytes")]
    HeadTooLarge(usize),

    /// The request does not use a supported method.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// The request line is malformed (wrong format or missing components).
    #[error("Malformed request line: {0}")]
    MalformedRequestLine(String),

    /// The request target has an empty path.
    #[error("Invalid HTTP path")]
    InvalidPath,

    /// A header line has no `:` separator.
    #[error("Invalid header format: {0}")]
    InvalidHeaderFormat(String),
}
