//! Error types for the HTTP server.

use thiserror::Error;

use crate::parser::Error as ParserError;

/// Errors that can occur during HTTP server operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Error parsing an HTTP request.
    #[error("Parse error: {0}")]
    ParseError(#[from] ParserError),

    /// I/O error on the listening socket or a connection.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// No handler is registered for the requested path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A handler tried to respond to a request that already got its response.
    #[error("Response already sent")]
    ResponseAlreadySent,

    /// `start` was called on a server whose accept loop is already running.
    #[error("Server is already running")]
    AlreadyRunning,

    /// Internal server error.
    #[error("Internal server error: {0}")]
    InternalError(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
