//! HTTP response rendering and emission.

use std::collections::HashMap;

use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Common HTTP status codes.
///
/// Any integer status can be sent; these exist for readability at call sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    Created = 201,
    NoContent = 204,
    BadRequest = 400,
    NotFound = 404,
    InternalServerError = 500,
}

impl From<StatusCode> for u16 {
    fn from(status: StatusCode) -> Self {
        status as u16
    }
}

/// A response ready to be written to a connection.
#[derive(Debug, Clone)]
pub struct Response {
    /// The protocol token echoed from the request line
    pub protocol: String,
    /// The numeric status code
    pub status: u16,
    /// The response headers
    pub headers: HashMap<String, String>,
    /// The response body
    pub body: String,
}

impl Response {
    /// Create an empty response for the given protocol and status.
    pub fn new(protocol: impl Into<String>, status: u16) -> Self {
        Self {
            protocol: protocol.into(),
            status,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the response body.
    ///
    /// No `Content-Length` is derived from it.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Convert the response to bytes.
    ///
    /// The status line is the protocol immediately followed by the status
    /// code, with no separating space and no reason phrase.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        // Add the status line
        let status_line = format!("{}{}\n", self.protocol, self.status);
        bytes.extend_from_slice(status_line.as_bytes());

        // Add the headers
        for (name, value) in &self.headers {
            let header_line = format!("{name}: {value}\n");
            bytes.extend_from_slice(header_line.as_bytes());
        }

        // Add the empty line that separates headers from body
        bytes.extend_from_slice(b"\n");

        // Add the body
        bytes.extend_from_slice(self.body.as_bytes());

        bytes
    }

    /// Write the response in one piece, then shut the writer down.
    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await?;
        writer.shutdown().await
    }
}
