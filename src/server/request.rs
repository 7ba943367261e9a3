//! A request bound to the connection it arrived on.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite};
use tokio::runtime::Handle;

use crate::parser::{Error as ParserError, Method, RequestHead, parse_request};
use crate::server::error::Error;
use crate::server::response::Response;

/// The write side of a connection, owned by the request that answers it.
pub type ResponseSink = Box<dyn AsyncWrite + Send + Unpin>;

/// An incoming request together with the means to answer it.
///
/// The head is immutable once read. Response headers accumulate through
/// [`add_response_header`](Request::add_response_header) and are consumed,
/// together with the output channel, by the single
/// [`send_response`](Request::send_response) call.
pub struct Request {
    head: RequestHead,
    response_headers: HashMap<String, String>,
    output: Option<ResponseSink>,
}

impl Request {
    /// Bind an already parsed head to an output channel.
    pub fn new(head: RequestHead, output: ResponseSink) -> Self {
        Self {
            head,
            response_headers: HashMap::new(),
            output: Some(output),
        }
    }

    /// Read a request head from `reader` and bind it to `output`.
    ///
    /// Reading stops at the first empty line; at most `max_head_size` bytes
    /// are consumed.
    pub async fn read_from<R>(
        reader: &mut R,
        output: ResponseSink,
        max_head_size: usize,
    ) -> Result<Self, Error>
    where
        R: AsyncBufRead + Unpin,
    {
        let raw = read_head(reader, max_head_size).await?;
        let head = parse_request(&raw)?;
        Ok(Self::new(head, output))
    }

    /// The request method.
    pub fn method(&self) -> Method {
        self.head.method
    }

    /// The request path, without the query string.
    pub fn path(&self) -> &str {
        &self.head.path
    }

    /// The text after the first `?` of the request target, if any.
    pub fn raw_query(&self) -> Option<&str> {
        self.head.raw_query.as_deref()
    }

    /// The query parameters, derived on each call from the raw query.
    pub fn query_params(&self) -> HashMap<String, String> {
        self.head.query_params()
    }

    /// The protocol token from the request line.
    pub fn protocol(&self) -> &str {
        &self.head.protocol
    }

    /// The request headers.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.head.headers
    }

    /// Get a request header by its exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.header(name)
    }

    /// The parsed request head.
    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    /// Add or replace a header for the response.
    pub fn add_response_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.response_headers.insert(name.into(), value.into());
    }

    /// The response headers accumulated so far.
    pub fn response_headers(&self) -> &HashMap<String, String> {
        &self.response_headers
    }

    /// Whether the response has already been sent.
    pub fn is_responded(&self) -> bool {
        self.output.is_none()
    }

    /// Send the response and close the connection.
    ///
    /// The status line echoes the request's protocol token. This can only
    /// succeed once; later calls fail with [`Error::ResponseAlreadySent`]
    /// without writing anything.
    pub async fn send_response(
        &mut self,
        body: impl Into<String>,
        status: u16,
    ) -> Result<(), Error> {
        let mut output = self.output.take().ok_or(Error::ResponseAlreadySent)?;

        let response = Response::new(self.head.protocol.as_str(), status)
            .with_headers(std::mem::take(&mut self.response_headers))
            .with_body(body);
        response.write_to(&mut output).await?;

        Ok(())
    }

    /// Send the response from synchronous code running on tokio's blocking pool.
    ///
    /// Meant for [`BlockingHandler`](crate::server::BlockingHandler) closures.
    /// Fails with [`Error::InternalError`] outside a tokio runtime.
    pub fn send_response_blocking(
        &mut self,
        body: impl Into<String>,
        status: u16,
    ) -> Result<(), Error> {
        let runtime = Handle::try_current().map_err(|e| Error::InternalError(e.to_string()))?;
        runtime.block_on(self.send_response(body, status))
    }

    /// Serialize `value` as JSON and send it with `Content-Type: application/json`.
    pub async fn send_json<T: Serialize + Sync>(
        &mut self,
        value: &T,
        status: u16,
    ) -> Result<(), Error> {
        if self.is_responded() {
            return Err(Error::ResponseAlreadySent);
        }

        let body = serde_json::to_string(value)?;
        self.add_response_header("Content-Type", "application/json");
        self.send_response(body, status).await
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("head", &self.head)
            .field("response_headers", &self.response_headers)
            .field("responded", &self.is_responded())
            .finish()
    }
}

/// Read raw lines up to and including the first empty one.
async fn read_head<R>(reader: &mut R, max_head_size: usize) -> Result<Vec<u8>, Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut head = Vec::new();
    let mut limited = reader.take(max_head_size as u64);

    loop {
        let start = head.len();
        limited.read_until(b'\n', &mut head).await?;

        if !head.ends_with(b"\n") || head.len() == start {
            // Either the peer closed the connection or the limit cut the line short
            if limited.limit() == 0 {
                return Err(ParserError::HeadTooLarge(max_head_size).into());
            }
            if head.is_empty() {
                return Err(ParserError::EmptyRequest.into());
            }
            return Err(ParserError::IncompleteRequest.into());
        }

        let line = &head[start..];
        if line == b"\n" || line == b"\r\n" {
            return Ok(head);
        }
    }
}
