//! A tiny GET-only HTTP server.
//!
//! nanohttp-rs accepts TCP connections, parses a restricted subset of HTTP/1.x
//! requests, and dispatches each request to the handler registered for its
//! exact path. Handlers answer through the [`Request`] they are given.
//!
//! # Limitations
//!
//! These are part of the contract, not oversights:
//!
//! - Only `GET` is recognized, and request bodies are never read
//! - One request per connection; the connection closes after the response
//! - Header names are case-sensitive and repeated headers keep the last value
//! - Query parameters are not percent-decoded
//! - No `Content-Length` is added to responses automatically
//! - The status line has no space between protocol and code (`HTTP/1.1200`)
//! - A request for an unregistered path, or a malformed request, is answered
//!   by closing the connection without writing anything
//! - Handlers run as async tasks and must not block their thread; synchronous
//!   work belongs in a [`BlockingHandler`] (or `tokio::task::spawn_blocking`),
//!   otherwise it stalls other connections sharing the runtime worker
//!
//! # Examples
//!
//! ## Parsing a request head
//!
//! ```
//! use nanohttp_rs::parse_request;
//!
//! let head = parse_request(b"GET /echo?msg=abc HTTP/1.0\nHost:localhost\n\n").unwrap();
//! assert_eq!(head.path, "/echo");
//! assert_eq!(head.raw_query.as_deref(), Some("msg=abc"));
//! assert_eq!(head.protocol, "HTTP/1.0");
//! assert_eq!(head.query_params().get("msg").map(String::as_str), Some("abc"));
//! ```
//!
//! ## Error handling
//!
//! ```
//! use nanohttp_rs::{parse_request, ParserError};
//!
//! match parse_request(b"POST /index.html HTTP/1.1\n\n") {
//!     Ok(_) => println!("Request parsed successfully"),
//!     Err(ParserError::InvalidMethod(method)) => println!("Invalid method: {}", method),
//!     Err(ParserError::InvalidHeaderFormat(line)) => println!("Bad header: {}", line),
//!     Err(err) => println!("Other error: {}", err),
//! }
//! ```
//!
//! ## Serving requests
//!
//! ```no_run
//! use nanohttp_rs::{HttpServer, ServerConfig, StatusCode};
//!
//! # async fn run() -> Result<(), nanohttp_rs::ServerError> {
//! let mut server = HttpServer::bind(ServerConfig::default()).await?;
//!
//! server.add_route("/echo", |mut req| async move {
//!     let msg = req.query_params().remove("msg").unwrap_or_default();
//!     req.add_response_header("Content-Type", "text/plain");
//!     req.send_response(msg, StatusCode::Ok.into()).await
//! });
//!
//! server.start().await
//! # }
//! ```
//!
//! See the `demos` directory for a runnable server.

// Export the parser module
pub mod parser;

// Export the server module
pub mod server;

// Re-export commonly used items for convenience
pub use parser::{Error as ParserError, Method, RequestHead, parse_query, parse_request};
pub use server::{
    BlockingHandler, Error as ServerError, Handler, HandlerRegistry, HttpServer, Request, Response,
    ServerConfig, ServerState, StatusCode,
};
