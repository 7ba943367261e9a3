//! HTTP server implementation for nanohttp-rs.
//!
//! This module drives the parser over real connections: an accept loop hands
//! each connection to its own task, which reads a request head, looks up the
//! handler registered for the path, and lets it write the response.

mod response;
mod request;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{Response, StatusCode};
pub use request::{Request, ResponseSink};
pub use config::ServerConfig;
pub use error::Error;
pub use handler::{BlockingHandler, Handler, HandlerFuture, HandlerRegistry};
pub use http_server::{HttpServer, ServerState};
