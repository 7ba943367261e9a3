//! HTTP request-head parsing.
//!
//! This module turns the raw bytes of a request head (request line, header
//! lines, blank line) into a [`RequestHead`]. It performs no I/O.

mod request;
mod method;
mod query;
mod error;

// Re-export public items
pub use request::RequestHead;
pub use method::Method;
pub use query::parse_query;
pub use error::Error;

// Re-export the parse_request function
pub use request::parse_request;
