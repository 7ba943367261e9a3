//! HTTP request methods.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::parser::error::Error;

/// The request methods this server understands.
///
/// Only `GET` is recognized; every other verb is rejected while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Method {
    /// GET method: Requests a representation of the specified resource.
    GET,
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::GET),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}
