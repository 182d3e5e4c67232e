//! Wire-level vocabulary shared by the builder and the orchestrator.
//!
//! # Design
//! The transport is an external collaborator: anything that can take a
//! [`WireRequest`] and produce a [`RawResponse`] plugs in through the
//! [`Transport`] trait. The core never opens a socket itself, which keeps
//! request construction deterministic and lets tests substitute a recording
//! mock. A `RawResponse` body is a plain reader; dropping it releases the
//! underlying connection, and the orchestrator guarantees that happens on
//! every exit path.

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::error::Error;
use crate::request::WireRequest;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    /// Parse a method name, case-insensitively. Unknown methods fail the
    /// same way a malformed URL does: the request cannot be built.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            other => Err(Error::InvalidRequest(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

/// The raw result of dispatching a [`WireRequest`], before decoding.
///
/// `body` is whatever stream the transport hands back. The orchestrator
/// consumes it exactly once and drops it before returning, so a `RawResponse`
/// never outlives its connection.
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Box<dyn Read + Send>>,
}

/// External collaborator capable of sending a request and returning the raw
/// response. Implementations must be safe to share across threads; the core
/// itself holds no mutable state between calls.
pub trait Transport: Send + Sync {
    fn send(&self, request: &WireRequest) -> Result<RawResponse, Error>;
}
