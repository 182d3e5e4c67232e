//! Error types for the scanner API client.
//!
//! # Design
//! Five variants, one per failure stage of the call pipeline. Build-time
//! failures (`InvalidRequest`, `Serialization`, `Encoding`) abort before any
//! bytes hit the wire; `Transport` covers the dispatch itself; `Decode`
//! carries the received status and headers so callers can still branch on a
//! non-2xx response whose body was not valid JSON. Nothing here is retried —
//! retry policy belongs to a higher layer.

use std::io;

/// Errors returned by [`Client::perform`](crate::Client::perform) and the
/// request builder.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The method or URL could not form a valid request.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The structured request body could not be serialized to JSON.
    #[error("could not serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The gzip writer failed while compressing the request body.
    #[error("could not compress request body: {0}")]
    Encoding(#[source] io::Error),

    /// The transport failed to complete the round-trip (network, TLS,
    /// timeout). Surfaced unchanged; never retried by this layer.
    #[error("transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The response body was not valid JSON. Status and headers are kept so
    /// the caller can still inspect what the server returned.
    #[error("could not decode response body (HTTP {status}): {source}")]
    Decode {
        status: u16,
        headers: Vec<(String, String)>,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Wrap an arbitrary transport-level failure.
    pub fn transport(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Transport(err.into())
    }
}
