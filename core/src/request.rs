//! Request builder: headers, body encoding, and replayable body snapshots.
//!
//! # Design
//! Body encoding is a flat 2×2 dispatch (raw string vs. structured value,
//! compressed vs. not) rather than a trait hierarchy: the four combinations
//! are exhaustive and each has a fixed header side effect, so a match is
//! easier to verify than polymorphism. The final encoded bytes live in an
//! [`EncodedBody`], which owns the single `Arc<[u8]>` buffer and hands out
//! fresh read cursors on demand. Replaying the body never re-runs encoding
//! or compression.

use std::io::{Cursor, Write};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use url::Url;

use crate::error::Error;
use crate::http::HttpMethod;

/// A logical request body: either a raw string sent verbatim, or a
/// structured value serialized to JSON at encode time.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Text(String),
    Json(serde_json::Value),
}

impl Body {
    /// Build a structured body from any serializable value.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, Error> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(Error::Serialization)
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Text(s)
    }
}

impl From<&str> for Body {
    fn from(s: &str) -> Self {
        Body::Text(s.to_string())
    }
}

impl From<serde_json::Value> for Body {
    fn from(v: serde_json::Value) -> Self {
        Body::Json(v)
    }
}

/// An immutable snapshot of the final encoded request payload.
///
/// Owns the bytes exactly once; [`EncodedBody::reader`] is the replay
/// function, returning a fresh cursor over the same buffer so the transport
/// can resend the body (e.g. after a redirect) without re-encoding.
#[derive(Debug, Clone)]
pub struct EncodedBody {
    bytes: Arc<[u8]>,
}

impl EncodedBody {
    fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Exact byte length of the payload; this is the request's content
    /// length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A fresh read cursor over the snapshot. Every call yields the same
    /// bytes; the buffer itself is never consumed.
    pub fn reader(&self) -> Cursor<Arc<[u8]>> {
        Cursor::new(Arc::clone(&self.bytes))
    }
}

/// A fully-assembled, transport-ready request.
///
/// Created by [`WireRequest::new`] with the default header set, then mutated
/// through the narrow builder surface below. Consumed at most once per call
/// attempt by the transport; the body snapshot supports replay if the
/// transport itself must resend.
#[derive(Debug, Clone)]
pub struct WireRequest {
    method: HttpMethod,
    url: Url,
    headers: Vec<(String, String)>,
    body: Option<EncodedBody>,
}

impl WireRequest {
    /// Create a request shell with the default headers: the injected
    /// user-agent, `Accept: application/json`, and
    /// `Content-Type: application/json`.
    pub fn new(method: HttpMethod, url: &str, user_agent: &str) -> Result<Self, Error> {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidRequest(format!("{method} {url}: {e}")))?;
        let mut request = Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        };
        request.append_header("User-Agent", user_agent);
        request.append_header("Accept", "application/json");
        request.set_header("Content-Type", "application/json");
        Ok(request)
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&EncodedBody> {
        self.body.as_ref()
    }

    /// Content length of the encoded payload; 0 when no body is set.
    pub fn content_length(&self) -> u64 {
        self.body.as_ref().map_or(0, |b| b.len() as u64)
    }

    /// First value of the named header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values of the named header, in insertion order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Replace every value of the named header with a single value.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Add a header value without touching existing same-named entries.
    pub fn append_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Install a standard `Authorization: Basic` header.
    pub fn set_basic_auth(&mut self, username: &str, password: &str) {
        let credentials = STANDARD.encode(format!("{username}:{password}"));
        self.set_header("Authorization", &format!("Basic {credentials}"));
    }

    /// Encode `body` into the request, optionally gzip-compressing it.
    ///
    /// Raw strings are sent as their UTF-8 bytes and leave `Content-Type`
    /// alone; structured values are JSON-serialized and force
    /// `Content-Type: application/json`. Compression adds
    /// `Content-Encoding: gzip` and `Vary: Accept-Encoding` in either case.
    /// The content length always reflects the final (possibly compressed)
    /// payload.
    pub fn set_body(&mut self, body: &Body, compress: bool) -> Result<(), Error> {
        match (body, compress) {
            (Body::Text(s), false) => {
                self.install_body(s.clone().into_bytes());
            }
            (Body::Text(s), true) => {
                let compressed = gzip(s.as_bytes())?;
                self.mark_gzip();
                self.install_body(compressed);
            }
            (Body::Json(v), false) => {
                let data = serde_json::to_vec(v).map_err(Error::Serialization)?;
                self.set_header("Content-Type", "application/json");
                self.install_body(data);
            }
            (Body::Json(v), true) => {
                let data = serde_json::to_vec(v).map_err(Error::Serialization)?;
                let compressed = gzip(&data)?;
                self.mark_gzip();
                self.set_header("Content-Type", "application/json");
                self.install_body(compressed);
            }
        }
        Ok(())
    }

    fn install_body(&mut self, bytes: Vec<u8>) {
        self.body = Some(EncodedBody::new(bytes));
    }

    fn mark_gzip(&mut self) {
        self.append_header("Content-Encoding", "gzip");
        self.append_header("Vary", "Accept-Encoding");
    }
}

/// Gzip-compress `data` in memory. Writer failures (including close) map to
/// [`Error::Encoding`], distinct from JSON serialization failures.
fn gzip(data: &[u8]) -> Result<Vec<u8>, Error> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).map_err(Error::Encoding)?;
    encoder.finish().map_err(Error::Encoding)
}
