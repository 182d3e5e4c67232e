//! Client orchestration: one declarative call description in, one decoded
//! response out.
//!
//! # Design
//! `Client` holds only configuration (base URL, API key pair, user-agent)
//! plus a shared transport; it carries no mutable state between calls, so a
//! single instance is safe to use from many threads. Each `perform` is a
//! linear pipeline with no retry loop: compose path → build request →
//! inject auth → encode body → dispatch → decode. The response stream is
//! consumed and dropped before the `Response` is returned, on every exit
//! path, so a `Response` never holds an open connection.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::Error;
use crate::http::{HttpMethod, RawResponse, Transport};
use crate::request::{Body, WireRequest};

/// Client name reported in the `User-Agent` header.
const CLIENT_NAME: &str = "Nessus";

/// A synchronous client for a scanner management API.
///
/// Create one with [`Client::builder`]. All endpoint calls go through
/// [`Client::perform`].
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    server_url: String,
    access_key: String,
    secret_key: String,
    user_agent: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("server_url", &self.server_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

/// Configures and builds a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    server_url: String,
    access_key: String,
    secret_key: String,
}

impl ClientBuilder {
    /// Base URL of the scanner API, e.g. `https://localhost:8834`. A
    /// trailing slash is stripped so paths can always start with `/`.
    pub fn server_url(mut self, url: &str) -> Self {
        self.server_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn access_key(mut self, key: &str) -> Self {
        self.access_key = key.to_string();
        self
    }

    pub fn secret_key(mut self, key: &str) -> Self {
        self.secret_key = key.to_string();
        self
    }

    /// The transport that will execute the HTTP round-trips. Required.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn build(self) -> Result<Client, Error> {
        let transport = self
            .transport
            .ok_or_else(|| Error::InvalidRequest("no transport configured".to_string()))?;
        Ok(Client {
            transport,
            server_url: self.server_url,
            access_key: self.access_key,
            secret_key: self.secret_key,
            user_agent: format!(
                "{CLIENT_NAME}/{} ({}-{})",
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        })
    }
}

/// Declarative description of one API call, passed to [`Client::perform`].
///
/// Credentials never live here; the client injects the `X-ApiKeys` header at
/// call time from its own configuration.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub method: HttpMethod,
    pub path: String,
    /// Query parameters, appended to `path` form-urlencoded in order.
    pub params: Vec<(String, String)>,
    pub body: Option<Body>,
    /// Overrides the default `Content-Type` header when set.
    pub content_type: Option<String>,
    /// Extra headers, appended without replacing same-named entries.
    pub headers: Vec<(String, String)>,
    /// Gzip-compress the request body. Off by default.
    pub compress: bool,
}

/// The decoded result of a call. The underlying network stream is already
/// closed by the time a `Response` exists.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Parsed JSON body; `Null` for an empty body (e.g. a 204).
    pub body: serde_json::Value,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Execute one API call and decode the response.
    ///
    /// The pipeline is strictly linear; any failure aborts the call and is
    /// returned to the caller unchanged. No retries happen at this layer.
    pub fn perform(&self, options: CallOptions) -> Result<Response, Error> {
        let mut path = options.path;
        if !options.params.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(options.params.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .finish();
            path = format!("{path}?{query}");
        }
        let url = format!("{}{}", self.server_url, path);
        debug!(method = %options.method, %url, "performing API call");

        let mut request = WireRequest::new(options.method, &url, &self.user_agent)?;

        // Always present, even with empty keys; the server decides whether
        // the credentials are acceptable.
        request.set_header(
            "X-ApiKeys",
            &format!(
                "accessKey={}; secretKey={}",
                self.access_key, self.secret_key
            ),
        );

        if let Some(content_type) = &options.content_type {
            request.set_header("Content-Type", content_type);
        }
        for (name, value) in &options.headers {
            request.append_header(name, value);
        }

        if let Some(body) = &options.body {
            request.set_body(body, options.compress).map_err(|e| {
                warn!(method = %request.method(), %url, error = %e, "could not encode request body");
                e
            })?;
        }

        let raw = self.transport.send(&request).map_err(|e| {
            warn!(method = %request.method(), %url, error = %e, "request dispatch failed");
            e
        })?;
        let RawResponse {
            status,
            headers,
            body,
        } = raw;

        // Consume the stream in full and drop it before decoding, so the
        // connection is released even when the body is not valid JSON.
        let mut buf = Vec::new();
        if let Some(mut stream) = body {
            let result = stream.read_to_end(&mut buf);
            drop(stream);
            result.map_err(Error::transport)?;
        }

        let body = if buf.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&buf).map_err(|source| Error::Decode {
                status,
                headers: headers.clone(),
                source,
            })?
        };

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}
