//! Synchronous client core for a Nessus-style vulnerability-scanner
//! management API.
//!
//! # Overview
//! Turns a declarative call description (method, path, params, body) into a
//! fully-formed wire request — default headers, `X-ApiKeys` authentication,
//! one of four body encodings (raw/JSON × plain/gzip), content length, and a
//! replayable body snapshot — then dispatches it through a pluggable
//! [`Transport`] and decodes the JSON response.
//!
//! # Design
//! - [`Client`] is configuration plus a shared transport; no mutable state
//!   between calls, safe to use from many threads.
//! - [`WireRequest`] owns the encoded body bytes once and hands out fresh
//!   read cursors, so the transport can resend without re-encoding.
//! - The transport is a trait, not a baked-in HTTP stack: tests substitute a
//!   recording mock, integration tests plug in a real ureq-backed
//!   implementation.
//! - Every call is a single linear pipeline; all failures surface to the
//!   caller as one of the five [`Error`] variants, never retried here.

pub mod client;
pub mod error;
pub mod http;
pub mod request;

pub use client::{CallOptions, Client, ClientBuilder, Response};
pub use error::Error;
pub use http::{HttpMethod, RawResponse, Transport};
pub use request::{Body, EncodedBody, WireRequest};
