//! curlify library interface
//!
//! Converts already-built or already-received HTTP request values into the
//! curl command that reproduces them.
//!
//! ```
//! use bytes::Bytes;
//!
//! let request = http::Request::post("https://example.com/post")
//!     .header("cookie", "bar=baz")
//!     .body(Bytes::from_static(b"foo"))
//!     .unwrap();
//!
//! assert_eq!(
//!     curlify::to_curl(&request)?,
//!     "curl -X POST -b bar=baz -H 'content-type: plain/text' -d 'foo' https://example.com/post"
//! );
//! # Ok::<(), curlify::CurlifyError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`adapter`] - Request representations and their adapters
//! - [`registry`] - Ordered adapter lists and selection
//! - [`snapshot`] - Library-agnostic request view (Snapshot, Body)
//! - [`curl`] - Command synthesis and multipart field recovery
//! - [`engine`] - Sync/async orchestration (Curlify)
//! - [`errors`] - Error types (CurlifyError, Result)
//!
//! # Features
//!
//! - `reqwest` (default) - `reqwest::Request` adapters
//! - `http-body` (default) - async `http::Request<B>` adapters for `http_body::Body` types
//! - `blocking` - `reqwest::blocking::Request` adapter

pub mod adapter;
pub mod curl;
pub mod engine;
pub mod errors;
pub mod registry;
pub mod snapshot;

use std::any::Any;

use once_cell::sync::Lazy;

pub use curl::to_curl_string;
pub use engine::{Curlify, CurlifyBuilder};
pub use errors::{CurlifyError, Result};
pub use snapshot::{Body, Snapshot};

/// Process-wide engine with the built-in adapters, read-only once built
static DEFAULT_ENGINE: Lazy<Curlify> = Lazy::new(Curlify::default);

/// The shared engine used by [`to_curl`] and [`to_curl_async`]
pub fn default_engine() -> &'static Curlify {
    &DEFAULT_ENGINE
}

/// Translate a request whose body is available synchronously
///
/// Fails with [`CurlifyError::UnrecognizedRequestKind`] when no sync adapter
/// recognizes `request`.
pub fn to_curl<R: Any>(request: &R) -> Result<String> {
    DEFAULT_ENGINE.to_curl(request)
}

/// Translate a request, awaiting its body when needed
///
/// Async adapters are tried first, then the sync adapters. Streaming bodies
/// are drained once and stored back on the request.
pub async fn to_curl_async<R: Any + Send>(request: &mut R) -> Result<String> {
    DEFAULT_ENGINE.to_curl_async(request).await
}
