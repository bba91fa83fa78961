//! Request adapters
//!
//! An adapter recognizes one concrete request representation (an
//! `http::Request<B>`, a `reqwest::Request`, ...) and binds to it, exposing
//! the fields a [`Snapshot`](crate::Snapshot) is built from.
//!
//! - **Sync adapters** ([`Adapter`]) return the body immediately
//! - **Async adapters** ([`AsyncAdapter`]) return the body after one await
//!
//! Which adapters exist depends on the enabled cargo features.

pub mod http;
#[cfg(feature = "reqwest")]
pub mod reqwest;

use std::any::Any;

use futures::future::BoxFuture;
use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::errors::Result;
use crate::snapshot::Body;

/// Header holding the request cookies
pub const COOKIE: &str = "cookie";

/// Identity and type check shared by sync and async adapters
pub trait Dispatch: Send + Sync {
    /// Name used in logs, usually the recognized Rust type
    fn name(&self) -> &'static str;

    /// Whether `request` is the representation this adapter binds to
    fn recognizes(&self, request: &dyn Any) -> bool;
}

/// Adapter whose body can be read synchronously
pub trait Adapter: Dispatch {
    /// Bind to `request`, failing with `UnrecognizedRequestKind` on a type mismatch
    fn bind<'r>(&self, request: &'r dyn Any) -> Result<Box<dyn RequestData + 'r>>;
}

/// Adapter whose body is obtained behind a suspension point
pub trait AsyncAdapter: Dispatch {
    /// Bind to `request`, failing with `UnrecognizedRequestKind` on a type mismatch
    fn bind<'r>(
        &self,
        request: &'r mut (dyn Any + Send),
    ) -> Result<Box<dyn AsyncRequestData + 'r>>;
}

/// Side-effect free accessors of a bound request
///
/// Implementors only provide the raw representation; `headers` and
/// `cookies` are derived from `raw_headers` on every call.
pub trait RequestParts {
    fn method(&self) -> String;

    fn url(&self) -> String;

    /// Header pairs as stored by the representation, duplicates included
    fn raw_headers(&self) -> Vec<(String, String)>;

    fn headers(&self) -> IndexMap<String, String> {
        normalize_headers(&self.raw_headers())
    }

    fn cookies(&self) -> Option<String> {
        extract_cookies(&self.raw_headers())
    }
}

/// A bound request whose body is available immediately
pub trait RequestData: RequestParts {
    /// Read the body. Called at most once per binding.
    fn body(&mut self) -> Result<Option<Body>>;
}

/// A bound request whose body resolves once, asynchronously
pub trait AsyncRequestData: RequestParts + Send {
    /// Read the body. Called at most once per binding.
    fn body(&mut self) -> BoxFuture<'_, Result<Option<Body>>>;
}

impl<T: RequestParts + ?Sized> RequestParts for &T {
    fn method(&self) -> String {
        (**self).method()
    }

    fn url(&self) -> String {
        (**self).url()
    }

    fn raw_headers(&self) -> Vec<(String, String)> {
        (**self).raw_headers()
    }
}

impl<T: RequestParts + ?Sized> RequestParts for &mut T {
    fn method(&self) -> String {
        (**self).method()
    }

    fn url(&self) -> String {
        (**self).url()
    }

    fn raw_headers(&self) -> Vec<(String, String)> {
        (**self).raw_headers()
    }
}

/// Lower-case header names and drop the `cookie` entry
///
/// Repeated names are merged into one entry with values joined by `", "`.
/// The `cookie` entry is dropped only when the raw store holds the literal
/// lower-case name.
pub fn normalize_headers(raw: &[(String, String)]) -> IndexMap<String, String> {
    let mut headers: IndexMap<String, String> = IndexMap::with_capacity(raw.len());
    for (name, value) in raw {
        match headers.entry(name.to_lowercase()) {
            Entry::Occupied(mut entry) => {
                let merged = entry.get_mut();
                merged.push_str(", ");
                merged.push_str(value);
            }
            Entry::Vacant(entry) => {
                entry.insert(value.clone());
            }
        }
    }

    if raw.iter().any(|(name, _)| name == COOKIE) {
        headers.shift_remove(COOKIE);
    }
    headers
}

/// Raw `cookie` header value, unparsed
///
/// Several `cookie` headers are joined with `", "`, like any repeated header.
pub fn extract_cookies(raw: &[(String, String)]) -> Option<String> {
    let values: Vec<&str> = raw
        .iter()
        .filter(|(name, _)| name == COOKIE)
        .map(|(_, value)| value.as_str())
        .collect();

    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// Header pairs of an `http::HeaderMap`, rendering non UTF-8 values lossily
pub(crate) fn header_pairs(headers: &::http::HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}
