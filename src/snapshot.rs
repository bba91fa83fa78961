//! Library-agnostic view of one request
//!
//! A [`Snapshot`] is captured once per translation from a bound adapter and
//! consumed by the curl synthesizer.

use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;

use crate::adapter::{AsyncRequestData, RequestData, RequestParts};
use crate::errors::Result;

/// Request body as seen by the synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Body that decoded as UTF-8
    Text(String),
    /// Raw bytes that failed UTF-8 decoding
    Bytes(Bytes),
}

impl Body {
    /// Decode raw body bytes, keeping them raw when they are not UTF-8
    pub fn decode(raw: impl Into<Bytes>) -> Self {
        let raw = raw.into();
        match std::str::from_utf8(&raw) {
            Ok(text) => Body::Text(text.to_string()),
            Err(_) => Body::Bytes(raw),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(text) => text.as_bytes(),
            Body::Bytes(bytes) => bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl fmt::Display for Body {
    /// Text renders verbatim; raw bytes render as an escaped `b"..."` literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Text(text) => f.write_str(text),
            Body::Bytes(bytes) => write!(f, "{:?}", bytes),
        }
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Body::Text(text.to_string())
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Body::Text(text)
    }
}

/// Canonical request data handed to the curl synthesizer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Uppercase request method
    pub method: String,
    /// Fully formed request URL, query included
    pub url: String,
    /// Lower-cased header names in insertion order, never containing `cookie`
    pub headers: IndexMap<String, String>,
    /// Raw value of the `cookie` header
    pub cookies: Option<String>,
    pub body: Option<Body>,
}

impl Snapshot {
    /// Copy the synchronous fields of a bound request and attach a body
    pub fn from_parts<P: RequestParts + ?Sized>(parts: &P, body: Option<Body>) -> Self {
        Self {
            method: parts.method(),
            url: parts.url(),
            headers: parts.headers(),
            cookies: parts.cookies(),
            body,
        }
    }

    /// Capture a request whose body can be read immediately
    pub fn capture(data: &mut (dyn RequestData + '_)) -> Result<Self> {
        let mut snapshot = Self::from_parts(&*data, None);
        snapshot.body = data.body()?;
        Ok(snapshot)
    }

    /// Capture a request whose body is read behind one suspension point
    pub async fn capture_async(data: &mut (dyn AsyncRequestData + '_)) -> Result<Self> {
        let mut snapshot = Self::from_parts(&*data, None);
        snapshot.body = data.body().await?;
        Ok(snapshot)
    }

    /// Header value by lower-case name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}
