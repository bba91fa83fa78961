//! Error types for curlify

use thiserror::Error;

/// Boxed error raised by a request representation while its body is read
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for curlify
#[derive(Error, Debug)]
pub enum CurlifyError {
    /// No registered adapter understands the given request value
    #[error("Unrecognized request kind: {type_name}")]
    UnrecognizedRequestKind { type_name: String },

    /// The body is a stream that only the async path can drain
    #[error("Streaming body of {type_name} cannot be read synchronously")]
    StreamingBody { type_name: String },

    /// The request representation failed while its body was read
    #[error("Body error: {0}")]
    Body(#[source] BoxError),
}

impl CurlifyError {
    /// Build an `UnrecognizedRequestKind` naming the rejected Rust type
    pub fn unrecognized<R: ?Sized>() -> Self {
        CurlifyError::UnrecognizedRequestKind {
            type_name: std::any::type_name::<R>().to_string(),
        }
    }

    /// Build an `UnrecognizedRequestKind` for an adapter that expected `R`
    pub fn expected<R: ?Sized>() -> Self {
        CurlifyError::UnrecognizedRequestKind {
            type_name: format!("expected {}", std::any::type_name::<R>()),
        }
    }

    /// Build a `StreamingBody` for a sync read of a streaming `R` body
    pub fn streaming<R: ?Sized>() -> Self {
        CurlifyError::StreamingBody {
            type_name: std::any::type_name::<R>().to_string(),
        }
    }

    /// Wrap a body read failure without altering it
    pub fn body(err: impl Into<BoxError>) -> Self {
        CurlifyError::Body(err.into())
    }
}

pub type Result<T> = std::result::Result<T, CurlifyError>;
