//! Curl command generation
//!
//! Turns a [`Snapshot`](crate::Snapshot) into a curl command line for
//! sharing and debugging.
//!
//! ```text
//! curl -X POST -b bar=baz -H 'content-type: plain/text' -d 'foo' https://example.com/post
//! ```
//!
//! Token order is fixed: program, method, cookies, headers, body, URL.

pub mod command;
pub mod multipart;

pub use command::{to_curl_string, DEFAULT_CONTENT_TYPE, PROGRAM};
pub use multipart::{multipart_args, scan, MultipartField};
