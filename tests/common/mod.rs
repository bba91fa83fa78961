//! Common test utilities for curlify integration tests
//!
//! Shared request fixtures and tracing setup.

#![allow(dead_code)]

use std::sync::Once;

/// Base URL used by every fixture
pub const BASE: &str = "https://example.com";

/// Raw bytes that are not valid UTF-8
pub const BINARY: &[u8] = b"\x7fELF\x01\x00\xff";

static TRACING: Once = Once::new();

/// Install a test subscriber honouring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Absolute URL for `path` under [`BASE`]
pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// Extract the boundary parameter of a multipart content type
pub fn boundary(content_type: &str) -> &str {
    content_type
        .rsplit("boundary=")
        .next()
        .unwrap_or_default()
}
