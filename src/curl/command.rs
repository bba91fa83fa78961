//! Curl command synthesis
//!
//! Quoting follows a deliberately narrow policy rather than general shell
//! escaping:
//!
//! - header, `-d` and `-F` arguments are always wrapped in single quotes
//! - the cookie argument is quoted only when it contains a space
//! - the URL is quoted only when it contains `&`

use tracing::trace;

use super::multipart::multipart_args;
use crate::snapshot::{Body, Snapshot};

/// Program token every command starts with
pub const PROGRAM: &str = "curl";

/// Content type injected for bodies sent without one
pub const DEFAULT_CONTENT_TYPE: &str = "plain/text";

const CONTENT_TYPE: &str = "content-type";
const CONTENT_LENGTH: &str = "content-length";

/// Generate the curl command reproducing `snapshot`
///
/// Header adjustments (dropping `content-length`, defaulting
/// `content-type`) apply to a working copy; `snapshot` itself is untouched.
pub fn to_curl_string(snapshot: &Snapshot) -> String {
    let mut headers = snapshot.headers.clone();

    headers.shift_remove(CONTENT_LENGTH);

    let has_body = snapshot.body.as_ref().is_some_and(|b| !b.is_empty());
    let has_content_type = headers.get(CONTENT_TYPE).is_some_and(|v| !v.is_empty());
    if has_body && !has_content_type {
        headers.insert(CONTENT_TYPE.to_string(), DEFAULT_CONTENT_TYPE.to_string());
    }

    let content_type = headers.get(CONTENT_TYPE).map(String::as_str).unwrap_or("");

    let parts = [
        Some(PROGRAM.to_string()),
        method_arg(&snapshot.method),
        cookie_arg(snapshot.cookies.as_deref()),
        Some(
            headers
                .iter()
                .map(|(name, value)| header_arg(name, value))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        body_arg(snapshot.body.as_ref(), content_type),
        Some(url_arg(&snapshot.url)),
    ];

    let command = parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    trace!(command = %command, "Generated curl command");
    command
}

/// `-X <METHOD>`, omitted for GET
fn method_arg(method: &str) -> Option<String> {
    if method == "GET" {
        None
    } else {
        Some(format!("-X {}", method))
    }
}

fn cookie_arg(cookies: Option<&str>) -> Option<String> {
    let cookies = cookies.filter(|c| !c.is_empty())?;
    if cookies.contains(' ') {
        Some(format!("-b '{}'", cookies))
    } else {
        Some(format!("-b {}", cookies))
    }
}

fn header_arg(name: &str, value: &str) -> String {
    format!("-H '{}: {}'", name, value)
}

/// `-F` arguments for multipart bodies, otherwise a single `-d` argument
fn body_arg(body: Option<&Body>, content_type: &str) -> Option<String> {
    if content_type.contains("multipart") {
        let payload = body.map(Body::as_bytes).unwrap_or_default();
        return Some(multipart_args(payload).join(" "));
    }

    let body = body.filter(|b| !b.is_empty())?;
    Some(format!("-d '{}'", body))
}

/// The URL, single-quoted only when it contains `&`
fn url_arg(url: &str) -> String {
    if url.contains('&') {
        format!("'{}'", url)
    } else {
        url.to_string()
    }
}
