//! Integration tests for `reqwest::blocking::Request` translation

#![cfg(feature = "blocking")]

mod common;

use common::{init_tracing, url};
use curlify::{to_curl, to_curl_async, CurlifyError};
use reqwest::blocking::{Body, Request};
use reqwest::{Method, Url};

fn request(method: Method, path: &str) -> Request {
    init_tracing();
    Request::new(method, Url::parse(&url(path)).unwrap())
}

#[test]
fn test_blocking_get() {
    let request = request(Method::GET, "/get?foo=911&bar=baz");
    assert_eq!(
        to_curl(&request).unwrap(),
        "curl 'https://example.com/get?foo=911&bar=baz'"
    );
}

#[test]
fn test_blocking_text() {
    let mut request = request(Method::POST, "/post");
    *request.body_mut() = Some(Body::from("foo"));
    assert_eq!(
        to_curl(&request).unwrap(),
        "curl -X POST -H 'content-type: plain/text' -d 'foo' https://example.com/post"
    );
}

#[test]
fn test_blocking_cookie() {
    let mut request = request(Method::GET, "/get");
    request
        .headers_mut()
        .insert("cookie", "bar=baz".parse().unwrap());
    assert_eq!(to_curl(&request).unwrap(), "curl -b bar=baz https://example.com/get");
}

#[test]
fn test_blocking_reader_body_fails() {
    let mut request = request(Method::PUT, "/put");
    *request.body_mut() = Some(Body::new(std::io::Cursor::new(b"streamed".to_vec())));
    let err = to_curl(&request).unwrap_err();
    assert!(matches!(err, CurlifyError::StreamingBody { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_blocking_request_from_async_call_site() {
    let mut request = request(Method::POST, "/post");
    *request.body_mut() = Some(Body::from("foo"));
    assert_eq!(
        to_curl_async(&mut request).await.unwrap(),
        "curl -X POST -H 'content-type: plain/text' -d 'foo' https://example.com/post"
    );
}
