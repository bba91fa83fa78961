//! Adapters for reqwest request types
//!
//! `reqwest::Request` is registered twice: the sync adapter only sees
//! buffered bodies, the async adapter also drains streaming bodies such as
//! multipart forms.

use std::any::{type_name, Any};

use bytes::Bytes;
use futures::future::BoxFuture;
use tracing::warn;

use super::http::read_once;
use super::{
    header_pairs, Adapter, AsyncAdapter, AsyncRequestData, Dispatch, RequestData, RequestParts,
};
use crate::errors::{CurlifyError, Result};
use crate::snapshot::Body;

impl RequestParts for ::reqwest::Request {
    fn method(&self) -> String {
        self.method().as_str().to_string()
    }

    fn url(&self) -> String {
        self.url().as_str().to_string()
    }

    fn raw_headers(&self) -> Vec<(String, String)> {
        header_pairs(self.headers())
    }
}

/// Drain a reqwest body once, leaving a buffered copy in `slot`
///
/// A body that fails partway is replaced by one that fails again when sent,
/// so a caller cannot post a silently truncated request.
async fn read_reqwest_body(slot: &mut ::reqwest::Body) -> Result<Bytes> {
    if let Some(buffered) = slot.as_bytes() {
        return Ok(Bytes::copy_from_slice(buffered));
    }

    match read_once(slot, ::reqwest::Body::from).await {
        Ok(collected) => Ok(collected),
        Err(err) => {
            warn!(error = %err, "Body failed while collecting, request left unsendable");
            *slot = failed_body(err.to_string());
            Err(err)
        }
    }
}

/// Body whose only chunk is an error carrying `message`
fn failed_body(message: String) -> ::reqwest::Body {
    let failure = futures::stream::once(async move {
        Err::<Bytes, _>(std::io::Error::other(message))
    });
    ::reqwest::Body::wrap_stream(failure)
}

/// Sync adapter for `reqwest::Request`
///
/// Streaming bodies cannot be read without an executor and fail with
/// [`CurlifyError::StreamingBody`]; translate such requests through the
/// async path.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReqwestAdapter;

impl Dispatch for ReqwestAdapter {
    fn name(&self) -> &'static str {
        type_name::<::reqwest::Request>()
    }

    fn recognizes(&self, request: &dyn Any) -> bool {
        request.is::<::reqwest::Request>()
    }
}

impl Adapter for ReqwestAdapter {
    fn bind<'r>(&self, request: &'r dyn Any) -> Result<Box<dyn RequestData + 'r>> {
        let request = request
            .downcast_ref::<::reqwest::Request>()
            .ok_or_else(|| CurlifyError::expected::<::reqwest::Request>())?;
        Ok(Box::new(request))
    }
}

impl RequestData for &::reqwest::Request {
    fn body(&mut self) -> Result<Option<Body>> {
        let Some(body) = ::reqwest::Request::body(*self) else {
            return Ok(None);
        };
        match body.as_bytes() {
            Some(buffered) => Ok(Some(Body::decode(Bytes::copy_from_slice(buffered)))),
            None => Err(CurlifyError::streaming::<::reqwest::Request>()),
        }
    }
}

/// Async adapter for `reqwest::Request`
///
/// The body is collected once and stored back on the request as a buffered
/// body, so the request can still be sent afterwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncReqwestAdapter;

impl Dispatch for AsyncReqwestAdapter {
    fn name(&self) -> &'static str {
        type_name::<::reqwest::Request>()
    }

    fn recognizes(&self, request: &dyn Any) -> bool {
        request.is::<::reqwest::Request>()
    }
}

impl AsyncAdapter for AsyncReqwestAdapter {
    fn bind<'r>(
        &self,
        request: &'r mut (dyn Any + Send),
    ) -> Result<Box<dyn AsyncRequestData + 'r>> {
        let request = request
            .downcast_mut::<::reqwest::Request>()
            .ok_or_else(|| CurlifyError::expected::<::reqwest::Request>())?;
        Ok(Box::new(request))
    }
}

impl AsyncRequestData for &mut ::reqwest::Request {
    fn body(&mut self) -> BoxFuture<'_, Result<Option<Body>>> {
        Box::pin(async move {
            let Some(slot) = self.body_mut() else {
                return Ok(None);
            };
            let raw = read_reqwest_body(slot).await?;
            Ok(Some(Body::decode(raw)))
        })
    }
}

#[cfg(feature = "blocking")]
pub use self::blocking::BlockingReqwestAdapter;

#[cfg(feature = "blocking")]
mod blocking {
    use super::*;

    use ::reqwest::blocking::Request;

    impl RequestParts for Request {
        fn method(&self) -> String {
            self.method().as_str().to_string()
        }

        fn url(&self) -> String {
            self.url().as_str().to_string()
        }

        fn raw_headers(&self) -> Vec<(String, String)> {
            header_pairs(self.headers())
        }
    }

    /// Sync adapter for `reqwest::blocking::Request`
    ///
    /// Reader-backed bodies fail with [`CurlifyError::StreamingBody`].
    #[derive(Debug, Default, Clone, Copy)]
    pub struct BlockingReqwestAdapter;

    impl Dispatch for BlockingReqwestAdapter {
        fn name(&self) -> &'static str {
            type_name::<Request>()
        }

        fn recognizes(&self, request: &dyn Any) -> bool {
            request.is::<Request>()
        }
    }

    impl Adapter for BlockingReqwestAdapter {
        fn bind<'r>(&self, request: &'r dyn Any) -> Result<Box<dyn RequestData + 'r>> {
            let request = request
                .downcast_ref::<Request>()
                .ok_or_else(|| CurlifyError::expected::<Request>())?;
            Ok(Box::new(request))
        }
    }

    impl RequestData for &Request {
        fn body(&mut self) -> Result<Option<Body>> {
            let Some(body) = Request::body(*self) else {
                return Ok(None);
            };
            match body.as_bytes() {
                Some(buffered) => Ok(Some(Body::decode(Bytes::copy_from_slice(buffered)))),
                None => Err(CurlifyError::streaming::<Request>()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;
    use ::reqwest::{Method, Url};

    fn request(method: Method, url: &str) -> ::reqwest::Request {
        ::reqwest::Request::new(method, Url::parse(url).unwrap())
    }

    #[test]
    fn test_sync_buffered_body() {
        let mut req = request(Method::POST, "https://example.com/post");
        *req.body_mut() = Some(::reqwest::Body::from("foo"));
        let mut data = ReqwestAdapter.bind(&req).unwrap();
        let snapshot = Snapshot::capture(data.as_mut()).unwrap();
        assert_eq!(snapshot.method, "POST");
        assert_eq!(snapshot.url, "https://example.com/post");
        assert_eq!(snapshot.body, Some(Body::from("foo")));
    }

    #[test]
    fn test_sync_no_body() {
        let req = request(Method::GET, "https://example.com/get");
        let mut data = ReqwestAdapter.bind(&req).unwrap();
        assert_eq!(data.body().unwrap(), None);
    }

    #[test]
    fn test_sync_binary_body_kept_raw() {
        let mut req = request(Method::PUT, "https://example.com/put");
        *req.body_mut() = Some(::reqwest::Body::from(vec![0x7f, 0xff, 0x00]));
        let mut data = ReqwestAdapter.bind(&req).unwrap();
        assert_eq!(
            data.body().unwrap(),
            Some(Body::Bytes(Bytes::from_static(&[0x7f, 0xff, 0x00])))
        );
    }

    #[test]
    fn test_does_not_recognize_http_request() {
        let req = ::http::Request::new(Bytes::new());
        assert!(!ReqwestAdapter.recognizes(&req));
        assert!(!AsyncReqwestAdapter.recognizes(&req));
    }

    #[tokio::test]
    async fn test_async_stream_body_is_restored() {
        let chunks: Vec<std::result::Result<&'static str, std::io::Error>> =
            vec![Ok("hello "), Ok("world")];
        let mut req = request(Method::POST, "https://example.com/post");
        *req.body_mut() = Some(::reqwest::Body::wrap_stream(futures::stream::iter(chunks)));

        {
            let mut data = AsyncReqwestAdapter.bind(&mut req).unwrap();
            assert_eq!(data.body().await.unwrap(), Some(Body::from("hello world")));
        }

        let restored = req.body().and_then(|b| b.as_bytes());
        assert_eq!(restored, Some(&b"hello world"[..]));
    }

    #[tokio::test]
    async fn test_async_stream_failure_propagates() {
        let chunks: Vec<std::result::Result<&'static str, std::io::Error>> = vec![
            Ok("partial"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let mut req = request(Method::POST, "https://example.com/post");
        *req.body_mut() = Some(::reqwest::Body::wrap_stream(futures::stream::iter(chunks)));

        {
            let mut data = AsyncReqwestAdapter.bind(&mut req).unwrap();
            let err = data.body().await.unwrap_err();
            assert!(matches!(err, CurlifyError::Body(_)));
        }

        // The request is left with a body that fails again rather than an empty one
        let body = req.body_mut().take().unwrap();
        assert!(body.as_bytes().is_none());
        let resent = http_body_util::BodyExt::collect(body).await;
        assert!(resent.is_err());
    }

    #[test]
    fn test_sync_stream_body_is_an_error() {
        let chunks: Vec<std::result::Result<&'static str, std::io::Error>> = vec![Ok("hidden")];
        let mut req = request(Method::POST, "https://example.com/post");
        *req.body_mut() = Some(::reqwest::Body::wrap_stream(futures::stream::iter(chunks)));

        let mut data = ReqwestAdapter.bind(&req).unwrap();
        let err = data.body().unwrap_err();
        assert!(matches!(err, CurlifyError::StreamingBody { .. }), "{:?}", err);
    }
}
