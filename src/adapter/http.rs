//! Adapters for `http::Request<B>`
//!
//! The sync adapter covers buffered body types. With the `http-body`
//! feature, the async adapter covers any `http_body::Body` that must be
//! collected first.

use std::any::{type_name, Any};
use std::marker::PhantomData;

use ::http::header::HOST;
use ::http::{HeaderMap, Request, Uri};
use bytes::Bytes;
#[cfg(feature = "http-body")]
use futures::future::BoxFuture;
#[cfg(feature = "http-body")]
use http_body::Body as HttpBody;
#[cfg(feature = "http-body")]
use http_body_util::combinators::BoxBody;

use super::{header_pairs, Adapter, Dispatch, RequestData, RequestParts};
#[cfg(feature = "http-body")]
use super::{AsyncAdapter, AsyncRequestData};
#[cfg(feature = "http-body")]
use crate::errors::BoxError;
use crate::errors::{CurlifyError, Result};
use crate::snapshot::Body;

/// Body types whose bytes are available without I/O
pub trait BufferedBody: Send + Sync + 'static {
    /// Bytes of the body, `None` when the type carries no body at all
    fn buffered(&self) -> Option<Bytes>;
}

impl BufferedBody for Bytes {
    fn buffered(&self) -> Option<Bytes> {
        Some(self.clone())
    }
}

impl BufferedBody for Vec<u8> {
    fn buffered(&self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self))
    }
}

impl BufferedBody for String {
    fn buffered(&self) -> Option<Bytes> {
        Some(Bytes::copy_from_slice(self.as_bytes()))
    }
}

impl BufferedBody for &'static str {
    fn buffered(&self) -> Option<Bytes> {
        Some(Bytes::from_static(self.as_bytes()))
    }
}

impl BufferedBody for () {
    fn buffered(&self) -> Option<Bytes> {
        None
    }
}

impl<B> RequestParts for Request<B> {
    fn method(&self) -> String {
        self.method().as_str().to_string()
    }

    fn url(&self) -> String {
        request_url(self.uri(), self.headers())
    }

    fn raw_headers(&self) -> Vec<(String, String)> {
        header_pairs(self.headers())
    }
}

/// Absolute URL of a request target
///
/// Origin-form targets (`/path?query`, as received by servers) are resolved
/// against the `host` header.
pub fn request_url(uri: &Uri, headers: &HeaderMap) -> String {
    if uri.authority().is_some() {
        return uri.to_string();
    }

    let host = headers.get(HOST).and_then(|h| h.to_str().ok());
    match host {
        Some(host) => {
            let target = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
            format!("http://{}{}", host, target)
        }
        None => uri.to_string(),
    }
}

/// Sync adapter for `http::Request<B>` with a buffered body
pub struct HttpRequestAdapter<B> {
    _body: PhantomData<fn() -> B>,
}

impl<B> HttpRequestAdapter<B> {
    pub const fn new() -> Self {
        Self { _body: PhantomData }
    }
}

impl<B> Default for HttpRequestAdapter<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: BufferedBody> Dispatch for HttpRequestAdapter<B> {
    fn name(&self) -> &'static str {
        type_name::<Request<B>>()
    }

    fn recognizes(&self, request: &dyn Any) -> bool {
        request.is::<Request<B>>()
    }
}

impl<B: BufferedBody> Adapter for HttpRequestAdapter<B> {
    fn bind<'r>(&self, request: &'r dyn Any) -> Result<Box<dyn RequestData + 'r>> {
        let request = request
            .downcast_ref::<Request<B>>()
            .ok_or_else(|| CurlifyError::expected::<Request<B>>())?;
        Ok(Box::new(request))
    }
}

impl<B: BufferedBody> RequestData for &Request<B> {
    fn body(&mut self) -> Result<Option<Body>> {
        Ok(Request::body(*self).buffered().map(Body::decode))
    }
}

/// Drain `slot` once and store the collected bytes back through `restore`
///
/// If the body fails partway, `slot` is left holding `restore(Bytes::new())`
/// and the failure is returned as [`CurlifyError::Body`].
#[cfg(feature = "http-body")]
pub async fn read_once<B>(slot: &mut B, restore: fn(Bytes) -> B) -> Result<Bytes>
where
    B: HttpBody<Data = Bytes> + Send,
    B::Error: Into<BoxError>,
{
    use http_body_util::BodyExt;

    let body = std::mem::replace(slot, restore(Bytes::new()));
    let collected = body.collect().await.map_err(CurlifyError::body)?.to_bytes();
    *slot = restore(collected.clone());
    Ok(collected)
}

/// Rebuild a boxed body from collected bytes
#[cfg(feature = "http-body")]
fn boxed_body<E: 'static>(bytes: Bytes) -> BoxBody<Bytes, E> {
    use http_body_util::{BodyExt, Full};

    Full::new(bytes).map_err(|never| match never {}).boxed()
}

/// Async adapter for `http::Request<B>` whose body must be collected
///
/// Any `http_body::Body` yielding `Bytes` can be registered. The adapter
/// needs a way to put the collected bytes back on the request: `new` uses
/// `B: From<Bytes>`, `boxed` covers `BoxBody`, and `with_restore` takes any
/// function. Bodies that cannot be rebuilt from bytes, such as a server's
/// incoming body, should be collected into `Full<Bytes>` first.
#[cfg(feature = "http-body")]
pub struct AsyncHttpAdapter<B> {
    restore: fn(Bytes) -> B,
}

#[cfg(feature = "http-body")]
impl<B> AsyncHttpAdapter<B> {
    pub const fn with_restore(restore: fn(Bytes) -> B) -> Self {
        Self { restore }
    }
}

#[cfg(feature = "http-body")]
impl<B: From<Bytes>> AsyncHttpAdapter<B> {
    pub fn new() -> Self {
        Self::with_restore(B::from)
    }
}

#[cfg(feature = "http-body")]
impl<B: From<Bytes>> Default for AsyncHttpAdapter<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http-body")]
impl<E: 'static> AsyncHttpAdapter<BoxBody<Bytes, E>> {
    pub fn boxed() -> Self {
        Self::with_restore(boxed_body::<E>)
    }
}

#[cfg(feature = "http-body")]
impl<B> Dispatch for AsyncHttpAdapter<B>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    fn name(&self) -> &'static str {
        type_name::<Request<B>>()
    }

    fn recognizes(&self, request: &dyn Any) -> bool {
        request.is::<Request<B>>()
    }
}

#[cfg(feature = "http-body")]
impl<B> AsyncAdapter for AsyncHttpAdapter<B>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    fn bind<'r>(
        &self,
        request: &'r mut (dyn Any + Send),
    ) -> Result<Box<dyn AsyncRequestData + 'r>> {
        let request = request
            .downcast_mut::<Request<B>>()
            .ok_or_else(|| CurlifyError::expected::<Request<B>>())?;
        Ok(Box::new(BoundHttpRequest {
            request,
            restore: self.restore,
        }))
    }
}

#[cfg(feature = "http-body")]
struct BoundHttpRequest<'r, B> {
    request: &'r mut Request<B>,
    restore: fn(Bytes) -> B,
}

#[cfg(feature = "http-body")]
impl<B> RequestParts for BoundHttpRequest<'_, B> {
    fn method(&self) -> String {
        RequestParts::method(&*self.request)
    }

    fn url(&self) -> String {
        RequestParts::url(&*self.request)
    }

    fn raw_headers(&self) -> Vec<(String, String)> {
        RequestParts::raw_headers(&*self.request)
    }
}

#[cfg(feature = "http-body")]
impl<B> AsyncRequestData for BoundHttpRequest<'_, B>
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    fn body(&mut self) -> BoxFuture<'_, Result<Option<Body>>> {
        Box::pin(async move {
            let raw = read_once(self.request.body_mut(), self.restore).await?;
            Ok(Some(Body::decode(raw)))
        })
    }
}
