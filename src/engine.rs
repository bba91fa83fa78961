//! Translation engine
//!
//! Binds an adapter, captures a [`Snapshot`] and synthesizes the command.
//! The only suspension point is the async body read.

use std::any::Any;

use tracing::debug;

use crate::adapter::{Adapter, AsyncAdapter};
use crate::curl::to_curl_string;
use crate::errors::{CurlifyError, Result};
use crate::registry::{default_adapters, default_async_adapters, AdapterRegistry};
use crate::snapshot::Snapshot;

/// Request-to-curl translator holding its sync and async adapter lists
pub struct Curlify {
    adapters: AdapterRegistry<dyn Adapter>,
    async_adapters: AdapterRegistry<dyn AsyncAdapter>,
}

impl Default for Curlify {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Curlify {
    pub fn builder() -> CurlifyBuilder {
        CurlifyBuilder::new()
    }

    pub fn adapters(&self) -> &AdapterRegistry<dyn Adapter> {
        &self.adapters
    }

    pub fn async_adapters(&self) -> &AdapterRegistry<dyn AsyncAdapter> {
        &self.async_adapters
    }

    /// Capture `request` through the sync adapters
    pub fn snapshot<R: Any>(&self, request: &R) -> Result<Snapshot> {
        let adapter = self
            .adapters
            .select(request)
            .ok_or_else(CurlifyError::unrecognized::<R>)?;
        let mut data = adapter.bind(request)?;
        Snapshot::capture(data.as_mut())
    }

    /// Capture `request` through the async adapters, falling back to the
    /// sync adapters when none matches
    pub async fn snapshot_async<R: Any + Send>(&self, request: &mut R) -> Result<Snapshot> {
        let Some(adapter) = self.async_adapters.select(&*request) else {
            debug!(
                request = std::any::type_name::<R>(),
                "No async adapter matched, falling back to sync adapters"
            );
            return self.snapshot(&*request);
        };

        let mut data = adapter.bind(request)?;
        Snapshot::capture_async(data.as_mut()).await
    }

    /// Translate a request whose body is available synchronously
    pub fn to_curl<R: Any>(&self, request: &R) -> Result<String> {
        let snapshot = self.snapshot(request)?;
        Ok(to_curl_string(&snapshot))
    }

    /// Translate a request whose body may need to be awaited
    pub async fn to_curl_async<R: Any + Send>(&self, request: &mut R) -> Result<String> {
        let snapshot = self.snapshot_async(request).await?;
        Ok(to_curl_string(&snapshot))
    }
}

/// Builder for [`Curlify`]
///
/// Built-in adapters come first, custom adapters after them, so a custom
/// adapter claiming a built-in type takes precedence.
pub struct CurlifyBuilder {
    include_defaults: bool,
    adapters: Vec<Box<dyn Adapter>>,
    async_adapters: Vec<Box<dyn AsyncAdapter>>,
}

impl CurlifyBuilder {
    pub fn new() -> Self {
        Self {
            include_defaults: true,
            adapters: Vec::new(),
            async_adapters: Vec::new(),
        }
    }

    /// Skip the built-in adapters
    pub fn without_defaults(mut self) -> Self {
        self.include_defaults = false;
        self
    }

    /// Append a sync adapter
    pub fn adapter(mut self, adapter: impl Adapter + 'static) -> Self {
        self.adapters.push(Box::new(adapter));
        self
    }

    /// Append an async adapter
    pub fn async_adapter(mut self, adapter: impl AsyncAdapter + 'static) -> Self {
        self.async_adapters.push(Box::new(adapter));
        self
    }

    pub fn build(self) -> Curlify {
        let (mut adapters, mut async_adapters) = if self.include_defaults {
            (default_adapters(), default_async_adapters())
        } else {
            (Vec::new(), Vec::new())
        };
        adapters.extend(self.adapters);
        async_adapters.extend(self.async_adapters);

        Curlify {
            adapters: AdapterRegistry::new(adapters),
            async_adapters: AdapterRegistry::new(async_adapters),
        }
    }
}

impl Default for CurlifyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Dispatch, RequestData, RequestParts};
    use crate::snapshot::Body;
    use bytes::Bytes;

    /// Request type owned by the tests
    struct Fixture {
        url: &'static str,
        body: Option<&'static str>,
    }

    impl RequestParts for Fixture {
        fn method(&self) -> String {
            "PUT".to_string()
        }

        fn url(&self) -> String {
            self.url.to_string()
        }

        fn raw_headers(&self) -> Vec<(String, String)> {
            vec![("X-Fixture".to_string(), "yes".to_string())]
        }
    }

    impl RequestData for &Fixture {
        fn body(&mut self) -> Result<Option<Body>> {
            Ok(self.body.map(Body::from))
        }
    }

    struct FixtureAdapter;

    impl Dispatch for FixtureAdapter {
        fn name(&self) -> &'static str {
            "fixture"
        }

        fn recognizes(&self, request: &dyn Any) -> bool {
            request.is::<Fixture>()
        }
    }

    impl Adapter for FixtureAdapter {
        fn bind<'r>(&self, request: &'r dyn Any) -> Result<Box<dyn RequestData + 'r>> {
            let request = request
                .downcast_ref::<Fixture>()
                .ok_or_else(CurlifyError::expected::<Fixture>)?;
            Ok(Box::new(request))
        }
    }

    static OVERRIDE: Fixture = Fixture {
        url: "https://override.test/",
        body: None,
    };

    /// Claims `http::Request<Bytes>` but renders a fixed request
    struct OverridingAdapter;

    impl Dispatch for OverridingAdapter {
        fn name(&self) -> &'static str {
            "override"
        }

        fn recognizes(&self, request: &dyn Any) -> bool {
            request.is::<::http::Request<Bytes>>()
        }
    }

    impl Adapter for OverridingAdapter {
        fn bind<'r>(&self, _request: &'r dyn Any) -> Result<Box<dyn RequestData + 'r>> {
            Ok(Box::new(&OVERRIDE))
        }
    }

    #[test]
    fn test_custom_adapter() {
        let engine = Curlify::builder().without_defaults().adapter(FixtureAdapter).build();
        let request = Fixture {
            url: "https://example.com/put",
            body: Some("x=1"),
        };
        assert_eq!(
            engine.to_curl(&request).unwrap(),
            "curl -X PUT -H 'x-fixture: yes' -H 'content-type: plain/text' -d 'x=1' https://example.com/put"
        );
    }

    #[test]
    fn test_unrecognized_request_kind() {
        let engine = Curlify::builder().without_defaults().build();
        let err = engine.to_curl(&42u8).unwrap_err();
        assert!(matches!(err, CurlifyError::UnrecognizedRequestKind { ref type_name } if type_name == "u8"));
    }

    #[test]
    fn test_later_adapter_wins() {
        let engine = Curlify::builder().adapter(OverridingAdapter).build();
        let request = ::http::Request::get("https://example.com/").body(Bytes::new()).unwrap();
        assert_eq!(engine.to_curl(&request).unwrap(), "curl -X PUT -H 'x-fixture: yes' https://override.test/");
    }

    #[tokio::test]
    async fn test_async_falls_back_to_sync_adapters() {
        let engine = Curlify::builder().without_defaults().adapter(FixtureAdapter).build();
        let mut request = Fixture {
            url: "https://example.com/put",
            body: None,
        };
        assert_eq!(
            engine.to_curl_async(&mut request).await.unwrap(),
            "curl -X PUT -H 'x-fixture: yes' https://example.com/put"
        );
    }

    #[tokio::test]
    async fn test_async_unrecognized_after_fallback() {
        let engine = Curlify::builder().without_defaults().build();
        let err = engine.to_curl_async(&mut 1.5f64).await.unwrap_err();
        assert!(matches!(err, CurlifyError::UnrecognizedRequestKind { .. }));
    }
}
