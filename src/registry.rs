//! Ordered adapter lists and adapter selection

use std::any::Any;

use bytes::Bytes;
use tracing::{debug, trace};

use crate::adapter::http::HttpRequestAdapter;
use crate::adapter::{Adapter, AsyncAdapter, Dispatch};

/// Ordered collection of adapters, immutable once built
pub struct AdapterRegistry<A: ?Sized> {
    adapters: Vec<Box<A>>,
}

impl<A: ?Sized + Dispatch> AdapterRegistry<A> {
    pub fn new(adapters: Vec<Box<A>>) -> Self {
        Self { adapters }
    }

    /// Select the adapter for `request`
    ///
    /// Every candidate is evaluated and the last one that recognizes the
    /// value wins. Representation types are normally disjoint, so this only
    /// matters when two adapters claim the same type.
    pub fn select(&self, request: &dyn Any) -> Option<&A> {
        let mut selected = None;
        for adapter in &self.adapters {
            let matched = adapter.recognizes(request);
            trace!(adapter = adapter.name(), matched, "Evaluated adapter");
            if matched {
                selected = Some(adapter.as_ref());
            }
        }

        if let Some(adapter) = selected {
            debug!(adapter = adapter.name(), "Selected adapter");
        }
        selected
    }

    /// Adapter names in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Built-in sync adapters available with the enabled features
pub fn default_adapters() -> Vec<Box<dyn Adapter>> {
    let mut adapters: Vec<Box<dyn Adapter>> = Vec::new();
    adapters.push(Box::new(HttpRequestAdapter::<Bytes>::new()));
    adapters.push(Box::new(HttpRequestAdapter::<Vec<u8>>::new()));
    adapters.push(Box::new(HttpRequestAdapter::<String>::new()));
    adapters.push(Box::new(HttpRequestAdapter::<&'static str>::new()));
    adapters.push(Box::new(HttpRequestAdapter::<()>::new()));

    #[cfg(feature = "reqwest")]
    adapters.push(Box::new(crate::adapter::reqwest::ReqwestAdapter));

    #[cfg(feature = "blocking")]
    adapters.push(Box::new(crate::adapter::reqwest::BlockingReqwestAdapter));

    adapters
}

/// Built-in async adapters available with the enabled features
pub fn default_async_adapters() -> Vec<Box<dyn AsyncAdapter>> {
    #[allow(unused_mut)]
    let mut adapters: Vec<Box<dyn AsyncAdapter>> = Vec::new();

    #[cfg(feature = "reqwest")]
    adapters.push(Box::new(crate::adapter::reqwest::AsyncReqwestAdapter));

    #[cfg(feature = "http-body")]
    {
        use crate::adapter::http::AsyncHttpAdapter;
        use http_body_util::combinators::BoxBody;

        adapters.push(Box::new(AsyncHttpAdapter::<http_body_util::Full<Bytes>>::new()));
        adapters.push(Box::new(
            AsyncHttpAdapter::<BoxBody<Bytes, std::convert::Infallible>>::boxed(),
        ));
        adapters.push(Box::new(
            AsyncHttpAdapter::<BoxBody<Bytes, crate::errors::BoxError>>::boxed(),
        ));
    }

    #[cfg(feature = "reqwest")]
    adapters.push(Box::new(
        crate::adapter::http::AsyncHttpAdapter::<::reqwest::Body>::new(),
    ));

    adapters
}
