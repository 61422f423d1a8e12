//! Same-origin image relay client.
//!
//! Externally hosted template/source images must be fetched through the
//! proxy gateway (`GET /image-proxy?url=<encoded>`) before their pixels are
//! composited; fetching them from their original origin would leave the
//! canvas unreadable in the hosting frontend. The engine treats the relay as
//! a black box behind the [`ImageFetcher`] seam.
//!
//! The HTTP-backed [`ProxyGateway`] requires the `gateway` feature:
//!
//! ```toml
//! [dependencies]
//! labelcraft-renderer = { version = "0.1", features = ["gateway"] }
//! ```

use std::collections::HashMap;

use crate::error::{CraftError, CraftResult};

/// Source of raw image bytes for the template loader.
///
/// Implementations decide where bytes come from; the loader only requires
/// that a non-success fetch surfaces as an error instead of partial bytes.
pub trait ImageFetcher {
    /// Fetches the raw encoded bytes of the image at `url`.
    fn fetch(&self, url: &str) -> CraftResult<Vec<u8>>;
}

/// An in-memory fetcher for tests and offline pipelines.
///
/// Serves bytes registered ahead of time; unknown URLs fail with a load
/// error, which is exactly how a missing upstream asset presents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bytes served for `url`.
    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(url.into(), bytes);
    }
}

impl ImageFetcher for MemoryFetcher {
    fn fetch(&self, url: &str) -> CraftResult<Vec<u8>> {
        self.entries
            .get(url)
            .cloned()
            .ok_or_else(|| CraftError::load(format!("no bytes registered for {url}")))
    }
}

#[cfg(feature = "gateway")]
pub use self::http::ProxyGateway;

#[cfg(feature = "gateway")]
mod http {
    use super::ImageFetcher;
    use crate::error::{CraftError, CraftResult};

    /// Blocking HTTP client for the same-origin image relay.
    ///
    /// Builds `{base}/image-proxy?url=<encoded source url>` and returns the
    /// raw body bytes. Any non-2xx upstream status is a proxy error.
    pub struct ProxyGateway {
        base: String,
        client: reqwest::blocking::Client,
    }

    impl ProxyGateway {
        /// Creates a gateway client rooted at `base`, e.g. `http://localhost:3000`.
        pub fn new(base: impl Into<String>) -> Self {
            Self {
                base: base.into(),
                client: reqwest::blocking::Client::new(),
            }
        }

        fn endpoint(&self, source_url: &str) -> CraftResult<reqwest::Url> {
            let mut url =
                reqwest::Url::parse(&format!("{}/image-proxy", self.base.trim_end_matches('/')))
                    .map_err(|e| CraftError::proxy(&self.base, format!("bad base url: {e}")))?;
            url.query_pairs_mut().append_pair("url", source_url);
            Ok(url)
        }
    }

    impl ImageFetcher for ProxyGateway {
        fn fetch(&self, url: &str) -> CraftResult<Vec<u8>> {
            let endpoint = self.endpoint(url)?;
            tracing::debug!(%endpoint, "fetching image through proxy");

            let response = self
                .client
                .get(endpoint.clone())
                .send()
                .map_err(|e| CraftError::proxy(endpoint.as_str(), e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(CraftError::proxy(
                    endpoint.as_str(),
                    format!("status {status}"),
                ));
            }

            let bytes = response
                .bytes()
                .map_err(|e| CraftError::proxy(endpoint.as_str(), e.to_string()))?;
            Ok(bytes.to_vec())
        }
    }

}
