use crate::extractor::default::DEFAULT_UA;

use super::{super::media::media_info::MediaInfo, error::ExtractorError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use rustc_hash::FxHashMap;
use std::str::FromStr;
use tracing::debug;

/// Base extractor shared by every platform.
///
/// Holds the page URL under extraction together with a per-instance header
/// map. Headers live on the instance, never on the shared `Client`, so
/// reusing the client across extractors cannot leak one platform's headers
/// into another's requests.
#[derive(Debug, Clone)]
pub struct Extractor {
    // url to extract from, e.g., "https://picarto.tv/somechannel"
    pub url: String,
    // name of the platform, e.g., "Picarto", "Pluzz"...
    pub platform_name: String,
    // The reqwest client
    pub client: Client,
    // platform-specific headers
    platform_headers: HeaderMap,
}

impl Extractor {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        client: Client,
    ) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            reqwest::header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_UA),
        );
        default_headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        // No `Accept-Encoding` here: reqwest adds it (and transparently
        // decompresses) for the enabled codec features unless overridden.

        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            client,
            platform_headers: default_headers,
        }
    }

    #[inline]
    pub fn set_referer_static(&mut self, referer: &'static str) {
        self.platform_headers
            .insert(reqwest::header::REFERER, HeaderValue::from_static(referer));
    }

    pub fn add_header_str<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderName::from_str(key.as_ref()) {
            Ok(name) => match HeaderValue::from_str(value.as_ref()) {
                Ok(value) => {
                    self.platform_headers.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, "Invalid header name; skipping");
            }
        }
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .headers(self.platform_headers.clone())
    }

    pub fn get_platform_headers(&self) -> &HeaderMap {
        &self.platform_headers
    }

    pub fn get_platform_headers_map(&self) -> FxHashMap<String, String> {
        // Headers are consumed by callers (MediaInfo stores owned Strings),
        // so we must allocate.
        let mut headers_map =
            FxHashMap::with_capacity_and_hasher(self.platform_headers.len(), Default::default());

        for (key, value) in &self.platform_headers {
            if let Ok(value) = value.to_str() {
                headers_map.insert(key.as_str().to_owned(), value.to_owned());
            }
        }

        headers_map
    }
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync + std::fmt::Debug {
    fn get_extractor(&self) -> &Extractor;

    fn get_platform_headers(&self) -> &HeaderMap {
        self.get_extractor().get_platform_headers()
    }

    async fn extract(&self) -> Result<MediaInfo, ExtractorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_present() {
        let extractor = Extractor::new("Test", "https://example.com", crate::extractor::default::default_client());
        let headers = extractor.get_platform_headers();
        assert_eq!(
            headers
                .get(reqwest::header::USER_AGENT)
                .and_then(|v| v.to_str().ok()),
            Some(DEFAULT_UA)
        );
        assert!(headers.contains_key(reqwest::header::ACCEPT));
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let mut extractor = Extractor::new("Test", "https://example.com", crate::extractor::default::default_client());
        let before = extractor.get_platform_headers().len();
        extractor.add_header_str("bad header name", "value");
        assert_eq!(extractor.get_platform_headers().len(), before);
    }

    #[test]
    fn test_headers_map_is_owned_copy() {
        let mut extractor = Extractor::new("Test", "https://example.com", crate::extractor::default::default_client());
        extractor.set_referer_static("https://example.com");
        let map = extractor.get_platform_headers_map();
        assert_eq!(map.get("referer").map(String::as_str), Some("https://example.com"));
    }
}
