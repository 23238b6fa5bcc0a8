use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::{CatalogDescriptor, CatalogSession, Protocol};

struct SessionInner {
    protocol: Protocol,
    endpoint: String,
    client: reqwest::Client,
    open: AtomicBool,
}

/// HTTP session shared by the explorer and loader of one connection.
///
/// Cloning is cheap; every clone observes the same open/closed state.
#[derive(Clone)]
pub struct HttpSession {
    inner: Arc<SessionInner>,
}

impl HttpSession {
    pub fn start(descriptor: &CatalogDescriptor, timeout: Duration) -> Result<Self> {
        let endpoint = descriptor.endpoint.trim_end_matches('/').to_string();
        Url::parse(&endpoint)
            .map_err(|e| anyhow!("Invalid endpoint '{}': {}", descriptor.endpoint, e))?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        tracing::debug!(
            catalog = %descriptor.name,
            protocol = %descriptor.protocol,
            endpoint = %endpoint,
            "session started"
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                protocol: descriptor.protocol,
                endpoint,
                client,
                open: AtomicBool::new(true),
            }),
        })
    }

    /// Absolute URL for `path` under the endpoint, with query pairs appended.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.endpoint, path))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Like [`HttpSession::url`], with each of `segments` appended to `path`
    /// as one percent-encoded path segment. Use it for user-supplied ids so
    /// `/`, `?` and `#` stay part of the id.
    pub fn segment_url(
        &self,
        path: &str,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            bail!("Invalid identifier: {bad}");
        }

        let mut url = self.url(path, query)?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Endpoint {} cannot take a path", self.inner.endpoint))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.is_open() {
            bail!("Session for {} is closed", self.inner.endpoint);
        }
        Ok(())
    }

    /// GET a URL, returning the response whatever its status.
    pub async fn get(&self, url: Url, api_key: Option<&str>) -> Result<reqwest::Response> {
        self.ensure_open()?;
        tracing::debug!(url = %url, "GET");

        let mut request = self.inner.client.get(url);
        if let Some(key) = api_key {
            request = request.header("Authorization", format!("Apikey {key}"));
        }

        Ok(request.send().await?)
    }

    /// GET a URL and decode a JSON body, failing on non-success status.
    pub async fn get_json(&self, url: Url) -> Result<Value> {
        let response = self.get(url.clone(), None).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "request failed");
            bail!("Request to {} failed: {}", url, status);
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| anyhow!("Invalid JSON from {}: {}", url, e))
    }

    /// GET a URL and return its body as text, failing on non-success status.
    pub async fn get_text(&self, url: Url, api_key: Option<&str>) -> Result<String> {
        let response = self.get(url.clone(), api_key).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "download failed");
            bail!("Download from {} failed: {}", url, status);
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl CatalogSession for HttpSession {
    fn protocol(&self) -> Protocol {
        self.inner.protocol
    }

    fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::SeqCst)
    }

    async fn close(&self) -> Result<()> {
        if !self.inner.open.swap(false, Ordering::SeqCst) {
            bail!("Session for {} is already closed", self.inner.endpoint);
        }
        tracing::debug!(endpoint = %self.inner.endpoint, "session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(endpoint: &str) -> CatalogDescriptor {
        CatalogDescriptor::new("test", Protocol::Ckan, endpoint)
    }

    #[test]
    fn test_start_rejects_invalid_endpoint() {
        assert!(HttpSession::start(&descriptor("not a url"), Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_url_joins_path_and_query() {
        let session =
            HttpSession::start(&descriptor("https://data.example.org/"), Duration::from_secs(1))
                .unwrap();
        let url = session
            .url("/api/3/action/package_search", &[("q", "air quality"), ("rows", "5")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.example.org/api/3/action/package_search?q=air+quality&rows=5"
        );
    }

    #[test]
    fn test_segment_url_keeps_ids_in_one_segment() {
        let session =
            HttpSession::start(&descriptor("https://data.example.org"), Duration::from_secs(1))
                .unwrap();

        let url = session
            .segment_url("/api/datasets", &["../exports/secret", "exports"], &[])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.example.org/api/datasets/..%2Fexports%2Fsecret/exports"
        );

        let url = session.segment_url("/api/datasets", &["a?limit=1#x", ""], &[]).unwrap();
        assert_eq!(url.as_str(), "https://data.example.org/api/datasets/a%3Flimit=1%23x/");
        assert_eq!(url.query(), None);

        assert!(session.segment_url("/api/datasets", &[".."], &[]).is_err());
    }

    #[tokio::test]
    async fn test_close_is_shared_between_clones() {
        let session =
            HttpSession::start(&descriptor("https://data.example.org"), Duration::from_secs(1))
                .unwrap();
        let clone = session.clone();

        session.close().await.unwrap();
        assert!(!clone.is_open());
        assert!(clone.close().await.is_err());

        let url = clone.url("/health", &[]).unwrap();
        assert!(clone.get_json(url).await.is_err());
    }
}
