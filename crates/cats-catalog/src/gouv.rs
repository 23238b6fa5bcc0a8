use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::session::HttpSession;
use crate::{GouvExplorer, ResourceDescriptor, ResourceLink};

const API_PATH: &str = "/api/1";
const PAGE_SIZE: &str = "100";

pub const DEFAULT_MAX_PAGES: usize = 5;

/// data.gouv.fr API v1 client.
pub struct GouvClient {
    session: HttpSession,
    max_pages: usize,
}

impl GouvClient {
    pub fn new(session: HttpSession) -> Self {
        Self {
            session,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Walks a paginated listing, taking `field` (or `fallback`) from every
    /// entry of `data`, following `next_page` for at most `max_pages` pages.
    async fn collect_pages(&self, path: &str, field: &str, fallback: &str) -> Result<Vec<String>> {
        let mut url = self
            .session
            .url(&format!("{API_PATH}{path}"), &[("page_size", PAGE_SIZE)])?;
        let mut values = Vec::new();

        for _ in 0..self.max_pages {
            let page = self.session.get_json(url).await?;

            if let Some(entries) = page.get("data").and_then(Value::as_array) {
                values.extend(entries.iter().filter_map(|entry| {
                    entry
                        .get(field)
                        .or_else(|| entry.get(fallback))
                        .and_then(Value::as_str)
                        .map(String::from)
                }));
            }

            match page.get("next_page").and_then(Value::as_str) {
                Some(next) if !next.is_empty() => url = Url::parse(next)?,
                _ => break,
            }
        }

        Ok(values)
    }
}

fn resource_link(resource: &Value) -> Option<ResourceLink> {
    let url = resource
        .get("url")
        .and_then(Value::as_str)
        .filter(|u| !u.is_empty())?;
    Some(ResourceLink {
        name: resource
            .get("title")
            .and_then(Value::as_str)
            .map(String::from),
        format: resource
            .get("format")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        url: url.to_string(),
    })
}

#[async_trait]
impl GouvExplorer for GouvClient {
    async fn check_health(&self) -> Result<()> {
        let url = self.session.url(&format!("{API_PATH}/site/"), &[])?;
        self.session.get_json(url).await?;
        Ok(())
    }

    async fn list_datasets(&self) -> Result<Vec<String>> {
        self.collect_pages("/datasets/", "slug", "id").await
    }

    async fn list_organisations(&self) -> Result<Vec<String>> {
        self.collect_pages("/organizations/", "name", "slug").await
    }

    async fn dataset_meta(&self, id: &str) -> Result<Value> {
        let url = self
            .session
            .segment_url(&format!("{API_PATH}/datasets"), &[id, ""], &[])?;
        self.session.get_json(url).await
    }

    fn resource_meta(&self, dataset_meta: &Value, resource_id: Option<&str>) -> Result<Value> {
        let resources = dataset_meta
            .get("resources")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("Dataset has no resources"))?;

        let Some(resource_id) = resource_id else {
            return Ok(Value::Array(resources.clone()));
        };

        match resources
            .iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(resource_id))
        {
            Some(resource) => Ok(resource.clone()),
            None => bail!("No resource found with ID: {}", resource_id),
        }
    }

    fn resource_descriptor(&self, dataset_meta: &Value) -> Option<ResourceDescriptor> {
        let dataset_id = dataset_meta
            .get("slug")
            .or_else(|| dataset_meta.get("id"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let links: Vec<ResourceLink> = dataset_meta
            .get("resources")?
            .as_array()?
            .iter()
            .filter_map(resource_link)
            .collect();

        if links.is_empty() {
            return None;
        }
        Some(ResourceDescriptor::new(dataset_id, links))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::{CatalogDescriptor, Protocol};

    fn client() -> GouvClient {
        let descriptor = CatalogDescriptor::new("french-gov", Protocol::GouvFr, "https://www.data.gouv.fr");
        GouvClient::new(HttpSession::start(&descriptor, Duration::from_secs(1)).unwrap())
    }

    fn meta() -> Value {
        json!({
            "id": "5e7",
            "slug": "air-quality",
            "resources": [
                {"id": "r1", "title": "Stations", "format": "csv", "url": "https://static.data.gouv.fr/r1.csv"},
                {"id": "r2", "title": "Docs", "format": "pdf", "url": ""}
            ]
        })
    }

    #[test]
    fn test_resource_meta_picks_resource_by_id() {
        let resource = client().resource_meta(&meta(), Some("r1")).unwrap();
        assert_eq!(resource["title"], "Stations");
    }

    #[test]
    fn test_resource_meta_without_id_returns_all() {
        let resources = client().resource_meta(&meta(), None).unwrap();
        assert_eq!(resources.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_resource_meta_unknown_id_fails() {
        let err = client().resource_meta(&meta(), Some("zz")).unwrap_err();
        assert_eq!(err.to_string(), "No resource found with ID: zz");
    }

    #[test]
    fn test_resource_descriptor_skips_resources_without_url() {
        let descriptor = client().resource_descriptor(&meta()).unwrap();
        assert_eq!(descriptor.dataset_id, "air-quality");
        assert_eq!(descriptor.formats(), vec!["csv".to_string()]);
    }
}
