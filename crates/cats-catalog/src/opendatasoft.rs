use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::session::HttpSession;
use crate::{OdsExplorer, ResourceDescriptor, ResourceLink};

const CATALOG_PATH: &str = "/api/explore/v2.1/catalog";

/// Page size used when walking the dataset catalog.
pub const ODS_PAGE_SIZE: usize = 100;

/// The Explore API refuses offsets past this point.
const ODS_MAX_OFFSET: usize = 10_000;

/// OpenDataSoft Explore API v2.1 client.
pub struct OpenDataSoftClient {
    session: HttpSession,
}

impl OpenDataSoftClient {
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }

    async fn catalog(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.session.url(&format!("{CATALOG_PATH}{path}"), query)?;
        self.session.get_json(url).await
    }

    async fn dataset(&self, segments: &[&str]) -> Result<Value> {
        let url = self
            .session
            .segment_url(&format!("{CATALOG_PATH}/datasets"), segments, &[])?;
        self.session.get_json(url).await
    }
}

#[async_trait]
impl OdsExplorer for OpenDataSoftClient {
    async fn check_health(&self) -> Result<()> {
        self.catalog("/datasets", &[("limit", "1")]).await?;
        Ok(())
    }

    async fn list_datasets(&self) -> Result<Vec<String>> {
        let limit = ODS_PAGE_SIZE.to_string();
        let mut ids = Vec::new();
        let mut offset = 0;
        let mut total = None;

        while offset < ODS_MAX_OFFSET {
            let offset_param = offset.to_string();
            let page = self
                .catalog("/datasets", &[("limit", &limit), ("offset", &offset_param)])
                .await?;

            let results = page
                .get("results")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default();
            let fetched = results.len();

            ids.extend(results.iter().filter_map(|d| {
                d.get("dataset_id")
                    .and_then(Value::as_str)
                    .map(String::from)
            }));

            total = page
                .get("total_count")
                .and_then(Value::as_u64)
                .map(|t| t as usize);

            offset += fetched;
            if fetched < ODS_PAGE_SIZE || total.is_some_and(|t| offset >= t) {
                break;
            }
        }

        if offset >= ODS_MAX_OFFSET && total.map_or(true, |t| t > offset) {
            tracing::warn!(
                listed = ids.len(),
                total_count = ?total,
                max_offset = ODS_MAX_OFFSET,
                "OpenDataSoft dataset listing truncated at the API offset limit"
            );
        }

        tracing::debug!(count = ids.len(), "listed OpenDataSoft datasets");
        Ok(ids)
    }

    async fn dataset_info(&self, id: &str) -> Result<Value> {
        self.dataset(&[id]).await
    }

    async fn dataset_export_options(&self, id: &str) -> Result<Option<ResourceDescriptor>> {
        let exports = self.dataset(&[id, "exports"]).await?;

        let links: Vec<ResourceLink> = exports
            .get("links")
            .and_then(Value::as_array)
            .map(|links| {
                links
                    .iter()
                    .filter_map(|link| {
                        let rel = link.get("rel").and_then(Value::as_str)?;
                        let href = link.get("href").and_then(Value::as_str)?;
                        if rel == "self" {
                            return None;
                        }
                        Some(ResourceLink {
                            name: None,
                            format: rel.to_string(),
                            url: href.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if links.is_empty() {
            return Ok(None);
        }
        Ok(Some(ResourceDescriptor::new(id, links)))
    }
}
