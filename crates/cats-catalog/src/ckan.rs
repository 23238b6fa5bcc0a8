use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::session::HttpSession;
use crate::{CkanExplorer, ResourceDescriptor, ResourceLink};

const ACTION_PATH: &str = "/api/3/action";

/// CKAN Action API v3 client.
pub struct CkanClient {
    session: HttpSession,
}

impl CkanClient {
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }

    /// Calls an action and unwraps the `{success, result, error}` envelope.
    ///
    /// CKAN reports most failures with a 4xx status and an envelope whose
    /// `error.message` is more useful than the status line, so the body is
    /// read regardless of status.
    async fn action(&self, name: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = self.session.url(&format!("{ACTION_PATH}/{name}"), query)?;
        let response = self.session.get(url.clone(), None).await?;
        let status = response.status();

        let envelope: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = ?e, url = %url, status = status.as_u16(), "non-JSON CKAN response");
                bail!("CKAN action {} failed: {}", name, status);
            }
        };

        if envelope.get("success").and_then(Value::as_bool) == Some(true) {
            return envelope
                .get("result")
                .cloned()
                .ok_or_else(|| anyhow!("CKAN action {} returned no result", name));
        }

        let message = envelope
            .pointer("/error/message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        tracing::warn!(action = name, message = %message, "CKAN action failed");
        bail!("CKAN action {} failed: {}", name, message)
    }
}

fn string_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Object(map) => map.get("name").and_then(Value::as_str).map(String::from),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Keeps the fields of a search hit worth showing in a terminal.
fn condense(package: &Value) -> Value {
    let resources: Vec<Value> = package
        .get("resources")
        .and_then(Value::as_array)
        .map(|rs| {
            rs.iter()
                .map(|r| {
                    json!({
                        "name": r.get("name").cloned().unwrap_or(Value::Null),
                        "format": r.get("format").cloned().unwrap_or(Value::Null),
                        "url": r.get("url").cloned().unwrap_or(Value::Null),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    json!({
        "name": package.get("name").cloned().unwrap_or(Value::Null),
        "title": package.get("title").cloned().unwrap_or(Value::Null),
        "notes": package.get("notes").cloned().unwrap_or(Value::Null),
        "resources": resources,
    })
}

#[async_trait]
impl CkanExplorer for CkanClient {
    async fn check_health(&self) -> Result<()> {
        self.action("site_read", &[]).await?;
        Ok(())
    }

    async fn list_packages(&self) -> Result<Vec<String>> {
        let result = self.action("package_list", &[]).await?;
        Ok(string_list(result))
    }

    async fn list_organisations(&self) -> Result<(usize, Vec<String>)> {
        let names = string_list(self.action("organization_list", &[]).await?);
        Ok((names.len(), names))
    }

    async fn package_info(&self, id: &str) -> Result<Value> {
        self.action("package_show", &[("id", id)]).await
    }

    async fn search_packages(&self, query: &str, limit: usize) -> Result<Vec<Value>> {
        let rows = limit.to_string();
        let result = self
            .action("package_search", &[("q", query), ("rows", &rows)])
            .await?;

        let hits = result
            .get("results")
            .and_then(Value::as_array)
            .map(|r| r.iter().take(limit).map(condense).collect())
            .unwrap_or_default();
        Ok(hits)
    }

    fn extract_resource_url(&self, package: &Value) -> Option<ResourceDescriptor> {
        let dataset_id = str_field(package, "name")
            .or_else(|| str_field(package, "id"))
            .unwrap_or_default();

        let links: Vec<ResourceLink> = package
            .get("resources")?
            .as_array()?
            .iter()
            .filter_map(|r| {
                let url = str_field(r, "url")?;
                Some(ResourceLink {
                    name: str_field(r, "name").map(String::from),
                    format: str_field(r, "format").unwrap_or_default().to_string(),
                    url: url.to_string(),
                })
            })
            .collect();

        if links.is_empty() {
            return None;
        }
        Some(ResourceDescriptor::new(dataset_id, links))
    }
}
