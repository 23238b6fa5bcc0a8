use std::str::FromStr;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use strum_macros::{Display, EnumString};

use crate::session::HttpSession;
use crate::{ResourceDescriptor, ResourceLink, Table, TableLoader};

/// Formats the loader knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
enum Format {
    #[strum(serialize = "csv")]
    Csv,
    #[strum(serialize = "json")]
    Json,
}

impl Format {
    fn parse(format: &str) -> Option<Format> {
        Format::from_str(format.trim().trim_start_matches('.')).ok()
    }
}

/// Downloads a dataset resource through the connection's session and parses
/// it into a [`Table`].
pub struct HttpTableLoader {
    session: HttpSession,
}

impl HttpTableLoader {
    pub fn new(session: HttpSession) -> Self {
        Self { session }
    }
}

/// The link to load: the one matching `format`, else the first one in a
/// parseable format.
fn pick_link<'a>(resource: &'a ResourceDescriptor, format: &str) -> Result<&'a ResourceLink> {
    resource
        .links
        .iter()
        .find(|l| l.format.eq_ignore_ascii_case(format.trim()))
        .or_else(|| resource.links.iter().find(|l| Format::parse(&l.format).is_some()))
        .ok_or_else(|| {
            anyhow!(
                "No loadable resource for dataset {} (available formats: {})",
                resource.dataset_id,
                resource.formats().join(", ")
            )
        })
}

fn sniff_delimiter(body: &str) -> u8 {
    let header = body.lines().next().unwrap_or_default();
    if header.matches(';').count() > header.matches(',').count() {
        return b';';
    }
    b','
}

pub fn parse_csv(body: &str) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(sniff_delimiter(body))
        .flexible(true)
        .from_reader(body.trim_start_matches('\u{feff}').as_bytes());

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if columns.is_empty() {
        bail!("CSV resource has no header row");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(Table::new(columns, rows))
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn parse_json(body: &str) -> Result<Table> {
    let value: Value = serde_json::from_str(body)?;
    let records = value
        .as_array()
        .ok_or_else(|| anyhow!("JSON resource is not an array of records"))?;

    let mut columns: Vec<String> = Vec::new();
    for record in records {
        let object = record
            .as_object()
            .ok_or_else(|| anyhow!("JSON resource is not an array of records"))?;
        for key in object.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok(Table::new(columns, rows))
}

#[async_trait]
impl TableLoader for HttpTableLoader {
    async fn load_table(
        &self,
        resource: &ResourceDescriptor,
        format: &str,
        api_key: Option<&str>,
    ) -> Result<Table> {
        let link = pick_link(resource, format)?;
        let parsed = Format::parse(&link.format);

        let Some(parsed) = parsed else {
            bail!("Unsupported format: {}", link.format);
        };

        tracing::info!(
            dataset = %resource.dataset_id,
            format = %parsed,
            url = %link.url,
            "loading table"
        );

        let url = Url::parse(&link.url)?;
        let body = self.session.get_text(url, api_key).await?;

        let table = match parsed {
            Format::Csv => parse_csv(&body)?,
            Format::Json => parse_json(&body)?,
        };

        tracing::debug!(rows = table.height(), columns = table.width(), "table loaded");
        Ok(table)
    }
}
