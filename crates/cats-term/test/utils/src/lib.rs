//! In-memory catalog doubles for cats-term tests.

use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use cats_catalog::CatalogDescriptor;
use cats_catalog::CatalogSession;
use cats_catalog::CkanExplorer;
use cats_catalog::Connection;
use cats_catalog::Connector;
use cats_catalog::Explorer;
use cats_catalog::GouvExplorer;
use cats_catalog::OdsExplorer;
use cats_catalog::Protocol;
use cats_catalog::ResourceDescriptor;
use cats_catalog::ResourceLink;
use cats_catalog::Table;
use cats_catalog::TableLoader;
use serde_json::Value;

/// Canned answers served by every mock explorer and loader.
#[derive(Clone, Default)]
pub struct CatalogFixture {
    pub packages: Vec<String>,
    pub organisations: Vec<String>,
    pub datasets: Vec<String>,
    pub package: Option<Value>,
    pub dataset: Option<Value>,
    pub export: Option<ResourceDescriptor>,
    pub search_results: Vec<Value>,
    pub table: Option<Table>,
    /// When set, every explorer and loader call fails with this message.
    pub fail_with: Option<String>,
    pub fail_health: bool,
}

impl CatalogFixture {
    pub fn with_packages(names: &[&str]) -> CatalogFixture {
        return CatalogFixture {
            packages: names.iter().map(|n| n.to_string()).collect(),
            ..Default::default()
        };
    }

    fn check(&self) -> Result<()> {
        if let Some(message) = &self.fail_with {
            bail!("{message}");
        }
        return Ok(());
    }
}

pub fn csv_link(url: &str) -> ResourceLink {
    return ResourceLink {
        name: None,
        format: "csv".to_string(),
        url: url.to_string(),
    };
}

pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    return Table::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect(),
    );
}

/// Shared record of what happened to the sessions a [`MockConnector`] opened.
#[derive(Clone, Default)]
pub struct ConnectionStats {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ConnectionStats {
    pub fn opened(&self) -> usize {
        return self.opened.load(Ordering::SeqCst);
    }

    pub fn closed(&self) -> usize {
        return self.closed.load(Ordering::SeqCst);
    }

    pub fn open_sessions(&self) -> usize {
        return self.opened() - self.closed();
    }

    /// Explorer and loader calls, in order, e.g. `search_packages(abc, 10)`.
    pub fn calls(&self) -> Vec<String> {
        return self.calls.lock().map(|c| c.clone()).unwrap_or_default();
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

pub struct MockSession {
    protocol: Protocol,
    endpoint: String,
    open: AtomicBool,
    fail_close: bool,
    stats: ConnectionStats,
}

#[async_trait]
impl CatalogSession for MockSession {
    fn protocol(&self) -> Protocol {
        return self.protocol;
    }

    fn endpoint(&self) -> &str {
        return &self.endpoint;
    }

    fn is_open(&self) -> bool {
        return self.open.load(Ordering::SeqCst);
    }

    async fn close(&self) -> Result<()> {
        if self.open.swap(false, Ordering::SeqCst) {
            self.stats.closed.fetch_add(1, Ordering::SeqCst);
        }
        if self.fail_close {
            bail!("socket already torn down");
        }
        return Ok(());
    }
}

struct MockCkan {
    fixture: CatalogFixture,
    stats: ConnectionStats,
}

#[async_trait]
impl CkanExplorer for MockCkan {
    async fn check_health(&self) -> Result<()> {
        self.stats.record("check_health".to_string());
        if self.fixture.fail_health {
            bail!("site_read failed");
        }
        return Ok(());
    }

    async fn list_packages(&self) -> Result<Vec<String>> {
        self.stats.record("list_packages".to_string());
        self.fixture.check()?;
        return Ok(self.fixture.packages.clone());
    }

    async fn list_organisations(&self) -> Result<(usize, Vec<String>)> {
        self.stats.record("list_organisations".to_string());
        self.fixture.check()?;
        let orgs = self.fixture.organisations.clone();
        return Ok((orgs.len(), orgs));
    }

    async fn package_info(&self, id: &str) -> Result<Value> {
        self.stats.record(format!("package_info({id})"));
        self.fixture.check()?;
        return self
            .fixture
            .package
            .clone()
            .ok_or_else(|| anyhow!("Not found: {id}"));
    }

    async fn search_packages(&self, query: &str, limit: usize) -> Result<Vec<Value>> {
        self.stats.record(format!("search_packages({query}, {limit})"));
        self.fixture.check()?;
        return Ok(self
            .fixture
            .search_results
            .iter()
            .take(limit)
            .cloned()
            .collect());
    }

    fn extract_resource_url(&self, _package: &Value) -> Option<ResourceDescriptor> {
        return self.fixture.export.clone();
    }
}

struct MockOds {
    fixture: CatalogFixture,
    stats: ConnectionStats,
}

#[async_trait]
impl OdsExplorer for MockOds {
    async fn check_health(&self) -> Result<()> {
        self.stats.record("check_health".to_string());
        if self.fixture.fail_health {
            bail!("catalog unreachable");
        }
        return Ok(());
    }

    async fn list_datasets(&self) -> Result<Vec<String>> {
        self.stats.record("list_datasets".to_string());
        self.fixture.check()?;
        return Ok(self.fixture.datasets.clone());
    }

    async fn dataset_info(&self, id: &str) -> Result<Value> {
        self.stats.record(format!("dataset_info({id})"));
        self.fixture.check()?;
        return self
            .fixture
            .dataset
            .clone()
            .ok_or_else(|| anyhow!("Not found: {id}"));
    }

    async fn dataset_export_options(&self, id: &str) -> Result<Option<ResourceDescriptor>> {
        self.stats.record(format!("dataset_export_options({id})"));
        self.fixture.check()?;
        return Ok(self.fixture.export.clone());
    }
}

struct MockGouv {
    fixture: CatalogFixture,
    stats: ConnectionStats,
}

#[async_trait]
impl GouvExplorer for MockGouv {
    async fn check_health(&self) -> Result<()> {
        self.stats.record("check_health".to_string());
        if self.fixture.fail_health {
            bail!("site unreachable");
        }
        return Ok(());
    }

    async fn list_datasets(&self) -> Result<Vec<String>> {
        self.stats.record("list_datasets".to_string());
        self.fixture.check()?;
        return Ok(self.fixture.datasets.clone());
    }

    async fn list_organisations(&self) -> Result<Vec<String>> {
        self.stats.record("list_organisations".to_string());
        self.fixture.check()?;
        return Ok(self.fixture.organisations.clone());
    }

    async fn dataset_meta(&self, id: &str) -> Result<Value> {
        self.stats.record(format!("dataset_meta({id})"));
        self.fixture.check()?;
        return self
            .fixture
            .dataset
            .clone()
            .ok_or_else(|| anyhow!("Not found: {id}"));
    }

    fn resource_meta(&self, dataset_meta: &Value, resource_id: Option<&str>) -> Result<Value> {
        let resources = dataset_meta
            .get("resources")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("Dataset has no resources"))?;
        let Some(resource_id) = resource_id else {
            return Ok(Value::Array(resources.clone()));
        };
        return resources
            .iter()
            .find(|r| r.get("id").and_then(Value::as_str) == Some(resource_id))
            .cloned()
            .ok_or_else(|| anyhow!("No resource found with ID: {resource_id}"));
    }

    fn resource_descriptor(&self, _dataset_meta: &Value) -> Option<ResourceDescriptor> {
        return self.fixture.export.clone();
    }
}

struct MockLoader {
    fixture: CatalogFixture,
    stats: ConnectionStats,
}

#[async_trait]
impl TableLoader for MockLoader {
    async fn load_table(
        &self,
        resource: &ResourceDescriptor,
        format: &str,
        api_key: Option<&str>,
    ) -> Result<Table> {
        self.stats.record(format!(
            "load_table({}, {format}, {})",
            resource.dataset_id,
            api_key.unwrap_or("-")
        ));
        self.fixture.check()?;
        return self
            .fixture
            .table
            .clone()
            .ok_or_else(|| anyhow!("Unsupported format: {format}"));
    }
}

/// A [`Connector`] that hands out in-memory sessions serving a fixture.
#[derive(Clone, Default)]
pub struct MockConnector {
    fixture: CatalogFixture,
    stats: ConnectionStats,
    fail_open: bool,
    fail_close: bool,
}

impl MockConnector {
    pub fn new(fixture: CatalogFixture) -> MockConnector {
        return MockConnector {
            fixture,
            ..Default::default()
        };
    }

    pub fn failing_open(mut self) -> MockConnector {
        self.fail_open = true;
        return self;
    }

    pub fn failing_close(mut self) -> MockConnector {
        self.fail_close = true;
        return self;
    }

    pub fn stats(&self) -> ConnectionStats {
        return self.stats.clone();
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn open(&self, descriptor: &CatalogDescriptor) -> Result<Connection> {
        if self.fail_open {
            bail!("connection refused");
        }

        self.stats.opened.fetch_add(1, Ordering::SeqCst);
        let session = MockSession {
            protocol: descriptor.protocol,
            endpoint: descriptor.endpoint.clone(),
            open: AtomicBool::new(true),
            fail_close: self.fail_close,
            stats: self.stats.clone(),
        };

        let loader = Box::new(MockLoader {
            fixture: self.fixture.clone(),
            stats: self.stats.clone(),
        });
        let explorer = match descriptor.protocol {
            Protocol::Ckan => Explorer::Ckan {
                explorer: Box::new(MockCkan {
                    fixture: self.fixture.clone(),
                    stats: self.stats.clone(),
                }),
                loader,
            },
            Protocol::OpenDataSoft => Explorer::OpenDataSoft {
                explorer: Box::new(MockOds {
                    fixture: self.fixture.clone(),
                    stats: self.stats.clone(),
                }),
                loader,
            },
            Protocol::GouvFr => Explorer::GouvFr {
                explorer: Box::new(MockGouv {
                    fixture: self.fixture.clone(),
                    stats: self.stats.clone(),
                }),
                loader,
            },
        };

        return Ok(Connection {
            session: Box::new(session),
            explorer,
        });
    }
}
