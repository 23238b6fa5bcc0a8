//! Client layer for open-data catalogs.
//!
//! Each supported protocol (CKAN, OpenDataSoft and the French government portal)
//! exposes a different read API. This crate describes them as per-protocol
//! explorer traits plus a shared [`TableLoader`], and binds one concrete
//! explorer/loader pair to a [`CatalogSession`] through a [`Connector`]. The
//! terminal consumes only these traits, so alternative transports (or the
//! in-memory mocks used in tests) can be swapped in without touching it.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod ckan;
pub mod connector;
pub mod gouv;
pub mod loader;
pub mod opendatasoft;
pub mod session;
pub mod types;

pub use connector::HttpConnector;
pub use types::*;

/// A live binding to one catalog endpoint.
#[async_trait]
pub trait CatalogSession: Send + Sync {
    fn protocol(&self) -> Protocol;

    fn endpoint(&self) -> &str;

    fn is_open(&self) -> bool;

    /// Release the session. Further requests through it fail.
    async fn close(&self) -> Result<()>;
}

/// Read API of a CKAN catalog.
#[async_trait]
pub trait CkanExplorer: Send + Sync {
    async fn check_health(&self) -> Result<()>;

    async fn list_packages(&self) -> Result<Vec<String>>;

    /// Organisation count as reported by the catalog, with their names.
    async fn list_organisations(&self) -> Result<(usize, Vec<String>)>;

    async fn package_info(&self, id: &str) -> Result<Value>;

    /// Condensed search results, at most `limit` of them.
    async fn search_packages(&self, query: &str, limit: usize) -> Result<Vec<Value>>;

    /// Downloadable resources of a package returned by `package_info`, or
    /// `None` when it has none.
    fn extract_resource_url(&self, package: &Value) -> Option<ResourceDescriptor>;
}

/// Read API of an OpenDataSoft catalog.
#[async_trait]
pub trait OdsExplorer: Send + Sync {
    async fn check_health(&self) -> Result<()>;

    async fn list_datasets(&self) -> Result<Vec<String>>;

    async fn dataset_info(&self, id: &str) -> Result<Value>;

    /// Export formats of a dataset, or `None` when nothing can be exported.
    async fn dataset_export_options(&self, id: &str) -> Result<Option<ResourceDescriptor>>;
}

/// Read API of data.gouv.fr.
#[async_trait]
pub trait GouvExplorer: Send + Sync {
    async fn check_health(&self) -> Result<()>;

    async fn list_datasets(&self) -> Result<Vec<String>>;

    async fn list_organisations(&self) -> Result<Vec<String>>;

    async fn dataset_meta(&self, id: &str) -> Result<Value>;

    /// Resource metadata taken from a `dataset_meta` result: the resource with
    /// `resource_id`, or every resource when no id is given.
    fn resource_meta(&self, dataset_meta: &Value, resource_id: Option<&str>) -> Result<Value>;

    /// Downloadable resources listed in a `dataset_meta` result.
    fn resource_descriptor(&self, dataset_meta: &Value) -> Option<ResourceDescriptor>;
}

/// Materializes a dataset resource into a [`Table`].
#[async_trait]
pub trait TableLoader: Send + Sync {
    async fn load_table(
        &self,
        resource: &ResourceDescriptor,
        format: &str,
        api_key: Option<&str>,
    ) -> Result<Table>;
}

/// The explorer/loader pair bound to a session, tagged by protocol.
pub enum Explorer {
    Ckan {
        explorer: Box<dyn CkanExplorer>,
        loader: Box<dyn TableLoader>,
    },
    OpenDataSoft {
        explorer: Box<dyn OdsExplorer>,
        loader: Box<dyn TableLoader>,
    },
    GouvFr {
        explorer: Box<dyn GouvExplorer>,
        loader: Box<dyn TableLoader>,
    },
}

impl Explorer {
    pub fn protocol(&self) -> Protocol {
        match self {
            Explorer::Ckan { .. } => Protocol::Ckan,
            Explorer::OpenDataSoft { .. } => Protocol::OpenDataSoft,
            Explorer::GouvFr { .. } => Protocol::GouvFr,
        }
    }

    pub async fn check_health(&self) -> Result<()> {
        match self {
            Explorer::Ckan { explorer, .. } => explorer.check_health().await,
            Explorer::OpenDataSoft { explorer, .. } => explorer.check_health().await,
            Explorer::GouvFr { explorer, .. } => explorer.check_health().await,
        }
    }

    pub fn loader(&self) -> &dyn TableLoader {
        match self {
            Explorer::Ckan { loader, .. }
            | Explorer::OpenDataSoft { loader, .. }
            | Explorer::GouvFr { loader, .. } => loader.as_ref(),
        }
    }
}

/// Everything produced by opening a catalog.
pub struct Connection {
    pub session: Box<dyn CatalogSession>,
    pub explorer: Explorer,
}

/// Opens connections, choosing the explorer/loader pair for the descriptor's
/// protocol.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn open(&self, descriptor: &CatalogDescriptor) -> Result<Connection>;
}

pub type ConnectorBox = Box<dyn Connector>;
