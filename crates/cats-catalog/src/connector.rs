use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use crate::ckan::CkanClient;
use crate::gouv::{GouvClient, DEFAULT_MAX_PAGES};
use crate::loader::HttpTableLoader;
use crate::opendatasoft::OpenDataSoftClient;
use crate::session::HttpSession;
use crate::{CatalogDescriptor, Connection, Connector, Explorer, Protocol};

/// Opens HTTP sessions and binds the explorer/loader pair for each protocol.
pub struct HttpConnector {
    timeout: Duration,
    gouv_max_pages: usize,
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            gouv_max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl HttpConnector {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    pub fn with_gouv_max_pages(mut self, pages: usize) -> Self {
        self.gouv_max_pages = pages;
        self
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn open(&self, descriptor: &CatalogDescriptor) -> Result<Connection> {
        let session = HttpSession::start(descriptor, self.timeout)?;
        let loader = Box::new(HttpTableLoader::new(session.clone()));

        let explorer = match descriptor.protocol {
            Protocol::Ckan => Explorer::Ckan {
                explorer: Box::new(CkanClient::new(session.clone())),
                loader,
            },
            Protocol::OpenDataSoft => Explorer::OpenDataSoft {
                explorer: Box::new(OpenDataSoftClient::new(session.clone())),
                loader,
            },
            Protocol::GouvFr => Explorer::GouvFr {
                explorer: Box::new(
                    GouvClient::new(session.clone()).with_max_pages(self.gouv_max_pages),
                ),
                loader,
            },
        };

        tracing::info!(
            catalog = %descriptor.name,
            protocol = %descriptor.protocol,
            "connection opened"
        );

        Ok(Connection {
            session: Box::new(session),
            explorer,
        })
    }
}
