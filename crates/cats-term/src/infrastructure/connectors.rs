use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use cats_catalog::ConnectorBox;
use cats_catalog::HttpConnector;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub struct ConnectorManager {}

impl ConnectorManager {
    /// The HTTP connector, using the configured request timeout.
    pub fn get() -> Result<ConnectorBox> {
        return ConnectorManager::with_timeout_ms(Config::get_parsed::<u64>(
            ConfigKey::RequestTimeout,
        )?);
    }

    pub fn with_timeout_ms(timeout_ms: u64) -> Result<ConnectorBox> {
        if timeout_ms == 0 {
            bail!("request-timeout must be greater than zero");
        }

        tracing::debug!(timeout_ms, "using http connector");
        return Ok(Box::new(HttpConnector::new(Duration::from_millis(
            timeout_ms,
        ))));
    }
}
