use cats_catalog::CatalogDescriptor;
use cats_catalog::CatalogSession;
use cats_catalog::ConnectorBox;
use cats_catalog::Explorer;
use cats_catalog::Protocol;

use super::CatalogRegistry;
use crate::domain::models::CommandError;
use crate::domain::models::CommandResult;

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

struct ActiveSession {
    descriptor: CatalogDescriptor,
    session: Box<dyn CatalogSession>,
    explorer: Explorer,
}

/// Owns the single catalog connection.
///
/// States are disconnected and connected. `connect` moves to connected from
/// either state, replacing the previous binding only once the new one has
/// been opened. `close` releases everything even when the underlying close
/// fails.
pub struct SessionController {
    registry: CatalogRegistry,
    connector: ConnectorBox,
    active: Option<ActiveSession>,
}

async fn release(active: ActiveSession) {
    if let Err(err) = active.session.close().await {
        tracing::warn!(
            error = ?err,
            catalog = %active.descriptor.name,
            "failed to close catalog session cleanly"
        );
    }
}

impl SessionController {
    pub fn new(registry: CatalogRegistry, connector: ConnectorBox) -> SessionController {
        return SessionController {
            registry,
            connector,
            active: None,
        };
    }

    pub fn registry(&self) -> &CatalogRegistry {
        return &self.registry;
    }

    pub async fn connect(&mut self, name: &str) -> CommandResult<CatalogDescriptor> {
        let name = name.trim().to_lowercase();
        let Some(descriptor) = self.registry.lookup(&name).cloned() else {
            return Err(CommandError::UnknownCatalog(name));
        };

        let connection = self
            .connector
            .open(&descriptor)
            .await
            .map_err(|err| CommandError::upstream(&format!("Error connecting to {name}"), err))?;

        if let Some(previous) = self.active.take() {
            tracing::info!(catalog = %previous.descriptor.name, "replacing catalog session");
            release(previous).await;
        }

        if let Err(err) = connection.explorer.check_health().await {
            tracing::warn!(error = ?err, catalog = %descriptor.name, "catalog health check failed");
        }

        tracing::info!(
            catalog = %descriptor.name,
            protocol = %descriptor.protocol,
            endpoint = %descriptor.endpoint,
            "connected"
        );

        self.active = Some(ActiveSession {
            descriptor: descriptor.clone(),
            session: connection.session,
            explorer: connection.explorer,
        });

        return Ok(descriptor);
    }

    pub async fn close(&mut self) -> CommandResult<CatalogDescriptor> {
        let Some(active) = self.active.take() else {
            return Err(CommandError::NoActiveSession);
        };

        let descriptor = active.descriptor.clone();
        release(active).await;
        tracing::info!(catalog = %descriptor.name, "connection closed");

        return Ok(descriptor);
    }

    pub fn is_connected(&self) -> bool {
        return self
            .active
            .as_ref()
            .is_some_and(|active| active.session.is_open());
    }

    pub fn active_protocol(&self) -> Option<Protocol> {
        return self.active_catalog().map(|d| d.protocol);
    }

    pub fn active_catalog(&self) -> Option<&CatalogDescriptor> {
        if !self.is_connected() {
            return None;
        }
        return self.active.as_ref().map(|active| &active.descriptor);
    }

    /// The bound explorer, or `NoActiveSession` when not connected.
    pub fn explorer(&self) -> CommandResult<&Explorer> {
        match &self.active {
            Some(active) if active.session.is_open() => return Ok(&active.explorer),
            _ => return Err(CommandError::NoActiveSession),
        }
    }
}
