use std::time::Duration;

use anyhow::Result;
use cats_catalog::Explorer;
use serde_json::Value;
use tokio::sync::mpsc;

use super::formatter;
use super::help;
use super::SessionController;
use crate::domain::models::CommandError;
use crate::domain::models::CommandResult;
use crate::domain::models::DisplayBlock;
use crate::domain::models::DisplayUpdate;
use crate::domain::models::Event;
use crate::domain::models::Listing;
use crate::domain::models::Payload;
use crate::domain::models::TablePreview;
use crate::domain::models::Tone;

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;

pub const LOADING_FRAMES: [&str; 4] = ["   ", ".  ", ".. ", "..."];
pub const API_KEY_ENV: &str = "CATS_API_KEY";

const DEFAULT_FORMAT: &str = "csv";
const SAMPLE_ROWS: usize = 10;

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub frame_delay: Duration,
    pub connect_clear_after: Duration,
    pub close_clear_after: Duration,
    pub preview_rows: usize,
    pub search_rows: usize,
    /// Used by `load` when no key is given inline.
    pub api_key: Option<String>,
}

impl Default for RouterSettings {
    fn default() -> RouterSettings {
        return RouterSettings {
            frame_delay: Duration::from_millis(100),
            connect_clear_after: Duration::from_secs(3),
            close_clear_after: Duration::from_secs(1),
            preview_rows: 100,
            search_rows: 10,
            api_key: None,
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Turns one line of user input into catalog calls and display updates.
///
/// Every command that reaches dispatch records exactly one block in the
/// history, whether it succeeded or not. Errors are rendered, never raised;
/// the returned `Result` only fails when the UI side of the channel is gone.
pub struct CommandRouter {
    sessions: SessionController,
    event_tx: mpsc::UnboundedSender<Event>,
    settings: RouterSettings,
}

fn upstream(err: anyhow::Error) -> CommandError {
    return CommandError::upstream("Error", err);
}

fn load_failure(err: anyhow::Error) -> CommandError {
    return CommandError::upstream("Error loading data", err);
}

impl CommandRouter {
    pub fn new(
        sessions: SessionController,
        event_tx: mpsc::UnboundedSender<Event>,
        settings: RouterSettings,
    ) -> CommandRouter {
        return CommandRouter {
            sessions,
            event_tx,
            settings,
        };
    }

    pub fn sessions(&self) -> &SessionController {
        return &self.sessions;
    }

    fn send(&self, event: Event) -> Result<()> {
        self.event_tx.send(event)?;
        return Ok(());
    }

    fn clear(&self) -> Result<()> {
        return self.send(Event::Display(DisplayUpdate::Clear));
    }

    fn write(&self, block: DisplayBlock) -> Result<()> {
        return self.send(Event::Display(DisplayUpdate::Write(block)));
    }

    fn clear_after(&self, delay: Duration) {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Event::Display(DisplayUpdate::Clear));
        });
    }

    async fn animate(&self, line: &str) -> Result<()> {
        for dots in LOADING_FRAMES {
            let frame = DisplayBlock::text(
                &format!("⚡ Please Wait! Processing Command: {line}{dots}"),
                Tone::Info,
            );
            self.send(Event::Display(DisplayUpdate::Transient(frame)))?;
            tokio::time::sleep(self.settings.frame_delay).await;
        }
        return self.clear();
    }

    pub async fn handle(&mut self, line: &str) -> Result<Flow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((first, args)) = tokens.split_first() else {
            return Ok(Flow::Continue);
        };
        let verb = first.to_lowercase();
        tracing::debug!(verb = %verb, args = ?args, "handling command");

        self.clear()?;
        self.animate(line.trim()).await?;

        let result = match verb.as_str() {
            "connect" => {
                self.connect(args).await?;
                return Ok(Flow::Continue);
            }
            "close" => {
                self.close().await?;
                return Ok(Flow::Continue);
            }
            "quit" => {
                self.quit().await?;
                return Ok(Flow::Quit);
            }
            "list" => self.list(args).await,
            "package" | "dataset" | "resource" => self.detail(&verb, args).await,
            "search" => self.search(args).await,
            "load" => self.load(args).await,
            _ => {
                self.unknown()?;
                return Ok(Flow::Continue);
            }
        };

        match result {
            Ok(payload) => self.render(payload)?,
            Err(err) => self.report(err)?,
        }
        return Ok(Flow::Continue);
    }

    pub fn show_catalogs(&self) -> Result<()> {
        self.clear()?;
        return self.write(self.sessions.registry().format_list());
    }

    pub fn show_commands(&self) -> Result<()> {
        self.clear()?;
        return self.write(help::commands(self.sessions.active_protocol()));
    }

    /// Back to the start screen: no connection, no preview, empty history.
    pub async fn reset(&mut self) -> Result<()> {
        if self.sessions.active_catalog().is_some() {
            let _ = self.sessions.close().await;
        }
        self.send(Event::ConnectionChanged(None))?;
        self.send(Event::TablePreview(None))?;
        self.send(Event::Display(DisplayUpdate::ClearHistory))?;
        return self.write(help::welcome());
    }

    pub async fn quit(&mut self) -> Result<()> {
        if self.sessions.active_catalog().is_some() {
            let _ = self.sessions.close().await;
        }
        tracing::info!("quitting");
        return self.send(Event::ConnectionChanged(None));
    }

    async fn connect(&mut self, args: &[&str]) -> Result<()> {
        let Some(name) = args.first() else {
            return self.write(
                DisplayBlock::text("Please Specify a Catalog", Tone::Warning)
                    .blank()
                    .append(self.sessions.registry().format_list()),
            );
        };

        match self.sessions.connect(name).await {
            Ok(descriptor) => {
                self.send(Event::ConnectionChanged(Some(descriptor.clone())))?;
                self.write(
                    DisplayBlock::text(
                        &format!("Connected to {} ({})", descriptor.name, descriptor.protocol),
                        Tone::Success,
                    )
                    .line(&format!("URL: {}", descriptor.endpoint), Tone::Info),
                )?;
                self.clear_after(self.settings.connect_clear_after);
                return Ok(());
            }
            Err(err) => return self.report(err),
        }
    }

    async fn close(&mut self) -> Result<()> {
        match self.sessions.close().await {
            Ok(descriptor) => {
                self.send(Event::ConnectionChanged(None))?;
                self.write(DisplayBlock::text(
                    &format!(
                        "Connection Closed: {} ({})",
                        descriptor.name.to_uppercase(),
                        descriptor.protocol
                    ),
                    Tone::Success,
                ))?;
                self.clear_after(self.settings.close_clear_after);
                return Ok(());
            }
            Err(CommandError::NoActiveSession) => {
                return self.write(
                    DisplayBlock::text("No Active Connection...", Tone::Warning)
                        .line("Please Specify a Catalog", Tone::Warning)
                        .blank()
                        .append(self.sessions.registry().format_list()),
                );
            }
            Err(err) => return self.report(err),
        }
    }

    async fn list(&self, args: &[&str]) -> CommandResult<Payload> {
        let explorer = self.sessions.explorer()?;
        let Some(sub) = args.first().map(|s| s.to_lowercase()) else {
            return Err(CommandError::InvalidArgument(
                "Please specify what to list (packages, datasets, orgs)".to_string(),
            ));
        };

        match (explorer, sub.as_str()) {
            (Explorer::Ckan { explorer, .. }, "packages") => {
                let names = explorer.list_packages().await.map_err(upstream)?;
                return Ok(Payload::enumerated(Listing::Packages, names.len(), names));
            }
            (Explorer::Ckan { explorer, .. }, "orgs") => {
                let (count, names) = explorer.list_organisations().await.map_err(upstream)?;
                return Ok(Payload::enumerated(Listing::Organisations, count, names));
            }
            (Explorer::OpenDataSoft { explorer, .. }, "datasets") => {
                let names = explorer.list_datasets().await.map_err(upstream)?;
                return Ok(Payload::names(Listing::Datasets, names));
            }
            (Explorer::GouvFr { explorer, .. }, "datasets") => {
                let names = explorer.list_datasets().await.map_err(upstream)?;
                return Ok(Payload::names(Listing::Datasets, names));
            }
            (Explorer::GouvFr { explorer, .. }, "orgs") => {
                let names = explorer.list_organisations().await.map_err(upstream)?;
                return Ok(Payload::names(Listing::Organisations, names));
            }
            _ => {
                return Err(CommandError::UnsupportedOperation(format!(
                    "Unknown list command: {sub}"
                )));
            }
        }
    }

    /// `package`, `dataset` and `resource` commands: `<verb> <sub> <id> [..]`.
    async fn detail(&self, verb: &str, args: &[&str]) -> CommandResult<Payload> {
        let explorer = self.sessions.explorer()?;
        if args.len() < 2 {
            return Err(CommandError::InvalidArgument(format!(
                "Please provide the {verb} command and ID"
            )));
        }
        let sub = args[0].to_lowercase();
        let id = args[1];

        match (explorer, verb, sub.as_str()) {
            (Explorer::Ckan { explorer, .. }, "package", "info") => {
                return Ok(Payload::Mapping(explorer.package_info(id).await.map_err(upstream)?));
            }
            (Explorer::OpenDataSoft { explorer, .. }, "dataset", "info") => {
                return Ok(Payload::Mapping(explorer.dataset_info(id).await.map_err(upstream)?));
            }
            (Explorer::OpenDataSoft { explorer, .. }, "dataset", "export") => {
                let Some(export) = explorer.dataset_export_options(id).await.map_err(upstream)?
                else {
                    return Ok(Payload::Empty);
                };
                let value = serde_json::to_value(export).map_err(|e| upstream(e.into()))?;
                return Ok(Payload::Mapping(value));
            }
            (Explorer::GouvFr { explorer, .. }, "dataset", "meta") => {
                return Ok(Payload::Mapping(explorer.dataset_meta(id).await.map_err(upstream)?));
            }
            (Explorer::GouvFr { explorer, .. }, "resource", "meta") => {
                let meta = explorer.dataset_meta(id).await.map_err(upstream)?;
                let resource = explorer
                    .resource_meta(&meta, args.get(2).copied())
                    .map_err(upstream)?;
                return Ok(Payload::Mapping(resource));
            }
            (Explorer::Ckan { .. }, "package", _)
            | (Explorer::OpenDataSoft { .. }, "dataset", _)
            | (Explorer::GouvFr { .. }, "dataset" | "resource", _) => {
                return Err(CommandError::UnsupportedOperation(format!(
                    "Unknown {verb} command: {sub}"
                )));
            }
            (explorer, _, _) => {
                return Err(CommandError::UnsupportedOperation(format!(
                    "'{verb}' commands are not available on {} catalogs",
                    explorer.protocol().title()
                )));
            }
        }
    }

    async fn search(&self, args: &[&str]) -> CommandResult<Payload> {
        let explorer = self.sessions.explorer()?;
        let Some(query) = args.first() else {
            return Err(CommandError::InvalidArgument(
                "Please provide a search query".to_string(),
            ));
        };
        let rows = match args.get(1) {
            Some(raw) => raw.parse::<usize>().map_err(|_| {
                CommandError::InvalidArgument("Number of rows must be a valid number".to_string())
            })?,
            None => self.settings.search_rows,
        };

        let Explorer::Ckan { explorer, .. } = explorer else {
            return Err(CommandError::UnsupportedOperation(format!(
                "Search is not available on {} catalogs",
                explorer.protocol().title()
            )));
        };

        let results = explorer.search_packages(query, rows).await.map_err(upstream)?;
        return Ok(Payload::Listing {
            kind: Listing::Matches,
            count: results.len(),
            items: results,
            notice_when_empty: true,
        });
    }

    /// `load <id> [format] [api-key]`.
    async fn load(&self, args: &[&str]) -> CommandResult<Payload> {
        let explorer = self.sessions.explorer()?;
        let Some(id) = args.first().copied() else {
            return Err(CommandError::InvalidArgument(
                "Please provide the dataset ID".to_string(),
            ));
        };
        let format = args.get(1).copied().unwrap_or(DEFAULT_FORMAT);
        let api_key = args
            .get(2)
            .map(|key| key.to_string())
            .or_else(|| self.settings.api_key.clone())
            .or_else(|| std::env::var(API_KEY_ENV).ok());

        let resource = match explorer {
            Explorer::Ckan { explorer, .. } => {
                let package = explorer.package_info(id).await.map_err(load_failure)?;
                explorer.extract_resource_url(&package)
            }
            Explorer::OpenDataSoft { explorer, .. } => {
                let Some(export) = explorer
                    .dataset_export_options(id)
                    .await
                    .map_err(load_failure)?
                else {
                    return Err(CommandError::UpstreamFailure(format!(
                        "No dataset found with ID: {id}"
                    )));
                };
                Some(export)
            }
            Explorer::GouvFr { explorer, .. } => {
                let meta = explorer.dataset_meta(id).await.map_err(load_failure)?;
                explorer.resource_descriptor(&meta)
            }
        };

        let Some(resource) = resource.filter(|r| !r.is_empty()) else {
            return Err(CommandError::UpstreamFailure(format!(
                "No downloadable resources found for dataset: {id}"
            )));
        };

        tracing::info!(dataset = id, format, formats = ?resource.formats(), "loading table");
        let table = explorer
            .loader()
            .load_table(&resource, format, api_key.as_deref())
            .await
            .map_err(load_failure)?;

        return Ok(Payload::Table {
            dataset_id: id.to_string(),
            table,
        });
    }

    fn render(&self, payload: Payload) -> Result<()> {
        match payload {
            Payload::Listing {
                kind,
                count,
                items,
                notice_when_empty,
            } => {
                if notice_when_empty && count == 0 && items.is_empty() {
                    return self.write(DisplayBlock::text(kind.none_found(), Tone::Warning));
                }
                return self.write(
                    DisplayBlock::text(&kind.found(count), Tone::Success)
                        .blank()
                        .append(formatter::format(&Value::Array(items), 0)),
                );
            }
            Payload::Mapping(value) => {
                return self.write(formatter::format(&value, 0));
            }
            Payload::Table { dataset_id, table } => {
                self.send(Event::TablePreview(Some(TablePreview::new(
                    &dataset_id,
                    &table,
                    self.settings.preview_rows,
                ))))?;
                return self.write(formatter::format_table(&table, SAMPLE_ROWS));
            }
            Payload::Empty => {
                return self.write(DisplayBlock::text("(empty)", Tone::Muted));
            }
        }
    }

    fn report(&self, err: CommandError) -> Result<()> {
        match &err {
            CommandError::UpstreamFailure(_) => tracing::warn!(error = %err, "catalog call failed"),
            _ => tracing::debug!(error = %err, "command rejected"),
        }
        let mut block = DisplayBlock::text(&err.to_string(), err.tone());
        if let CommandError::UnknownCatalog(_) = err {
            block = block.blank().append(self.sessions.registry().format_list());
        }
        return self.write(block);
    }

    fn unknown(&self) -> Result<()> {
        return self.write(
            DisplayBlock::text("❌ Unknown command", Tone::Error)
                .line("Available commands:", Tone::Warning)
                .blank()
                .append(help::commands(self.sessions.active_protocol())),
        );
    }
}
