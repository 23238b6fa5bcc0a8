use std::path::Path;

use anyhow::Result;
use cats_term::application::cli;
use cats_term::configuration::Config;
use cats_term::configuration::ConfigKey;
use cats_term::domain::services::AppStateProps;
use cats_term::domain::services::CatalogRegistry;
use cats_term::domain::services::RouterSettings;
use cats_term::domain::services::SessionController;
use cats_term::infrastructure::connectors::ConnectorManager;

mod logging;
mod terminal;

fn registry() -> Result<CatalogRegistry> {
    return CatalogRegistry::builtin().with_custom(Config::catalogs());
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = cli::build();
    let matches = cmd.clone().get_matches();
    Config::load(cmd.clone(), vec![&matches]).await?;

    match matches.subcommand() {
        Some(("config", _)) => {
            println!("{}", Config::serialize_default(cmd));
            return Ok(());
        }
        Some(("catalogs", _)) => {
            println!("{}", registry()?.format_list().plain_text());
            return Ok(());
        }
        _ => {}
    }

    let _guard = logging::init(
        Path::new(&Config::get(ConfigKey::LogFile)),
        &Config::get(ConfigKey::LogLevel),
    )?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let sessions = SessionController::new(registry()?, ConnectorManager::get()?);
    let settings = RouterSettings {
        preview_rows: Config::get_parsed(ConfigKey::PreviewRows)?,
        api_key: Config::get_optional(ConfigKey::ApiKey),
        ..Default::default()
    };
    let app_state_props = AppStateProps {
        history_capacity: Config::get_parsed(ConfigKey::HistoryCapacity)?,
    };

    return terminal::start(sessions, settings, app_state_props).await;
}
