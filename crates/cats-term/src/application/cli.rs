use clap::Arg;
use clap::ArgAction;
use clap::Command;

use crate::configuration::Config;
use crate::configuration::ConfigKey;

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

fn arg(key: ConfigKey, env: &'static str, help: &str) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env)
        .num_args(1)
        .action(ArgAction::Set)
        .help(format!("{help} [default: {}]", Config::default(key)));
}

fn subcommand_catalogs() -> Command {
    return Command::new("catalogs").about("Print the available catalogs grouped by protocol and exit");
}

fn subcommand_config() -> Command {
    return Command::new("config").about("Print a default config.toml and exit");
}

/// The `cats` command line.
pub fn build() -> Command {
    return Command::new("cats")
        .about("Interactive terminal for exploring CKAN, OpenDataSoft and data.gouv.fr open-data catalogs")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(arg(
            ConfigKey::ConfigFile,
            "CATS_CONFIG_FILE",
            "Path to the TOML config file",
        ))
        .arg(
            Arg::new(ConfigKey::ApiKey.to_string())
                .long(ConfigKey::ApiKey.to_string())
                .env("CATS_API_KEY")
                .num_args(1)
                .hide_env_values(true)
                .help("API key sent with downloads when `load` is not given one"),
        )
        .arg(arg(
            ConfigKey::HistoryCapacity,
            "CATS_HISTORY_CAPACITY",
            "Number of output blocks kept for history navigation",
        ))
        .arg(arg(
            ConfigKey::PreviewRows,
            "CATS_PREVIEW_ROWS",
            "Rows shown in the table preview after a load",
        ))
        .arg(arg(
            ConfigKey::RequestTimeout,
            "CATS_REQUEST_TIMEOUT",
            "HTTP request timeout in milliseconds",
        ))
        .arg(arg(ConfigKey::LogFile, "CATS_LOG_FILE", "File the log is written to"))
        .arg(
            arg(ConfigKey::LogLevel, "CATS_LOG_LEVEL", "Log level")
                .value_parser(LOG_LEVELS),
        )
        .subcommand(subcommand_catalogs())
        .subcommand(subcommand_config());
}
