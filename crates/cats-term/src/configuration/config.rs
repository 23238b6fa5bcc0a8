#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::env;
use std::path;
use std::str::FromStr;

use anyhow::anyhow;
use anyhow::bail;
use anyhow::Result;
use cats_catalog::CatalogDescriptor;
use cats_catalog::Protocol;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);
static CATALOGS: Lazy<DashMap<String, CatalogDescriptor>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    ApiKey,
    HistoryCapacity,
    PreviewRows,
    RequestTimeout,
    LogFile,
    LogLevel,
}

fn app_dir(base: Option<path::PathBuf>) -> path::PathBuf {
    return base.unwrap_or_else(env::temp_dir).join("cats");
}

/// Reads the `[catalogs]` table: `name = { protocol = "ckan", endpoint = "https://..." }`.
fn parse_catalogs(doc: &toml_edit::Document) -> Result<Vec<CatalogDescriptor>> {
    let Some(table) = doc.get("catalogs").and_then(|item| item.as_table_like()) else {
        return Ok(vec![]);
    };

    let mut catalogs = vec![];
    for (name, item) in table.iter() {
        let Some(entry) = item.as_table_like() else {
            bail!("config.toml catalog '{name}' must be a table with protocol and endpoint");
        };

        let protocol = entry
            .get("protocol")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("config.toml catalog '{name}' is missing a protocol"))?;
        let Some(protocol) = Protocol::parse(protocol) else {
            let possible_values = Protocol::iter()
                .map(|p| p.to_string())
                .collect::<Vec<String>>()
                .join(", ");
            bail!("config.toml catalog '{name}' has an invalid protocol: {protocol}\nPossible values are: {possible_values}");
        };

        let endpoint = entry
            .get("endpoint")
            .and_then(|v| v.as_str())
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("config.toml catalog '{name}' is missing an endpoint"))?;

        catalogs.push(CatalogDescriptor::new(name, protocol, endpoint.trim()));
    }

    return Ok(catalogs);
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    /// The value for `key` parsed as `T`, failing with the key name when the
    /// stored text does not parse.
    pub fn get_parsed<T: FromStr>(key: ConfigKey) -> Result<T> {
        let val = Config::get(key);
        return val
            .parse::<T>()
            .map_err(|_| anyhow!("Invalid value for '{key}': '{val}'"));
    }

    /// `None` for unset keys.
    pub fn get_optional(key: ConfigKey) -> Option<String> {
        let val = Config::get(key);
        if val.is_empty() {
            return None;
        }
        return Some(val);
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ConfigFile => {
                return app_dir(dirs::config_dir())
                    .join("config.toml")
                    .to_string_lossy()
                    .to_string();
            }
            ConfigKey::LogFile => {
                return app_dir(dirs::cache_dir())
                    .join("cats.log")
                    .to_string_lossy()
                    .to_string();
            }
            ConfigKey::ApiKey => return "".to_string(),
            ConfigKey::HistoryCapacity => return "1000".to_string(),
            ConfigKey::PreviewRows => return "100".to_string(),
            ConfigKey::RequestTimeout => return "30000".to_string(),
            ConfigKey::LogLevel => return "info".to_string(),
        }
    }

    /// Custom catalogs read from the config file, sorted by name.
    pub fn catalogs() -> Vec<CatalogDescriptor> {
        let mut catalogs = CATALOGS
            .iter()
            .map(|entry| entry.value().clone())
            .collect::<Vec<CatalogDescriptor>>();
        catalogs.sort_by(|a, b| a.name.cmp(&b.name));
        return catalogs;
    }

    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }
        CATALOGS.clear();

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for key in ConfigKey::iter() {
                let Some(val) = doc.get(&key.to_string()) else {
                    continue;
                };

                // Use clap value parsers to do validation.
                let mut possible_values = vec![];
                if let Some(arg) = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                {
                    possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name().to_string())
                        .collect::<Vec<String>>();
                }

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    if !possible_values.is_empty() && !possible_values.contains(&val_str.to_string())
                    {
                        bail!(format!("config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                    }
                    Config::set(key, val_str);
                } else {
                    bail!("config.toml has an invalid value for key '{key}'");
                }
            }

            for catalog in parse_catalogs(&doc)? {
                CATALOGS.insert(catalog.name.clone(), catalog);
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        for key in [
            ConfigKey::HistoryCapacity,
            ConfigKey::PreviewRows,
            ConfigKey::RequestTimeout,
        ] {
            Config::get_parsed::<u64>(key)?;
        }

        tracing::debug!(
            config_file = %config_path.display(),
            history_capacity = %Config::get(ConfigKey::HistoryCapacity),
            preview_rows = %Config::get(ConfigKey::PreviewRows),
            request_timeout = %Config::get(ConfigKey::RequestTimeout),
            custom_catalogs = CATALOGS.len(),
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let mut sections = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                if !arg.get_possible_values().is_empty() {
                    let possible_values = arg
                        .get_possible_values()
                        .iter()
                        .map(|e| return e.get_name())
                        .collect::<Vec<_>>()
                        .join(", ");
                    description = format!("{description} [possible values: {}]", possible_values);
                }

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i64>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>();

        sections.push(
            [
                "# Extra catalogs, alongside the built-in ones. Names must not clash with a built-in catalog.",
                "# [catalogs]",
                "# my-city = { protocol = \"opendatasoft\", endpoint = \"https://data.my-city.example\" }",
            ]
            .join("\n"),
        );

        return sections.join("\n\n");
    }
}
