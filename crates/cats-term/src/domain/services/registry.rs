use std::collections::BTreeMap;

use anyhow::bail;
use anyhow::Result;
use cats_catalog::CatalogDescriptor;
use cats_catalog::Protocol;
use strum::IntoEnumIterator;

use crate::domain::models::DisplayBlock;
use crate::domain::models::DisplayLine;
use crate::domain::models::Tone;

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;

const BUILTIN_CATALOGS: &[(&str, Protocol, &str)] = &[
    ("london-datastore", Protocol::Ckan, "https://data.london.gov.uk"),
    ("uk-gov", Protocol::Ckan, "https://data.gov.uk"),
    ("subak", Protocol::Ckan, "https://data.subak.org"),
    ("humanitarian", Protocol::Ckan, "https://data.humdata.org"),
    ("open-africa", Protocol::Ckan, "https://open.africa"),
    (
        "uk-power-networks",
        Protocol::OpenDataSoft,
        "https://ukpowernetworks.opendatasoft.com",
    ),
    ("infrabel", Protocol::OpenDataSoft, "https://opendata.infrabel.be"),
    ("paris", Protocol::OpenDataSoft, "https://opendata.paris.fr"),
    (
        "toulouse",
        Protocol::OpenDataSoft,
        "https://data.toulouse-metropole.fr",
    ),
    ("elia-energy", Protocol::OpenDataSoft, "https://opendata.elia.be"),
    ("edf-energy", Protocol::OpenDataSoft, "https://opendata.edf.fr"),
    (
        "cadent-gas",
        Protocol::OpenDataSoft,
        "https://cadentgas.opendatasoft.com",
    ),
    ("grd-france", Protocol::OpenDataSoft, "https://opendata.agenceore.fr"),
    ("french-gov", Protocol::GouvFr, "https://www.data.gouv.fr"),
];

/// Name → catalog lookup. Immutable once built; names are unique.
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: BTreeMap<String, CatalogDescriptor>,
}

impl CatalogRegistry {
    pub fn builtin() -> CatalogRegistry {
        let catalogs = BUILTIN_CATALOGS
            .iter()
            .map(|(name, protocol, endpoint)| {
                return (
                    name.to_string(),
                    CatalogDescriptor::new(name, *protocol, endpoint),
                );
            })
            .collect();

        return CatalogRegistry { catalogs };
    }

    /// Adds catalogs on top of this registry. Names are lower-cased and must
    /// not already be registered.
    pub fn with_custom(mut self, custom: Vec<CatalogDescriptor>) -> Result<CatalogRegistry> {
        for mut descriptor in custom {
            descriptor.name = descriptor.name.trim().to_lowercase();
            if descriptor.name.is_empty() {
                bail!("Custom catalog names must not be empty");
            }
            if self.catalogs.contains_key(&descriptor.name) {
                bail!(
                    "Catalog '{}' is already registered and cannot be redefined",
                    descriptor.name
                );
            }
            self.catalogs.insert(descriptor.name.clone(), descriptor);
        }

        return Ok(self);
    }

    pub fn lookup(&self, name: &str) -> Option<&CatalogDescriptor> {
        return self.catalogs.get(&name.trim().to_lowercase());
    }

    /// Names per protocol, sorted.
    pub fn list_by_protocol(&self) -> BTreeMap<Protocol, Vec<String>> {
        let mut grouped: BTreeMap<Protocol, Vec<String>> = BTreeMap::new();
        for protocol in Protocol::iter() {
            grouped.insert(protocol, vec![]);
        }
        // BTreeMap iteration is already name-ordered.
        for descriptor in self.catalogs.values() {
            grouped
                .entry(descriptor.protocol)
                .or_default()
                .push(descriptor.name.clone());
        }

        return grouped;
    }

    pub fn len(&self) -> usize {
        return self.catalogs.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.catalogs.is_empty();
    }

    pub fn format_list(&self) -> DisplayBlock {
        let mut block = DisplayBlock::text("Available Catalogs:", Tone::Heading);

        for (protocol, names) in self.list_by_protocol() {
            block = block
                .blank()
                .line(&format!("{} Catalogs:", protocol.title()), Tone::Accent);

            for name in names {
                let endpoint = self
                    .catalogs
                    .get(&name)
                    .map(|d| d.endpoint.as_str())
                    .unwrap_or_default();
                block = block.push(
                    DisplayLine::new(0)
                        .span(&format!("- {name}: "), Tone::Warning)
                        .span(endpoint, Tone::Plain),
                );
            }
        }

        return block;
    }
}
