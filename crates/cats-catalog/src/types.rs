use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Wire protocol spoken by a catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
    Serialize, Deserialize,
)]
pub enum Protocol {
    #[strum(serialize = "ckan")]
    #[serde(rename = "ckan")]
    Ckan,
    #[strum(serialize = "opendatasoft")]
    #[serde(rename = "opendatasoft")]
    OpenDataSoft,
    #[strum(serialize = "gouv-fr")]
    #[serde(rename = "gouv-fr")]
    GouvFr,
}

impl Protocol {
    pub fn parse(s: &str) -> Option<Protocol> {
        Protocol::iter().find(|p| p.to_string() == s.trim().to_lowercase())
    }

    /// Human readable family name, used for section headers.
    pub fn title(&self) -> &'static str {
        match self {
            Protocol::Ckan => "CKAN",
            Protocol::OpenDataSoft => "OpenDataSoft",
            Protocol::GouvFr => "French Government",
        }
    }
}

/// A named catalog reachable through one protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDescriptor {
    pub name: String,
    pub protocol: Protocol,
    pub endpoint: String,
}

impl CatalogDescriptor {
    pub fn new(name: &str, protocol: Protocol, endpoint: &str) -> Self {
        Self {
            name: name.to_string(),
            protocol,
            endpoint: endpoint.to_string(),
        }
    }
}

/// One downloadable representation of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub format: String,
    pub url: String,
}

/// The downloadable resources of a dataset, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    pub dataset_id: String,
    pub links: Vec<ResourceLink>,
}

impl ResourceDescriptor {
    pub fn new(dataset_id: &str, links: Vec<ResourceLink>) -> Self {
        Self {
            dataset_id: dataset_id.to_string(),
            links,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn formats(&self) -> Vec<String> {
        self.links.iter().map(|l| l.format.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataType {
    Int64,
    Float64,
    Boolean,
    String,
}

impl DataType {
    fn infer<'a>(values: impl Iterator<Item = &'a str>) -> DataType {
        let cells: Vec<&str> = values.map(str::trim).filter(|v| !v.is_empty()).collect();
        if cells.is_empty() {
            return DataType::String;
        }

        if cells.iter().all(|v| v.parse::<i64>().is_ok()) {
            return DataType::Int64;
        }
        if cells.iter().all(|v| v.parse::<f64>().is_ok()) {
            return DataType::Float64;
        }
        if cells
            .iter()
            .all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
        {
            return DataType::Boolean;
        }

        DataType::String
    }
}

/// An in-memory table: ordered columns, one inferred dtype per column, and
/// string cells. Rows shorter than the header are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    dtypes: Vec<DataType>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Table {
        let width = columns.len();
        let rows: Vec<Vec<String>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        let dtypes = (0..width)
            .map(|idx| DataType::infer(rows.iter().map(move |row| row[idx].as_str())))
            .collect();

        Table {
            columns,
            dtypes,
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn dtypes(&self) -> &[DataType] {
        &self.dtypes
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// First `n` rows, cloned.
    pub fn head(&self, n: usize) -> Vec<Vec<String>> {
        self.rows.iter().take(n).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_parse_round_trips_display() {
        for protocol in Protocol::iter() {
            assert_eq!(Protocol::parse(&protocol.to_string()), Some(protocol));
        }
        assert_eq!(Protocol::parse(" CKAN "), Some(Protocol::Ckan));
        assert_eq!(Protocol::parse("socrata"), None);
    }

    #[test]
    fn test_table_infers_dtypes() {
        let table = Table::new(
            vec![
                "id".to_string(),
                "ratio".to_string(),
                "flag".to_string(),
                "name".to_string(),
                "blank".to_string(),
            ],
            vec![
                vec!["1", "0.5", "true", "a", ""],
                vec!["2", "3", "FALSE", "b", ""],
                vec!["", "", "", "", ""],
            ]
            .into_iter()
            .map(|r| r.into_iter().map(String::from).collect())
            .collect(),
        );

        assert_eq!(
            table.dtypes(),
            &[
                DataType::Int64,
                DataType::Float64,
                DataType::Boolean,
                DataType::String,
                DataType::String
            ]
        );
        assert_eq!(table.height(), 3);
    }

    #[test]
    fn test_table_pads_short_rows() {
        let table = Table::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string()]],
        );
        let rows: Vec<&[String]> = table.rows().collect();
        assert_eq!(rows[0], &["1".to_string(), "".to_string()]);
    }
}
