use cats_catalog::Table;
use serde_json::Value;
use thiserror::Error;

use super::Tone;

/// Everything that can go wrong while handling one command line. All of
/// these are rendered by the router; none of them end the interactive loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Invalid Catalog: {0}")]
    UnknownCatalog(String),
    #[error("No active connection. Please connect to a catalog first.")]
    NoActiveSession,
    #[error("{0}")]
    UnsupportedOperation(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    UpstreamFailure(String),
}

impl CommandError {
    /// Wraps an error raised by a catalog client, prefixed with `context`.
    pub fn upstream(context: &str, err: anyhow::Error) -> CommandError {
        tracing::error!(error = ?err, context, "catalog operation failed");
        return CommandError::UpstreamFailure(format!("{context}: {err}"));
    }

    pub fn tone(&self) -> Tone {
        match self {
            CommandError::UnknownCatalog(_) | CommandError::UpstreamFailure(_) => {
                return Tone::Error;
            }
            CommandError::NoActiveSession
            | CommandError::UnsupportedOperation(_)
            | CommandError::InvalidArgument(_) => {
                return Tone::Warning;
            }
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

/// What a listing enumerates, used for its headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Packages,
    Datasets,
    Organisations,
    Matches,
}

impl Listing {
    pub fn found(&self, count: usize) -> String {
        let noun = match self {
            Listing::Packages => "packages",
            Listing::Datasets => "datasets",
            Listing::Organisations => "organizations",
            Listing::Matches => "matches",
        };
        return format!("Found {count} {noun}");
    }

    pub fn none_found(&self) -> &'static str {
        match self {
            Listing::Packages => return "No packages found",
            Listing::Datasets => return "No datasets found",
            Listing::Organisations => return "No organizations found",
            Listing::Matches => return "No matching packages found",
        }
    }
}

/// Successful result of a catalog operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Names (or records) enumerated under a "Found N ..." headline. `count`
    /// is what the catalog reported and may differ from `items.len()`. With
    /// `notice_when_empty`, an empty listing is shown as "No ... found"
    /// instead of a zero headline.
    Listing {
        kind: Listing,
        count: usize,
        items: Vec<Value>,
        notice_when_empty: bool,
    },
    Mapping(Value),
    Table {
        dataset_id: String,
        table: Table,
    },
    Empty,
}

impl Payload {
    pub fn names(kind: Listing, names: Vec<String>) -> Payload {
        return Payload::Listing {
            kind,
            count: names.len(),
            items: names.into_iter().map(Value::String).collect(),
            notice_when_empty: true,
        };
    }

    /// Always headlined with `count`, even when nothing was returned.
    pub fn enumerated(kind: Listing, count: usize, names: Vec<String>) -> Payload {
        return Payload::Listing {
            kind,
            count,
            items: names.into_iter().map(Value::String).collect(),
            notice_when_empty: false,
        };
    }
}
