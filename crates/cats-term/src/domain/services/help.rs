use cats_catalog::Protocol;

use crate::domain::models::DisplayBlock;
use crate::domain::models::DisplayLine;
use crate::domain::models::Tone;

const CAT: &str = r#"
 /\_/\
( o.o )
 > ^ <"#;

const BASIC_COMMANDS: &[(&str, &str)] = &[
    ("connect <catalog>", "Connect to a specific data catalog"),
    ("close", "Close the current connection"),
    ("quit", "Exit the application"),
];

const CKAN_COMMANDS: &[(&str, &str)] = &[
    ("list packages", "Show all available packages"),
    ("list orgs", "Show all organizations in the catalog"),
    ("package info <name>", "Show detailed information about a specific package"),
    ("search <query> [rows]", "Search packages, limited to rows results (default 10)"),
    ("load <name> [format]", "Load a package resource into the table preview"),
];

const ODS_COMMANDS: &[(&str, &str)] = &[
    ("list datasets", "Show all available datasets"),
    ("dataset info <id>", "Show detailed information about a specific dataset"),
    ("dataset export <id>", "Show available export formats for a dataset"),
    ("load <id> [format] [api-key]", "Load a dataset export into the table preview"),
];

const GOUV_COMMANDS: &[(&str, &str)] = &[
    ("list datasets", "Show all available datasets"),
    ("list orgs", "Show all organizations in the catalog"),
    ("dataset meta <id>", "Show metadata for a specific dataset"),
    ("resource meta <id> [resource]", "Show metadata for one or all resources of a dataset"),
    ("load <id> [format]", "Load a dataset resource into the table preview"),
];

const CKAN_EXAMPLES: &[(&str, &str)] = &[
    ("search police 10", "Search for 'police' packages, limit to 10 results"),
    ("package info london-crime", "Show details for package named 'london-crime'"),
];

const ODS_EXAMPLES: &[(&str, &str)] = &[
    ("dataset info power-consumption", "Show details for dataset 'power-consumption'"),
    ("dataset export energy-data", "Show export formats for 'energy-data'"),
];

const GOUV_EXAMPLES: &[(&str, &str)] = &[
    ("dataset meta 123abc", "Show metadata for dataset with ID '123abc'"),
    ("resource meta 123abc res456", "Show metadata for resource 'res456' in dataset '123abc'"),
];

fn command_lines(block: DisplayBlock, commands: &[(&str, &str)]) -> DisplayBlock {
    return commands.iter().fold(block, |block, (cmd, desc)| {
        return block.push(
            DisplayLine::new(2)
                .span(&format!("{cmd:<25}"), Tone::Accent)
                .span(&format!(": {desc}"), Tone::Plain),
        );
    });
}

fn example_lines(block: DisplayBlock, examples: &[(&str, &str)]) -> DisplayBlock {
    return examples.iter().fold(block, |block, (cmd, desc)| {
        return block.push(
            DisplayLine::new(2)
                .span(cmd, Tone::Accent)
                .span(&format!("     : {desc}"), Tone::Plain),
        );
    });
}

pub fn welcome() -> DisplayBlock {
    return DisplayBlock::text(CAT.trim_start_matches('\n'), Tone::Accent)
        .blank()
        .line("Welcome to Interactive Cats", Tone::Success)
        .line(
            "Use 'connect <catalog>' to start, or press F1 to see available catalogs",
            Tone::Info,
        );
}

/// Command reference. Catalog-specific commands are listed only for the
/// protocol currently connected.
pub fn commands(protocol: Option<Protocol>) -> DisplayBlock {
    let mut block = DisplayBlock::text("Basic Commands:", Tone::Success).line("-------------", Tone::Muted);
    block = command_lines(block, BASIC_COMMANDS);

    let Some(protocol) = protocol else {
        return block
            .blank()
            .line("You Are Not Connected to a Catalog:", Tone::Warning)
            .line(
                "Press F1 to see available catalogs, then connect to one:",
                Tone::Plain,
            )
            .push(
                DisplayLine::new(2)
                    .span("connect london-datastore", Tone::Accent)
                    .span("     : Connect to the London Datastore", Tone::Plain),
            );
    };

    let (commands, examples) = match protocol {
        Protocol::Ckan => (CKAN_COMMANDS, CKAN_EXAMPLES),
        Protocol::OpenDataSoft => (ODS_COMMANDS, ODS_EXAMPLES),
        Protocol::GouvFr => (GOUV_COMMANDS, GOUV_EXAMPLES),
    };

    block = block
        .blank()
        .line("Catalog-Specific Commands:", Tone::Success)
        .line("------------------------", Tone::Muted)
        .line(&format!("{} Commands:", protocol.title()), Tone::Warning);
    block = command_lines(block, commands);

    block = block
        .blank()
        .line("Example Usage:", Tone::Success)
        .line("--------------", Tone::Muted);
    return example_lines(block, examples);
}
