use serde_json::json;

use super::*;

#[test]
fn it_formats_empty_sequence() {
    assert_eq!(format(&json!([]), 0).plain_text(), "(empty)");
}

#[test]
fn it_formats_empty_mapping() {
    assert_eq!(format(&json!({}), 0).plain_text(), "(empty mapping)");
}

#[test]
fn it_enumerates_string_sequences() {
    let block = format(&json!(["a-b", "c"]), 0);
    assert_eq!(block.plain_text(), "1. A B\n2. C");
}

#[test]
fn it_strips_outer_separators() {
    assert_eq!(clean_name("-london-crime-"), "London Crime");
    assert_eq!(clean_name("covid19-cases"), "Covid19 Cases");
    assert_eq!(title_case("2nd edition"), "2Nd Edition");
}

#[test]
fn it_formats_mappings_with_nested_values() {
    let value = json!({
        "name": "air-quality",
        "num-resources": 2,
        "tags": ["air", "health-data"],
        "organization": {"title": "GLA"}
    });

    insta::assert_snapshot!(format(&value, 0).plain_text(), @r###"
    Mapping containing 4 items
    Name | air-quality
    Num Resources | 2
    Tags |
      1. Air
      2. Health Data
    Organization |
      Mapping containing 1 items
      Title | GLA
    "###);
}

#[test]
fn it_bullets_non_string_sequences() {
    let value = json!([{"format": "CSV"}, 3]);
    assert_eq!(
        format(&value, 0).plain_text(),
        "• Mapping containing 1 items\n  Format | CSV\n• 3"
    );
}

#[test]
fn it_cleans_hyphenated_scalars_only() {
    assert_eq!(format(&json!(" bus-stops "), 0).plain_text(), "Bus Stops");
    assert_eq!(format(&json!("plain text"), 2).plain_text(), "  plain text");
    assert_eq!(format(&json!(-1.5), 0).plain_text(), "-1.5");
    assert_eq!(format(&json!(null), 0).plain_text(), "null");
}

#[test]
fn it_splits_multiline_values() {
    let block = format(&json!({"notes": "first\nsecond"}), 0);
    assert_eq!(
        block.plain_text(),
        "Mapping containing 1 items\nNotes | first\n  second"
    );
}

#[test]
fn it_styles_keys_and_values() {
    let block = format(&json!({"id": "x"}), 0);
    let line = &block.lines()[1];
    assert_eq!(line.spans[0].tone, Tone::Label);
    assert_eq!(line.spans[2].tone, Tone::Value);
}

#[test]
fn it_summarises_tables() {
    let table = Table::new(
        vec!["id".to_string(), "station name".to_string()],
        (1..=12)
            .map(|n| vec![n.to_string(), format!("Station {n}")])
            .collect(),
    );

    let text = format_table(&table, 2).plain_text();
    insta::assert_snapshot!(text, @r###"
    Data Loaded Successfully ✅

    DATA COLUMNS AND DATA TYPES
      id: Int64
      station name: String

    DATA SAMPLE
      id | station name
      1  | Station 1
      2  | Station 2
    2 of 12 rows shown
    "###);
}

#[test]
fn it_truncates_wide_cells() {
    let table = Table::new(
        vec!["notes".to_string()],
        vec![vec!["x".repeat(40)]],
    );
    let text = format_table(&table, 10).plain_text();
    assert!(text.contains(&format!("{}…", "x".repeat(23))));
}
