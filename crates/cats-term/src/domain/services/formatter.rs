use cats_catalog::Table;
use serde_json::Value;

use crate::domain::models::DisplayBlock;
use crate::domain::models::DisplayLine;
use crate::domain::models::Tone;

#[cfg(test)]
#[path = "formatter_test.rs"]
mod tests;

/// Title-cases like Python's `str.title`: a letter is upper-cased when the
/// character before it is not a letter, lower-cased otherwise.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }

    return out;
}

/// `air-quality-` becomes `Air Quality`.
pub fn clean_name(raw: &str) -> String {
    return title_case(&raw.trim_matches('-').replace('-', " "));
}

fn inline_text(value: &Value) -> String {
    match value {
        Value::String(s) => return s.to_string(),
        other => return other.to_string(),
    }
}

fn scalar_text(value: &Value) -> String {
    let text = inline_text(value).trim().to_string();
    if value.is_string() && text.contains('-') {
        return clean_name(&text);
    }
    return text;
}

fn format_lines(value: &Value, indent: usize) -> Vec<DisplayLine> {
    match value {
        Value::Array(items) => {
            if items.is_empty() {
                return vec![DisplayLine::styled(indent, "(empty)", Tone::Muted)];
            }

            if items.iter().all(Value::is_string) {
                return items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| {
                        DisplayLine::new(indent)
                            .span(&format!("{}. ", idx + 1), Tone::Accent)
                            .span(&clean_name(item.as_str().unwrap_or_default()), Tone::Plain)
                    })
                    .collect();
            }

            let mut lines = vec![];
            for item in items {
                let mut nested = format_lines(item, indent + 2).into_iter();
                let mut bullet = DisplayLine::new(indent).span("• ", Tone::Accent);
                if let Some(first) = nested.next() {
                    bullet.spans.extend(first.spans);
                }
                lines.push(bullet);
                lines.extend(nested);
            }
            return lines;
        }
        Value::Object(map) => {
            if map.is_empty() {
                return vec![DisplayLine::styled(indent, "(empty mapping)", Tone::Muted)];
            }

            let mut lines = vec![DisplayLine::styled(
                indent,
                &format!("Mapping containing {} items", map.len()),
                Tone::Heading,
            )];

            for (key, value) in map {
                let line = DisplayLine::new(indent)
                    .span(&clean_name(key), Tone::Label)
                    .span(" | ", Tone::Muted);

                if value.is_array() || value.is_object() {
                    lines.push(line);
                    lines.extend(format_lines(value, indent + 2));
                    continue;
                }

                let text = inline_text(value);
                let mut parts = text.split('\n');
                lines.push(line.span(parts.next().unwrap_or_default(), Tone::Value));
                lines.extend(parts.map(|part| DisplayLine::styled(indent + 2, part, Tone::Value)));
            }
            return lines;
        }
        scalar => {
            return vec![DisplayLine::styled(indent, &scalar_text(scalar), Tone::Plain)];
        }
    }
}

/// Renders arbitrary nested data as an indented block. Every catalog result
/// goes through here, whichever protocol produced it.
pub fn format(value: &Value, indent: usize) -> DisplayBlock {
    return DisplayBlock::from(format_lines(value, indent));
}

const MAX_CELL_WIDTH: usize = 24;

fn fit(cell: &str, width: usize) -> String {
    let count = cell.chars().count();
    if count <= width {
        return format!("{cell}{}", " ".repeat(width - count));
    }
    let truncated: String = cell.chars().take(width.saturating_sub(1)).collect();
    return format!("{truncated}…");
}

/// Summary of a freshly loaded table: columns with their dtypes, then the
/// first `sample_rows` rows as aligned text.
pub fn format_table(table: &Table, sample_rows: usize) -> DisplayBlock {
    let mut block = DisplayBlock::text("Data Loaded Successfully ✅", Tone::Success)
        .blank()
        .line("DATA COLUMNS AND DATA TYPES", Tone::Heading);

    for (column, dtype) in table.columns().iter().zip(table.dtypes()) {
        block = block.push(
            DisplayLine::new(2)
                .span(&format!("{column}: "), Tone::Label)
                .span(&dtype.to_string(), Tone::Value),
        );
    }

    block = block.blank().line("DATA SAMPLE", Tone::Heading);

    let sample = table.head(sample_rows);
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            let widest = sample
                .iter()
                .map(|row| row[idx].chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or_default();
            return widest.min(MAX_CELL_WIDTH);
        })
        .collect();

    let render_row = |cells: &[String]| -> String {
        return cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| fit(cell, *width))
            .collect::<Vec<String>>()
            .join(" | ");
    };

    block = block.push(DisplayLine::styled(2, &render_row(table.columns()), Tone::Accent));
    for row in &sample {
        block = block.push(DisplayLine::styled(2, &render_row(row), Tone::Plain));
    }

    return block.line(
        &format!("{} of {} rows shown", sample.len(), table.height()),
        Tone::Muted,
    );
}
