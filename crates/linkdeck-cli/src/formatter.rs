//! Output formatting for link lists and the tag selector: JSON, Table, Markdown.

use linkdeck_core::{pinned_count, Link, TagChips, TagColor, ALL_TAG};
use serde::{Deserialize, Serialize};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Table,
    Markdown,
}

const COLUMNS: [&str; 4] = ["id", "title", "url", "tags"];

/// Format a view that is already in canonical order.
#[must_use]
pub fn format_links(links: &[Link], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(links),
        OutputFormat::Table => format_table(links),
        OutputFormat::Markdown => format_markdown(links),
    }
}

/// Format a single record returned by a mutation.
#[must_use]
pub fn format_link(link: &Link, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(link).unwrap_or_else(|_| "{}".to_string())
        }
        _ => format_links(std::slice::from_ref(link), format),
    }
}

/// Format the tag selector. Chips read `#tag (count)`; the selected one is
/// bracketed, and painted in its palette color when `color` is set.
#[must_use]
pub fn format_chips(chips: &TagChips, format: OutputFormat, color: bool) -> String {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(chips).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Table => {
            let paint = |label: String, selected: bool, tint: TagColor| {
                if color && selected {
                    painted(&label, tint)
                } else {
                    label
                }
            };
            let mut parts = vec![paint(
                chip_label(ALL_TAG, None, chips.all_selected),
                chips.all_selected,
                chips.all_color,
            )];
            parts.extend(chips.chips.iter().map(|c| {
                paint(chip_label(&c.tag, Some(c.count), c.selected), c.selected, c.color)
            }));
            let mut output = parts.join("  ");
            output.push('\n');
            output
        }
        OutputFormat::Markdown => {
            let mut output = String::new();
            let all = chip_label(ALL_TAG, None, chips.all_selected);
            output.push_str(&format!("- {all}\n"));
            for c in &chips.chips {
                output.push_str(&format!("- {}\n", chip_label(&c.tag, Some(c.count), c.selected)));
            }
            output
        }
    }
}

fn chip_label(tag: &str, count: Option<usize>, selected: bool) -> String {
    let label = match count {
        Some(n) => format!("#{tag} ({n})"),
        None => format!("#{tag}"),
    };
    if selected {
        format!("[{label}]")
    } else {
        label
    }
}

fn painted(label: &str, tint: TagColor) -> String {
    format!("\x1b[38;5;{}m{label}\x1b[0m", tint.ansi_code())
}

fn format_json(links: &[Link]) -> String {
    serde_json::to_string_pretty(links).unwrap_or_else(|_| "[]".to_string())
}

fn cells(link: &Link) -> [String; 4] {
    [
        link.id.clone(),
        link.title.clone(),
        link.url.clone(),
        link.tags.join(", "),
    ]
}

fn format_table(links: &[Link]) -> String {
    if links.is_empty() {
        return "(no results)".to_string();
    }

    let rows: Vec<[String; 4]> = links.iter().map(cells).collect();
    let mut widths: Vec<usize> = COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rows {
        for (i, val) in row.iter().enumerate() {
            widths[i] = widths[i].max(val.chars().count());
        }
    }

    let pad = |vals: &[String]| -> String {
        let padded: Vec<String> = vals
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:width$}", v, width = widths[i]))
            .collect();
        padded.join(" | ").trim_end().to_string()
    };

    let mut output = String::new();

    let header: Vec<String> = COLUMNS.iter().map(|c| (*c).to_string()).collect();
    output.push_str(&pad(&header));
    output.push('\n');

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let sep = sep.join("-+-");
    output.push_str(&sep);
    output.push('\n');

    // Pinned links lead the canonical order; a rule separates them from the rest.
    let split = pinned_count(links);
    for (i, row) in rows.iter().enumerate() {
        if i == split && split > 0 {
            output.push_str(&sep);
            output.push('\n');
        }
        output.push_str(&pad(row));
        output.push('\n');
    }

    output
}

fn format_markdown(links: &[Link]) -> String {
    if links.is_empty() {
        return "*No results*\n".to_string();
    }

    let mut output = String::new();

    output.push_str("| ");
    output.push_str(&COLUMNS.join(" | "));
    output.push_str(" |\n");

    output.push_str("| ");
    let seps: Vec<&str> = COLUMNS.iter().map(|_| "---").collect();
    output.push_str(&seps.join(" | "));
    output.push_str(" |\n");

    for link in links {
        let vals: Vec<String> = cells(link).iter().map(|v| v.replace('|', "\\|")).collect();
        output.push_str("| ");
        output.push_str(&vals.join(" | "));
        output.push_str(" |\n");
    }

    output
}
