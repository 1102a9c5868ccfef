//! Storage tables to GFM pipe tables.

use crate::model::{Element, StorageNode};

/// Cell text rendered by the caller, one vector per row.
pub type RenderedRows = Vec<Vec<String>>;

/// Every `tr` of a table in document order, without entering nested tables.
pub fn collect_rows(table: &Element) -> Vec<&Element> {
    let mut rows = Vec::new();
    let mut pending: Vec<&StorageNode> = table.children.iter().rev().collect();
    while let Some(node) = pending.pop() {
        let StorageNode::Element(el) = node else {
            continue;
        };
        match el.name.as_str() {
            "tr" => rows.push(el),
            "table" => {}
            _ => pending.extend(el.children.iter().rev()),
        }
    }
    rows
}

pub fn row_cells(row: &Element) -> Vec<&Element> {
    row.child_elements()
        .filter(|cell| cell.is_named("th") || cell.is_named("td"))
        .collect()
}

/// Formats rendered rows as a pipe table.
///
/// The first row always becomes the Markdown header row. The column count is
/// fixed by that row (or by the second row when the first is empty) and every
/// row is padded or truncated to it.
pub fn format_table(rows: RenderedRows) -> String {
    let rows: Vec<Vec<String>> = rows.into_iter().filter(|row| !row.is_empty()).collect();
    let Some(first) = rows.first() else {
        return String::new();
    };
    let columns = first.len();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(first, columns));
    lines.push(format_row(&vec!["---".to_string(); columns], columns));
    for row in &rows[1..] {
        lines.push(format_row(row, columns));
    }
    lines.join("\n")
}

fn format_row(cells: &[String], columns: usize) -> String {
    let mut texts: Vec<&str> = cells.iter().take(columns).map(String::as_str).collect();
    texts.resize(columns, "");
    format!("| {} |", texts.join(" | "))
}

/// Flattens rendered cell Markdown onto one line and escapes pipes.
pub fn escape_cell(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn pads_and_truncates_to_header_width() {
        let table = format_table(vec![
            row(&["A", "B"]),
            row(&["1"]),
            row(&["x", "y", "z"]),
        ]);
        assert_eq!(table, "| A | B |\n| --- | --- |\n| 1 |  |\n| x | y |");
    }

    #[test]
    fn escapes_pipes_and_newlines_in_cells() {
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
        assert_eq!(escape_cell("  \n "), "");
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert_eq!(format_table(Vec::new()), "");
    }

    #[test]
    fn collects_rows_across_sections() {
        let table = Element::new("table")
            .with_child(StorageNode::Element(
                Element::new("thead").with_child(StorageNode::element("tr")),
            ))
            .with_child(StorageNode::Element(
                Element::new("tbody")
                    .with_child(StorageNode::element("tr"))
                    .with_child(StorageNode::element("tr")),
            ));
        assert_eq!(collect_rows(&table).len(), 3);
    }
}
