use crate::figure::Figure;
use serde_json::json;

const HEADER_FILL: &str = "#0078ff";
const CELL_FILL: &str = "#f0f4fa";
const ROW_HEIGHT: usize = 30;

/// A Plotly `table` figure; `rows` are row-major and padded or cut to the
/// number of `columns`.
pub fn render_table<S: AsRef<str>>(columns: &[S], rows: &[Vec<String>]) -> Figure {
    let header: Vec<String> = columns
        .iter()
        .map(|c| format!("<b>{}</b>", c.as_ref()))
        .collect();

    // plotly wants the cells column by column
    let cells: Vec<Vec<&str>> = (0..columns.len())
        .map(|col| {
            rows.iter()
                .map(|row| row.get(col).map(String::as_str).unwrap_or(""))
                .collect()
        })
        .collect();

    let height = (rows.len() + 1) * ROW_HEIGHT + 20;
    Figure::new(json!({
        "height": height,
        "margin": { "l": 0, "r": 0, "t": 0, "b": 0 },
    }))
    .trace(json!({
        "type": "table",
        "header": {
            "values": header,
            "fill": { "color": HEADER_FILL },
            "font": { "color": "white", "size": 14 },
            "align": "center",
            "height": ROW_HEIGHT,
        },
        "cells": {
            "values": cells,
            "fill": { "color": CELL_FILL },
            "align": "left",
            "height": ROW_HEIGHT,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_laid_out_by_column() {
        let rows = vec![
            vec!["Market cap".to_string(), "100".to_string()],
            vec!["Beta".to_string(), "1.2".to_string()],
        ];
        let figure = render_table(&["", ""], &rows);

        assert_eq!(figure.data.len(), 1);
        let cells = &figure.data[0]["cells"]["values"];
        assert_eq!(cells[0], json!(["Market cap", "Beta"]));
        assert_eq!(cells[1], json!(["100", "1.2"]));
        assert_eq!(figure.data[0]["header"]["values"], json!(["<b></b>", "<b></b>"]));
    }

    #[test]
    fn short_rows_are_padded() {
        let rows = vec![vec!["2024-01-02".to_string()]];
        let figure = render_table(&["Date", "Close"], &rows);
        assert_eq!(figure.data[0]["cells"]["values"][1], json!([""]));
        assert_eq!(figure.layout["height"], json!(80));
    }
}
