use unicode_width::UnicodeWidthStr;

/// Render `headers` and `rows` as a left-justified, column-aligned text table.
///
/// Each column is padded to its widest cell (header included); cells are
/// joined with `" | "` and a dashed separator joined with `"-+-"` follows the
/// header row. The result has no trailing newline.
///
/// # Examples
///
/// ```
/// use catalog_core::formatting::format_table;
///
/// let table = format_table(&["Year", "Count"], &[vec!["1999".to_string(), "12".to_string()]]);
/// assert_eq!(table, "Year | Count\n-----+------\n1999 | 12   ");
/// ```
pub fn format_table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.as_ref().width()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.width());
        }
    }

    let header_cells: Vec<&str> = headers.iter().map(AsRef::as_ref).collect();
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&header_cells, &widths));
    lines.push(separator);
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_row(&cells, &widths));
    }
    lines.join("\n")
}

/// Format a ratio as a percentage with two decimals, e.g. `0.25` → `"25.00%"`.
///
/// # Examples
///
/// ```
/// use catalog_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(0.25), "25.00%");
/// assert_eq!(format_percentage(0.0), "0.00%");
/// ```
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// `part / whole`, or `0.0` when `whole` is zero.
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Pad each cell to its column width and join with `" | "`.
///
/// Cells beyond the number of columns are dropped.
fn format_row(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
