// src/extract/table.rs
//
// Table extraction. Legacy tables hide header semantics in styling classes and
// cell positions, so body rows are scanned to decide which cells are "really"
// header cells before the table is re-emitted in normalized
// <table><thead><tbody> form. Structural surprises are hard errors.

use crate::dom::{attr, child_elements, has_class, selector, text_of};
use crate::extract::{extract_content_html, extract_heading_text};
use crate::utils::error::{ensure_with, ErrorCode, MigrationError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

static HEADER_ROWS: Lazy<Selector> = Lazy::new(|| selector("thead > tr"));
static HEADER_ROW_DATA_CELLS: Lazy<Selector> = Lazy::new(|| selector("thead > tr > td"));
static BODY_ROWS: Lazy<Selector> = Lazy::new(|| selector("tbody > tr"));
static BODY_ROW_HEADER_CELLS: Lazy<Selector> = Lazy::new(|| selector("tbody > tr > th"));
// Special marker class carrying a caption-style header for the whole table.
static TABLE_HEAD_MARKER: Lazy<Selector> = Lazy::new(|| selector(".product-hl-table-head"));

// Rows explicitly styled as headers.
const HEADER_ROW_CLASS: &str = "bg-tory-blue";

/// Extracts a normalized `<table>` from `el` (the `table` itself or a classed
/// wrapper around one). At most one header row ends up in `<thead>`.
pub fn extract_table_html(el: ElementRef<'_>) -> Result<String, MigrationError> {
    let header_rows: Vec<ElementRef> = el.select(&HEADER_ROWS).collect();
    // Historical audit showed THEAD is the only legitimate header carrier.
    ensure_with(
        header_rows.len() <= 1,
        ErrorCode::MalformedTable,
        "More than one header row was found which is not right",
        el,
    )?;
    let marker = el.select(&TABLE_HEAD_MARKER).next();
    ensure_with(
        marker.is_none() || header_rows.is_empty(),
        ErrorCode::MalformedTable,
        "More than one header row was found which is not right",
        el,
    )?;
    ensure_with(
        el.select(&HEADER_ROW_DATA_CELLS).next().is_none(),
        ErrorCode::MalformedTable,
        "THEAD has TD cells which is not right",
        el,
    )?;
    let body_rows: Vec<ElementRef> = el.select(&BODY_ROWS).collect();
    ensure_with(
        !body_rows.is_empty(),
        ErrorCode::MalformedTable,
        "No rows were found in TBODY which is not right",
        el,
    )?;
    ensure_with(
        el.select(&BODY_ROW_HEADER_CELLS).next().is_none(),
        ErrorCode::MalformedTable,
        "TBODY has TH cells which is not right",
        el,
    )?;

    let mut max_column_count = 0;
    let mut tbody = String::new();
    for (ri, tr) in body_rows.iter().enumerate() {
        let styled_header_row = has_class(*tr, HEADER_ROW_CLASS);
        let cells: Vec<ElementRef> = child_elements(*tr).collect();
        let cell_count = cells.len();
        max_column_count = max_column_count.max(cell_count);

        tbody.push_str("<tr>");
        for (ci, td) in cells.iter().enumerate() {
            // A styled cell in the first row of a wide table, or in the first
            // column, was authored as a header even though it is a <td>.
            let styled = attr(*td, "class").is_some();
            let is_header_cell =
                styled_header_row || (styled && ((ri == 0 && cell_count > 2) || ci == 0));
            let cell_tag = if is_header_cell { "th" } else { "td" };
            push_cell(&mut tbody, cell_tag, &extract_content_html(*td)?, attr(*td, "colspan"));
        }
        tbody.push_str("</tr>");
    }

    let mut thead = String::new();
    if let Some(tr) = header_rows.first() {
        thead.push_str("<tr>");
        for th in child_elements(*tr) {
            push_cell(&mut thead, "th", &extract_heading_text(th)?, attr(th, "colspan"));
        }
        thead.push_str("</tr>");
    } else if let Some(marker) = marker {
        // Synthesize a caption header row spanning every body column.
        thead.push_str(&format!(
            "<tr><th colspan=\"{}\">{} - (Updated on $date)</th></tr>",
            max_column_count,
            text_of(marker).trim()
        ));
    }

    let mut output = String::from("<table>");
    if !thead.is_empty() {
        output.push_str("<thead>");
        output.push_str(&thead);
        output.push_str("</thead>");
    }
    output.push_str("<tbody>");
    output.push_str(&tbody);
    output.push_str("</tbody></table>");
    Ok(output)
}

fn push_cell(out: &mut String, cell_tag: &str, content: &str, colspan: Option<&str>) {
    out.push('<');
    out.push_str(cell_tag);
    if let Some(span) = colspan {
        out.push_str(&format!(" colspan=\"{}\"", span));
    }
    out.push('>');
    out.push_str(content);
    out.push_str("</");
    out.push_str(cell_tag);
    out.push('>');
}
