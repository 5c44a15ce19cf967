//! Non-interactive report view: every analysis at once, as text or JSON.

use std::io::Write;

use catalog_data::analysis::analyze_catalog;
use catalog_data::reader::Catalog;
use tracing::info;

use crate::sections::text_report;

/// Write the full report for `catalog` to `output` in `format`
/// (`"json"`, anything else is text).
pub fn write_report<W: Write>(
    catalog: &Catalog,
    top_authors_limit: usize,
    format: &str,
    mut output: W,
) -> anyhow::Result<()> {
    let report = analyze_catalog(catalog.records(), top_authors_limit);
    info!(
        "Writing {} report for {} records",
        format,
        report.total_records
    );

    let rendered = match format {
        "json" => report.to_json_pretty()?,
        _ => text_report(&report),
    };
    writeln!(output, "{rendered}")?;
    Ok(())
}
