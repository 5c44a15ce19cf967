//! CSV loading and record normalization for the book catalog.
//!
//! Reads the catalog export (one row per book) and converts every row into a
//! [`BookRecord`]. The load is all-or-nothing: either every row is read and
//! normalized, or an error is returned before any analysis runs.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use catalog_core::error::{CatalogError, Result};
use catalog_core::models::BookRecord;
use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

// ── Schema ────────────────────────────────────────────────────────────────────

pub const TITLE_COLUMN: &str = "book";
pub const AUTHOR_COLUMN: &str = "author";
pub const DATE_COLUMN: &str = "publication date";
pub const LANGUAGE_COLUMN: &str = "language";
pub const PUBLISHER_COLUMN: &str = "book publisher";
pub const ISBN_COLUMN: &str = "ISBN";
pub const CATALOG_ID_COLUMN: &str = "BNB id";

/// Columns the source header must contain.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    TITLE_COLUMN,
    AUTHOR_COLUMN,
    DATE_COLUMN,
    LANGUAGE_COLUMN,
    PUBLISHER_COLUMN,
    ISBN_COLUMN,
    CATALOG_ID_COLUMN,
];

/// Cell contents treated as "no value", matched exactly before trimming.
const NULL_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ── Catalog snapshot ──────────────────────────────────────────────────────────

/// Immutable snapshot of a loaded catalog.
///
/// Handed by reference to every analysis; nothing mutates it after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<BookRecord>,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Wrap already-normalized records, stamping the current time.
    pub fn new(records: Vec<BookRecord>, source: impl Into<PathBuf>) -> Self {
        Self {
            records,
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ── Row access ────────────────────────────────────────────────────────────────

/// A raw source row whose cells can be looked up by column name.
pub trait RowCells {
    /// Raw cell text, or `None` when the column or cell is absent.
    fn cell(&self, column: &str) -> Option<&str>;
}

impl RowCells for HashMap<String, String> {
    fn cell(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }
}

/// One CSV record viewed through the header's column positions.
struct CsvRow<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl RowCells for CsvRow<'_> {
    fn cell(&self, column: &str) -> Option<&str> {
        let index = *self.columns.get(column)?;
        self.record.get(index)
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

/// `true` when `value` is one of the recognised "no value" markers.
pub fn is_null_marker(value: &str) -> bool {
    NULL_MARKERS.contains(&value)
}

/// Map a raw row onto a [`BookRecord`].
///
/// Text columns default to `""` when absent or null; the ISBN becomes `None`
/// in that case. A whitespace-only ISBN is kept as `Some("")`: deciding
/// whether that counts as missing is left to the ISBN analysis.
pub fn normalize_row(row: &impl RowCells) -> BookRecord {
    let present = |column: &str| row.cell(column).filter(|value| !is_null_marker(value));
    let text = |column: &str| present(column).map(str::trim).unwrap_or_default().to_string();

    BookRecord {
        title: text(TITLE_COLUMN),
        author: text(AUTHOR_COLUMN),
        publication_date: text(DATE_COLUMN),
        language: text(LANGUAGE_COLUMN),
        publisher: text(PUBLISHER_COLUMN),
        isbn: present(ISBN_COLUMN).map(|isbn| isbn.trim().to_string()),
        catalog_id: text(CATALOG_ID_COLUMN),
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load the catalog at `path` into an immutable [`Catalog`].
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let records = load_records(path)?;
    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(Catalog::new(records, path))
}

/// Read and normalize every row of the CSV file at `path`.
///
/// Fails with [`CatalogError::SourceNotFound`] when the file is absent and
/// [`CatalogError::Schema`] when required columns are missing.
pub fn load_records(path: &Path) -> Result<Vec<BookRecord>> {
    if !path.exists() {
        return Err(CatalogError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|source| CatalogError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    read_records(file)
}

/// Read and normalize CSV rows from any reader. The first row is the header.
pub fn read_records<R: Read>(input: R) -> Result<Vec<BookRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let columns = column_index(reader.headers()?);
    check_required_columns(&columns)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row = CsvRow {
            columns: &columns,
            record: &record,
        };
        records.push(normalize_row(&row));
    }

    debug!("Normalized {} rows", records.len());
    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Map header names to positions. The first occurrence of a duplicate wins.
fn column_index(headers: &StringRecord) -> HashMap<String, usize> {
    let mut columns = HashMap::new();
    for (position, name) in headers.iter().enumerate() {
        let name = if position == 0 {
            name.trim_start_matches('\u{feff}')
        } else {
            name
        };
        columns.entry(name.to_string()).or_insert(position);
    }
    columns
}

fn check_required_columns(columns: &HashMap<String, usize>) -> Result<()> {
    let mut missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    missing.sort();
    Err(CatalogError::Schema { missing })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "book,author,publication date,language,book publisher,ISBN,BNB id";

    fn read(csv: &str) -> Result<Vec<BookRecord>> {
        read_records(csv.as_bytes())
    }

    fn row(cells: &[(&str, &str)]) -> HashMap<String, String> {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ── normalize_row ─────────────────────────────────────────────────────────

    #[test]
    fn test_normalize_trims_every_field() {
        let record = normalize_row(&row(&[
            ("book", "  Bleak House "),
            ("author", " Dickens, Charles"),
            ("publication date", " 1853 "),
            ("language", "English "),
            ("book publisher", " Bradbury & Evans"),
            ("ISBN", " 9780141439723 "),
            ("BNB id", " GB123 "),
        ]));

        assert_eq!(record.title, "Bleak House");
        assert_eq!(record.author, "Dickens, Charles");
        assert_eq!(record.publication_date, "1853");
        assert_eq!(record.language, "English");
        assert_eq!(record.publisher, "Bradbury & Evans");
        assert_eq!(record.isbn.as_deref(), Some("9780141439723"));
        assert_eq!(record.catalog_id, "GB123");
    }

    #[test]
    fn test_normalize_absent_columns_default_to_empty() {
        let record = normalize_row(&row(&[("book", "Middlemarch")]));
        assert_eq!(record.title, "Middlemarch");
        assert_eq!(record.author, "");
        assert_eq!(record.language, "");
        assert_eq!(record.catalog_id, "");
        assert_eq!(record.isbn, None);
    }

    #[test]
    fn test_normalize_null_marker_isbn_is_none() {
        for marker in ["", "NaN", "N/A", "null", "<NA>"] {
            let record = normalize_row(&row(&[("ISBN", marker)]));
            assert_eq!(record.isbn, None, "marker {marker:?}");
        }
    }

    #[test]
    fn test_normalize_whitespace_isbn_is_kept_empty() {
        let record = normalize_row(&row(&[("ISBN", "   ")]));
        assert_eq!(record.isbn.as_deref(), Some(""));
        assert!(record.is_isbn_missing());
    }

    #[test]
    fn test_normalize_null_marker_text_is_empty() {
        let record = normalize_row(&row(&[("author", "nan"), ("language", "NULL")]));
        assert_eq!(record.author, "");
        assert_eq!(record.language, "");
    }

    #[test]
    fn test_is_null_marker_is_exact() {
        assert!(is_null_marker("NA"));
        assert!(!is_null_marker(" NA"));
        assert!(!is_null_marker("Nan Shepherd"));
    }

    // ── read_records ──────────────────────────────────────────────────────────

    #[test]
    fn test_read_records_basic() {
        let csv = format!(
            "{HEADER}\n\
             Emma,\"Austen, Jane\",1815,English,John Murray,9780141439587,GB1\n\
             Germinal,Zola,1885-03-01,French,Hachette,,GB2\n"
        );
        let records = read(&csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].author, "Austen, Jane");
        assert_eq!(records[0].isbn.as_deref(), Some("9780141439587"));
        assert_eq!(records[1].language, "French");
        assert_eq!(records[1].isbn, None);
    }

    #[test]
    fn test_read_records_column_order_does_not_matter() {
        let csv = "BNB id,ISBN,book publisher,language,publication date,author,book\n\
                   GB9,   ,Penguin,German,1901,Mann,Buddenbrooks\n";
        let records = read(csv).unwrap();

        assert_eq!(records[0].title, "Buddenbrooks");
        assert_eq!(records[0].catalog_id, "GB9");
        assert_eq!(records[0].isbn.as_deref(), Some(""));
    }

    #[test]
    fn test_read_records_extra_columns_ignored() {
        let csv = format!("{HEADER},notes\nA,B,1900,English,P,1,GB1,first edition\n");
        let records = read(&csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "A");
    }

    #[test]
    fn test_read_records_short_rows_are_padded() {
        let csv = format!("{HEADER}\nDracula,Stoker,1897\n");
        let records = read(&csv).unwrap();

        assert_eq!(records[0].publication_date, "1897");
        assert_eq!(records[0].language, "");
        assert_eq!(records[0].isbn, None);
    }

    #[test]
    fn test_read_records_strips_bom() {
        let csv = format!("\u{feff}{HEADER}\nA,B,1900,English,P,1,GB1\n");
        let records = read(&csv).unwrap();
        assert_eq!(records[0].title, "A");
    }

    #[test]
    fn test_read_records_header_only() {
        let records = read(HEADER).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_records_missing_columns_sorted() {
        let csv = "book,author,publication date,language\nA,B,1900,English\n";
        let err = read(csv).unwrap_err();

        match &err {
            CatalogError::Schema { missing } => {
                assert_eq!(missing, &["BNB id", "ISBN", "book publisher"]);
            }
            other => panic!("expected schema error, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Missing required columns in dataset: BNB id, ISBN, book publisher"
        );
    }

    #[test]
    fn test_read_records_empty_input_is_schema_error() {
        let err = read("").unwrap_err();
        assert!(matches!(err, CatalogError::Schema { ref missing } if missing.len() == 7));
    }

    #[test]
    fn test_read_records_invalid_utf8_fails_whole_load() {
        let mut bytes = format!("{HEADER}\nA,B,1900,English,P,1,GB1\n").into_bytes();
        bytes.extend_from_slice(b"C,\xff\xfe,1901,English,P,2,GB2\n");

        let err = read_records(bytes.as_slice()).unwrap_err();
        assert!(matches!(err, CatalogError::Csv(_)));
    }

    // ── load_records / load_catalog ───────────────────────────────────────────

    #[test]
    fn test_load_records_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Dataset Books.csv");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, CatalogError::SourceNotFound { .. }));
        assert!(err.to_string().contains("Dataset Books.csv"));
    }

    #[test]
    fn test_load_catalog_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.csv");
        std::fs::write(
            &path,
            format!("{HEADER}\nA,B,1900,English,P,1,GB1\nC,D,1901,Welsh,Q,,GB2\n"),
        )
        .unwrap();

        let catalog = load_catalog(&path).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.is_empty());
        assert_eq!(catalog.source(), path.as_path());
        assert_eq!(catalog.records()[1].language, "Welsh");
        assert!(catalog.loaded_at() <= Utc::now());
    }
}
