//! Catalog CSV ingest and write-back.
//!
//! The catalog is a spreadsheet export with one row per fitting type and size.
//! Only the type, size and offset columns are read; any other columns are
//! ignored.
//!
//! Design goals:
//! - **Strict schema** for the identifying columns (clear errors + exit code 2)
//! - **Lenient cells**: offsets stay raw until resolved, so one bad cell does
//!   not block the rest of the catalog
//! - **Deterministic**: row order is preserved (first row wins on duplicates)

use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;

use csv::StringRecord;
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::domain::CatalogConfig;
use crate::error::AppError;

/// Accepted spellings of the fitting-type column.
const TYPE_HEADERS: [&str; 4] = ["part", "part name", "part_type", "connection_type"];

/// Accepted spellings of the size column.
const SIZE_HEADERS: [&str; 6] = [
    "size",
    "size (inches)",
    "size(inches)",
    "size_inches",
    "size (in.)",
    "size_in",
];

/// A row that could not be used.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the catalog plus what happened along the way.
#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub catalog: Catalog,
    pub rows_read: usize,
    pub row_errors: Vec<RowError>,
}

/// Resolved column positions.
struct Columns {
    fitting_type: usize,
    size: usize,
    primary: usize,
    secondary: Option<usize>,
}

/// Load a catalog CSV from disk.
pub fn load_catalog(path: &Path, config: &CatalogConfig) -> Result<LoadedCatalog, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open catalog '{}': {e}", path.display())))?;
    let loaded = read_catalog(file, config)?;
    info!(
        path = %path.display(),
        rows = loaded.rows_read,
        entries = loaded.catalog.len(),
        skipped = loaded.row_errors.len(),
        "loaded catalog"
    );
    Ok(loaded)
}

/// Read a catalog from any CSV source.
pub fn read_catalog<R: std::io::Read>(source: R, config: &CatalogConfig) -> Result<LoadedCatalog, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read catalog headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let columns = resolve_columns(&header_map, &headers, config)?;

    let mut entries = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2: records start after the header line, and lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let Some(fitting_type) = get_cell(&record, Some(columns.fitting_type)) else {
            // Blank spacer rows are common in spreadsheet exports.
            if record.iter().any(|c| !c.is_empty()) {
                row_errors.push(RowError {
                    line,
                    message: "Missing fitting type.".to_string(),
                });
            }
            continue;
        };

        entries.push(CatalogEntry::new(
            fitting_type,
            get_cell(&record, Some(columns.size)).unwrap_or_default(),
            get_cell(&record, Some(columns.primary)).map(str::to_string),
            get_cell(&record, columns.secondary).map(str::to_string),
        ));
    }

    for err in &row_errors {
        warn!(line = err.line, "skipped catalog row: {}", err.message);
    }

    Ok(LoadedCatalog {
        catalog: Catalog::from_entries(entries),
        rows_read,
        row_errors,
    })
}

/// Persist the catalog in row order using the configured offset headers.
pub fn write_catalog(path: &Path, catalog: &Catalog, config: &CatalogConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", parent.display())))?;
    }
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create catalog '{}': {e}", path.display())))?;
    write_catalog_to(file, catalog, config)?;
    info!(path = %path.display(), entries = catalog.len(), "wrote catalog");
    Ok(())
}

pub fn write_catalog_to<W: std::io::Write>(sink: W, catalog: &Catalog, config: &CatalogConfig) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    let write_err = |e: csv::Error| AppError::new(2, format!("Failed to write catalog CSV: {e}"));

    writer
        .write_record([
            "Part",
            "Size",
            config.primary_column.as_str(),
            config.secondary_column.as_str(),
        ])
        .map_err(write_err)?;

    for entry in catalog.entries() {
        writer
            .write_record([
                entry.fitting_type.as_str(),
                entry.size.as_str(),
                entry.primary_offset.as_deref().unwrap_or(""),
                entry.secondary_offset.as_deref().unwrap_or(""),
            ])
            .map_err(write_err)?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush catalog CSV: {e}")))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // Keep the first column when a header repeats.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel exports UTF-8 CSVs with a BOM on the first header.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn resolve_columns(
    header_map: &HashMap<String, usize>,
    headers: &StringRecord,
    config: &CatalogConfig,
) -> Result<Columns, AppError> {
    let find = |names: &[&str]| names.iter().find_map(|n| header_map.get(*n).copied());

    let fitting_type = find(TYPE_HEADERS.as_slice());
    let size = find(SIZE_HEADERS.as_slice());
    let (Some(fitting_type), Some(size)) = (fitting_type, size) else {
        return Err(AppError::new(
            2,
            format!(
                "Catalog must contain a 'Part' column and a 'Size' column (e.g. 'Size (inches)'). Found: {}",
                list_headers(headers)
            ),
        ));
    };

    let primary = header_map
        .get(&normalize_header_name(&config.primary_column))
        .copied()
        .ok_or_else(|| {
            AppError::new(
                2,
                format!(
                    "Offset column '{}' not found in catalog. Found: {}",
                    config.primary_column,
                    list_headers(headers)
                ),
            )
        })?;
    let secondary = header_map
        .get(&normalize_header_name(&config.secondary_column))
        .copied();

    Ok(Columns {
        fitting_type,
        size,
        primary,
        secondary,
    })
}

fn list_headers(headers: &StringRecord) -> String {
    headers
        .iter()
        .map(|h| format!("'{}'", h.trim_start_matches('\u{feff}')))
        .collect::<Vec<_>>()
        .join(", ")
}

fn get_cell(record: &StringRecord, idx: Option<usize>) -> Option<&str> {
    record.get(idx?).map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}Part,Size (inches),Notes,G,G1
Elbow 90(Socket x Socket),1.5,,0.6875,
Elbow 90(Socket x Socket),2.0,sch40,0.75,0.5
,,,,
Tee (Reducing),2X2X1,,15/32,
,3,,1,
Union (Socket x Socket),3,,3/0,
";

    #[test]
    fn reads_rows_and_skips_blank_or_typeless_rows() {
        let loaded = read_catalog(SAMPLE.as_bytes(), &CatalogConfig::default()).unwrap();
        assert_eq!(loaded.rows_read, 6);
        assert_eq!(loaded.catalog.len(), 4);
        assert_eq!(loaded.row_errors.len(), 1);
        assert_eq!(loaded.row_errors[0].line, 6);

        let elbow = loaded.catalog.lookup("Elbow 90(Socket x Socket)", "2").unwrap();
        assert_eq!(elbow.secondary_offset.as_deref(), Some("0.5"));
        assert!(loaded.catalog.lookup("Tee (Reducing)", "2x2x1").is_some());
        // The bad cell is kept raw; it only fails when resolved.
        let union = loaded.catalog.lookup("Union (Socket x Socket)", "3").unwrap();
        assert!(union.primary().is_err());
    }

    #[test]
    fn missing_columns_are_schema_errors() {
        let err = read_catalog("Item,Size,G\nA,1,1\n".as_bytes(), &CatalogConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("'Item'"));

        let err = read_catalog("Part,Size,H\nA,1,1\n".as_bytes(), &CatalogConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Offset column 'G'"));
    }

    #[test]
    fn secondary_column_is_optional() {
        let loaded = read_catalog("part,size,g\nCap,1,0.5\n".as_bytes(), &CatalogConfig::default()).unwrap();
        let cap = loaded.catalog.lookup("Cap", "1").unwrap();
        assert_eq!(cap.secondary_offset, None);
    }

    #[test]
    fn write_then_read_preserves_rows() {
        let config = CatalogConfig::default();
        let loaded = read_catalog(SAMPLE.as_bytes(), &config).unwrap();
        let mut buf = Vec::new();
        write_catalog_to(&mut buf, &loaded.catalog, &config).unwrap();

        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("Part,Size,G,G1\n"));

        let reread = read_catalog(buf.as_slice(), &config).unwrap();
        assert_eq!(reread.catalog.entries(), loaded.catalog.entries());
    }
}
