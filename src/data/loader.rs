use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, OrderRecord, OrderTable};

/// Upper bound on a remote export fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Sources and errors
// ---------------------------------------------------------------------------

/// Where the order table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Local file; format picked by extension.
    File(PathBuf),
    /// HTTP(S) endpoint returning a CSV export (e.g. a shared spreadsheet).
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` strings are URLs, anything else is a path.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let lower = text.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(text.to_string())
        } else {
            DataSource::File(PathBuf::from(text))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// The source could not be read or is not a table.
#[derive(Debug, thiserror::Error)]
#[error("failed to load orders from {origin}: {cause:#}")]
pub struct LoadError {
    pub origin: String,
    pub cause: anyhow::Error,
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the order table from `source`.
pub fn load(source: &DataSource) -> std::result::Result<OrderTable, LoadError> {
    let result = match source {
        DataSource::File(path) => load_file(path),
        DataSource::Url(url) => load_url(url),
    };
    result.map_err(|cause| LoadError {
        origin: source.to_string(),
        cause,
    })
}

/// Fetch `source` again. Same contract as [`load`]: failures are returned,
/// the caller decides whether to keep showing the previous table.
pub fn reload(source: &DataSource) -> std::result::Result<OrderTable, LoadError> {
    log::debug!("Reloading orders from {source}");
    load(source)
}

/// Load an order table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row plus one row per order
/// * `.json`    – `[{ "CLIENT ID": ..., ... }, ...]`
/// * `.parquet` – flat columns, one row per order
fn load_file(path: &Path) -> Result<OrderTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)
        }
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

fn load_url(url: &str) -> Result<OrderTable> {
    let agent = ureq::AgentBuilder::new().timeout(FETCH_TIMEOUT).build();
    let response = agent
        .get(url)
        .call()
        .map_err(|e| anyhow::anyhow!("fetching {url}: {e}"))?;
    read_csv(response.into_reader())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse comma-separated text with a mandatory header row.
///
/// Shared by local files, remote exports, and anything re-reading the
/// exporter's output.
pub fn read_csv<R: Read>(input: R) -> Result<OrderTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_columns(&columns)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let values = record.iter().map(CellValue::from_text).collect();
        rows.push(OrderRecord::new(values));
    }

    Ok(OrderTable::new(columns, rows))
}

fn check_columns(columns: &[String]) -> Result<()> {
    if columns.is_empty() {
        bail!("no header row");
    }
    let mut seen = HashSet::new();
    for (idx, col) in columns.iter().enumerate() {
        if col.is_empty() {
            bail!("column {idx} has an empty name");
        }
        if !seen.insert(col.as_str()) {
            bail!("duplicate column '{col}'");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "CLIENT ID": "C-001", "Pick Up Status (Done / Not Done)": "Done" },
///   ...
/// ]
/// ```
///
/// Columns are taken in order of first appearance; a key missing from a
/// record is a missing cell.
fn load_json(path: &Path) -> Result<OrderTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }
    check_columns(&columns)?;

    let rows = objects
        .into_iter()
        .map(|obj| {
            let values = columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect();
            OrderRecord::new(values)
        })
        .collect();

    Ok(OrderTable::new(columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per sheet column.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<OrderTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_columns(&columns)?;

    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let values = (0..batch.num_columns())
                .map(|col_idx| extract_cell(batch.column(col_idx), row))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Row {row}"))?;
            rows.push(OrderRecord::new(values));
        }
    }

    Ok(OrderTable::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| CellValue::from(a.value(row))),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| CellValue::from(a.value(row))),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    match value {
        Some(v) => Ok(v),
        // Dictionary-encoded categoricals, dates, and the like.
        None => {
            let text = array_value_to_string(col, row)
                .with_context(|| format!("formatting {:?} value", col.data_type()))?;
            Ok(CellValue::String(text))
        }
    }
}
