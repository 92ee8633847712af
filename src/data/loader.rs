use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use log::{debug, error, warn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, TabularDataset};
use crate::error::LoadError;

/// Variant column names produced by different simulator builds, mapped to the
/// canonical name the reports look up.
pub const COLUMN_ALIASES: &[(&str, &str)] = &[("TxPackets", "TxPkts"), ("Time(s)", "Time")];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table, converting every failure into the missing sentinel.
///
/// A missing file is the expected case and only warns; anything else is
/// logged as an error. Neither stops the run.
pub fn load_dataset(path: &Path) -> Dataset {
    match load_file(path) {
        Ok(ds) => {
            debug!(
                "loaded {} ({} rows, columns {:?})",
                path.display(),
                ds.len(),
                ds.columns
            );
            Dataset::Loaded(ds)
        }
        Err(LoadError::NotFound(_)) => {
            warn!("input file not found: {}", path.display());
            Dataset::missing(path)
        }
        Err(e) => {
            error!("could not load {}: {e}", path.display());
            Dataset::missing(path)
        }
    }
}

/// Load a table from a file. Dispatch by extension; anything that is not
/// JSON or Parquet is read as CSV.
///
/// The returned table has already been through [`normalize_schema`].
pub fn load_file(path: &Path) -> Result<TabularDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let mut ds = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        _ => load_csv(path)?,
    };
    normalize_schema(&mut ds);
    Ok(ds)
}

/// Rename aliased columns to their canonical names. A column is only renamed
/// when the canonical name is not already present.
pub fn normalize_schema(ds: &mut TabularDataset) {
    for (alias, canonical) in COLUMN_ALIASES {
        if !ds.has_column(canonical) && ds.rename_column(alias, canonical) {
            debug!("normalized column '{alias}' -> '{canonical}'");
        }
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
fn load_csv(path: &Path) -> Result<TabularDataset, LoadError> {
    let file = open(path)?;
    read_csv(file)
}

/// Parse CSV text from any reader. Short records are padded with nulls.
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<TabularDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(CellValue::parse).collect());
    }

    Ok(TabularDataset::new(columns, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Time": 0.1, "UE_ID": 1, "Throughput_Mbps": 2.9 },
///   ...
/// ]
/// ```
///
/// Columns come out in order of first appearance across the records.
fn load_json(path: &Path) -> Result<TabularDataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(open(path)?)?;

    let records = root.as_array().ok_or_else(|| LoadError::Malformed {
        row: 0,
        reason: "expected a top-level JSON array".into(),
    })?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| LoadError::Malformed {
            row: i,
            reason: "not a JSON object".into(),
        })?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(TabularDataset::new(columns, rows))
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

/// Load a Parquet file with flat scalar columns (strings, ints, floats,
/// bools). Other column types are kept as their type name.
fn load_parquet(path: &Path) -> Result<TabularDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(TabularDataset::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| CellValue::String(s.value(row).to_string()))
            .unwrap_or(CellValue::Null),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64))
            .unwrap_or(CellValue::Null),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Integer(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::UInt32 => any
            .downcast_ref::<UInt32Array>()
            .map(|a| CellValue::Integer(a.value(row) as i64))
            .unwrap_or(CellValue::Null),
        DataType::UInt64 => any
            .downcast_ref::<UInt64Array>()
            .and_then(|a| i64::try_from(a.value(row)).ok())
            .map(CellValue::Integer)
            .unwrap_or(CellValue::Null),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Float(a.value(row) as f64))
            .unwrap_or(CellValue::Null),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Float(a.value(row)))
            .unwrap_or(CellValue::Null),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Bool(a.value(row)))
            .unwrap_or(CellValue::Null),
        other => CellValue::String(format!("{other:?}")),
    }
}
