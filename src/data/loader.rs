use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::util::display::array_value_to_string;
use calamine::{Data, Range, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CellValue, Column, PressureDataset, Schema};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a pressure dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one column per channel
/// * `.xlsx`    – first worksheet, first row is the header
/// * `.parquet` – flat columns (numbers, strings, timestamps)
///
/// The table is checked against `schema` before it is returned.
pub fn load_file(path: &Path, schema: &Schema) -> Result<PressureDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let columns = match ext.as_str() {
        "csv" => load_csv(path)?,
        "xlsx" | "xlsm" | "xls" => load_xlsx(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = PressureDataset::from_columns(columns, schema)
        .with_context(|| format!("checking {}", path.display()))?;
    log::debug!(
        "{}: {} rows, columns {:?}",
        path.display(),
        dataset.len(),
        dataset.column_names().collect::<Vec<_>>()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one value per cell.
fn load_csv(path: &Path) -> Result<Vec<Column>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|h| Column::new(h.clone(), Vec::new()))
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col, value) in columns.iter_mut().zip(record.iter()) {
            col.values.push(guess_cell_type(value));
        }
    }

    Ok(columns)
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if looks_like_timestamp(s) {
        return CellValue::Timestamp(s.to_string());
    }
    CellValue::Text(s.to_string())
}

/// `2024-01-31...`, `12:30:05...` and similar clock/calendar forms.
fn looks_like_timestamp(s: &str) -> bool {
    let bytes = s.as_bytes();
    let digits_then = |n: usize, sep: u8| {
        bytes.len() > n && bytes[..n].iter().all(u8::is_ascii_digit) && bytes[n] == sep
    };
    digits_then(4, b'-') || digits_then(2, b':') || digits_then(1, b':')
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first worksheet. The first row holds the column names.
fn load_xlsx(path: &Path) -> Result<Vec<Column>> {
    let mut workbook = open_workbook_auto(path).context("opening spreadsheet")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("spreadsheet has no worksheets")?
        .context("reading first worksheet")?;
    sheet_columns(&range)
}

/// Blank header cells are named `Unnamed: {i}`; missing cells become nulls.
fn sheet_columns(range: &Range<Data>) -> Result<Vec<Column>> {
    let mut rows = range.rows();
    let header = rows.next().context("worksheet is empty")?;
    let mut columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| match cell {
            Data::Empty => Column::new(format!("Unnamed: {i}"), Vec::new()),
            other => Column::new(other.to_string(), Vec::new()),
        })
        .collect();

    for row in rows {
        for (i, col) in columns.iter_mut().enumerate() {
            col.values.push(row.get(i).map_or(CellValue::Null, sheet_cell));
        }
    }

    Ok(columns)
}

fn sheet_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => guess_cell_type(s.trim()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => CellValue::Timestamp(ndt.to_string()),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Timestamp(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per channel.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Column>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let mut columns: Vec<Column> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), Vec::new()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, col) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                col.values.push(
                    extract_cell(array, row)
                        .with_context(|| format!("column '{}', row {row}", col.name))?,
                );
            }
        }
    }

    Ok(columns)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => {
            let s = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            guess_cell_type(s.value(row))
        }
        DataType::LargeUtf8 => guess_cell_type(col.as_string::<i64>().value(row)),
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            CellValue::Float(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            CellValue::Float(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            CellValue::Text(arr.value(row).to_string())
        }
        DataType::Timestamp(..)
        | DataType::Date32
        | DataType::Date64
        | DataType::Time32(_)
        | DataType::Time64(_)
        | DataType::Duration(_) => CellValue::Timestamp(
            array_value_to_string(col.as_ref(), row).context("formatting temporal value")?,
        ),
        _ => CellValue::Text(
            array_value_to_string(col.as_ref(), row).context("formatting value")?,
        ),
    };
    Ok(cell)
}
