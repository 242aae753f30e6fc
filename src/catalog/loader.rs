//! Dataset loading from delimited text, spreadsheets, and Parquet
//!
//! Every format is first read into a `RawTable` of loosely typed cells; the
//! catalog then validates the schema and converts rows into entries.

use calamine::{open_workbook_auto, Data, Reader};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

use crate::catalog::Catalog;
use crate::errors::{QaError, Result};

/// A single loosely typed cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Text form of the cell; `None` for empty cells
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(n.to_string()),
        }
    }

    /// Numeric form of the cell; text is parsed after trimming
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Header plus rows, before schema validation
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Supported on-disk formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// CSV or other single-byte delimited text
    Delimited { delimiter: u8 },
    /// Excel / OpenDocument workbook (first sheet)
    Spreadsheet,
    /// Apache Parquet
    Parquet,
}

impl DataFormat {
    pub const CSV: DataFormat = DataFormat::Delimited { delimiter: b',' };
    pub const TSV: DataFormat = DataFormat::Delimited { delimiter: b'\t' };

    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(Self::CSV),
            "tsv" => Ok(Self::TSV),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "parquet" | "pq" => Ok(Self::Parquet),
            "" => Err(QaError::UnsupportedFormat(format!(
                "{} has no file extension",
                path.display()
            ))),
            other => Err(QaError::UnsupportedFormat(other.to_string())),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            DataFormat::Delimited { delimiter: b'\t' } => "tsv",
            DataFormat::Delimited { .. } => "csv",
            DataFormat::Spreadsheet => "excel",
            DataFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DataFormat {
    type Err = QaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::CSV),
            "tsv" => Ok(Self::TSV),
            "excel" | "xlsx" | "xls" | "spreadsheet" | "ods" => Ok(Self::Spreadsheet),
            "parquet" | "pq" => Ok(Self::Parquet),
            other => Err(QaError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Load a catalog from `path` in the given format
pub fn load(path: impl AsRef<Path>, format: DataFormat) -> Result<Catalog> {
    let path = path.as_ref();
    let table = read_table(path, format)?;
    let catalog = Catalog::from_table(&table)?;

    tracing::info!(
        path = %path.display(),
        format = %format,
        entries = catalog.len(),
        "Loaded catalog"
    );

    Ok(catalog)
}

/// Load a catalog, detecting the format from the file extension
pub fn load_auto(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    load(path, DataFormat::from_path(path)?)
}

/// Read a file into a raw table without schema validation
pub fn read_table(path: &Path, format: DataFormat) -> Result<RawTable> {
    if !path.exists() {
        return Err(QaError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let table = match format {
        DataFormat::Delimited { delimiter } => read_delimited(path, delimiter)?,
        DataFormat::Spreadsheet => read_spreadsheet(path)?,
        DataFormat::Parquet => read_parquet(path)?,
    };

    if table.headers.is_empty() {
        return Err(QaError::EmptyData {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "Read raw table"
    );

    Ok(table)
}

fn parse_error(format: DataFormat, err: impl fmt::Display) -> QaError {
    QaError::ParseError {
        format: format.to_string(),
        message: err.to_string(),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<RawTable> {
    let format = DataFormat::Delimited { delimiter };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)
        .map_err(|e| parse_error(format, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| parse_error(format, e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    // A single blank header cell means the file had no header line at all
    if headers.iter().all(|h| h.is_empty()) {
        return Ok(RawTable::default());
    }

    let mut rows = Vec::new();
    for (row_num, record) in reader.records().enumerate() {
        let record = record.map_err(|e| parse_error(format, e))?;

        // Short rows stay short and their missing cells read as absent later;
        // long rows are malformed
        if record.len() > headers.len() {
            return Err(parse_error(
                format,
                format!(
                    "Expected {} fields in line {}, saw {}",
                    headers.len(),
                    row_num + 2,
                    record.len()
                ),
            ));
        }

        let row = record
            .iter()
            .map(|value| {
                if value.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(value.to_string())
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn spreadsheet_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn read_spreadsheet(path: &Path) -> Result<RawTable> {
    let format = DataFormat::Spreadsheet;
    let mut workbook = open_workbook_auto(path).map_err(|e| parse_error(format, e))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| parse_error(format, e))?,
        None => return Ok(RawTable::default()),
    };

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(header) => header.iter().map(|c| c.to_string().trim().to_string()).collect(),
        None => return Ok(RawTable::default()),
    };

    let rows = rows_iter
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn parquet_cell(field: &Field) -> Cell {
    match field {
        Field::Null => Cell::Empty,
        Field::Byte(v) => Cell::Number(*v as f64),
        Field::Short(v) => Cell::Number(*v as f64),
        Field::Int(v) => Cell::Number(*v as f64),
        Field::Long(v) => Cell::Number(*v as f64),
        Field::UByte(v) => Cell::Number(*v as f64),
        Field::UShort(v) => Cell::Number(*v as f64),
        Field::UInt(v) => Cell::Number(*v as f64),
        Field::ULong(v) => Cell::Number(*v as f64),
        Field::Float(v) => Cell::Number(*v as f64),
        Field::Double(v) => Cell::Number(*v),
        Field::Str(s) if s.is_empty() => Cell::Empty,
        Field::Str(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn read_parquet(path: &Path) -> Result<RawTable> {
    let format = DataFormat::Parquet;
    let file = File::open(path)?;
    let reader = SerializedFileReader::new(file).map_err(|e| parse_error(format, e))?;

    let headers: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let rows_iter = reader
        .get_row_iter(None)
        .map_err(|e| parse_error(format, e))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        let row = row.map_err(|e| parse_error(format, e))?;
        let mut cells = vec![Cell::Empty; headers.len()];
        for (name, field) in row.get_column_iter() {
            if let Some(idx) = headers.iter().position(|h| h == name) {
                cells[idx] = parquet_cell(field);
            }
        }
        rows.push(cells);
    }

    Ok(RawTable { headers, rows })
}
