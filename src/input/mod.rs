//! Loading of time-use tables from CSV files.

pub mod table;

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{debug, instrument};

pub use table::RawTable;

/// Errors that can occur while reading a table from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV file has no header row: {path}")]
    EmptyCsv { path: PathBuf },
}

/// Reads a CSV file with a header row. Every cell is kept as text, parsing into minutes happens
/// during aggregation. Rows shorter than the header are allowed, their missing cells are
/// treated as missing values.
#[instrument]
pub fn read_csv_table(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;
    let table = read_table(file).map_err(|source| LoadError::CsvParse {
        path: path.to_path_buf(),
        source,
    })?;
    if table.headers().is_empty() {
        return Err(LoadError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    debug!(
        columns = table.headers().len(),
        rows = table.rows().len(),
        "Loaded table"
    );
    Ok(table)
}

/// Reads a CSV table from any reader. Used directly by tests and by [read_csv_table].
pub fn read_table(reader: impl std::io::Read) -> Result<RawTable, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, v)| {
            // Excel likes to prepend a BOM to UTF-8 exports.
            if index == 0 {
                v.trim_start_matches('\u{feff}').to_string()
            } else {
                v.to_string()
            }
        })
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|v| Some(v.to_string())).collect());
    }
    Ok(RawTable::new(headers, rows))
}
