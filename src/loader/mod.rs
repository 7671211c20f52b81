//! Census dataset loader.
//!
//! This module reads comma-separated census records into an in-memory
//! [`Dataset`], validating every row against the census schema.

use crate::error::AnalyzerError;
use crate::models::{Dataset, Record, COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration for reading a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Whether the first row names the columns.
    pub has_headers: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            has_headers: false,
            delimiter: b',',
        }
    }
}

impl From<&crate::config::DatasetConfig> for LoadOptions {
    fn from(config: &crate::config::DatasetConfig) -> Self {
        Self {
            has_headers: config.has_headers,
            delimiter: config.delimiter_byte(),
        }
    }
}

/// Loader for a dataset file on disk.
pub struct DatasetLoader {
    path: PathBuf,
    options: LoadOptions,
}

impl DatasetLoader {
    /// Create a new loader for the given file.
    pub fn new(path: PathBuf, options: LoadOptions) -> Self {
        Self { path, options }
    }

    /// Open the file and read every record.
    pub fn load(&self) -> Result<Dataset, AnalyzerError> {
        info!("Loading dataset from: {}", self.path.display());

        let file = File::open(&self.path).map_err(|source| AnalyzerError::Io {
            path: self.path.clone(),
            source,
        })?;
        let dataset = read_dataset(file, &self.options)?;

        info!("Loaded {} records", dataset.len());
        Ok(dataset)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read a dataset from any reader.
///
/// Without headers, columns are taken by position in schema order and
/// trailing extra fields are ignored. With headers, every schema column
/// must be named in the header row, in any order.
pub fn read_dataset<R: Read>(reader: R, options: &LoadOptions) -> Result<Dataset, AnalyzerError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = if options.has_headers {
        let headers = rdr.headers()?.clone();
        check_headers(&headers)?;
        headers
    } else {
        StringRecord::from(COLUMNS.to_vec())
    };

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|pos| pos.line()).unwrap_or(0);

        if is_blank(&row) {
            debug!("Skipping blank line {}", line);
            continue;
        }

        if row.len() < headers.len() {
            return Err(AnalyzerError::MissingField {
                field: headers[row.len()].to_string(),
                line,
            });
        }

        let record: Record =
            row.deserialize(Some(&headers))
                .map_err(|e| AnalyzerError::MalformedInput {
                    line,
                    message: e.to_string(),
                })?;
        records.push(record);
    }

    Ok(Dataset::new(records))
}

/// Check that a header row names every schema column.
fn check_headers(headers: &StringRecord) -> Result<(), AnalyzerError> {
    match COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        Some(column) => Err(AnalyzerError::MissingField {
            field: column.to_string(),
            line: 1,
        }),
        None => Ok(()),
    }
}

/// A row made of a single empty field, e.g. whitespace-only lines.
fn is_blank(row: &StringRecord) -> bool {
    row.len() == 1 && row[0].is_empty()
}
