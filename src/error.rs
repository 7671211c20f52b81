//! Error types for dataset loading and aggregation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a dataset or computing its statistics.
///
/// Every variant is fatal to the analysis: no statistic is reported when
/// any of them fails.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// A mean or percentage denominator group has no records.
    #[error("no records in group: {0}")]
    EmptyGroup(String),

    /// A record lacks a column of the census schema.
    #[error("missing field '{field}' at line {line}")]
    MissingField { field: String, line: u64 },

    /// The source could not be parsed into the census schema.
    #[error("malformed input at line {line}: {message}")]
    MalformedInput { line: u64, message: String },

    /// The dataset file could not be opened.
    #[error("failed to open dataset {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text report could not be written.
    #[error("failed to write report: {0}")]
    Output(#[source] std::io::Error),
}

impl AnalyzerError {
    pub(crate) fn empty_group(group: impl Into<String>) -> Self {
        Self::EmptyGroup(group.into())
    }
}

impl From<csv::Error> for AnalyzerError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|pos| pos.line()).unwrap_or(0);
        Self::MalformedInput {
            line,
            message: err.to_string(),
        }
    }
}
