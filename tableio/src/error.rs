//! Error type for table I/O
//!
//! The `Display` text of every variant is the diagnostic shown to the host
//! application, so the wording is kept stable.

use std::fmt;

use tableio_core::{CoreError, Signature};
use thiserror::Error;

/// Result type for table I/O operations
pub type Result<T> = std::result::Result<T, TableIoError>;

/// Which dimension of a matrix a check refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Columns,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::Rows => "rows",
            Axis::Columns => "columns",
        })
    }
}

/// Errors raised while loading or storing tables
#[derive(Debug, Error)]
pub enum TableIoError {
    #[error("Not possible to open file \"{path}\"{}", reason_suffix(.reason))]
    Open {
        path: String,
        reason: Option<String>,
    },

    #[error("Variable \"{name}\" not found on file \"{file}\".")]
    VariableNotFound { name: String, file: String },

    #[error("Table matrix \"{name}\" not found on file \"{file}\".")]
    TableNotFound { name: String, file: String },

    #[error("Variable \"{name}\" has not the required rank 2.")]
    WrongRank { name: String, rank: usize },

    #[error("Matrix \"{name}\" has not the required numeric variable class.")]
    UnsupportedClass { name: String, class: String },

    #[error("Matrix \"{name}\" must not be complex.")]
    Complex { name: String },

    #[error("Cannot read {requested} {axis} of array \"{name}({rows},{cols})\" from file \"{file}\"")]
    DimensionMismatch {
        axis: Axis,
        requested: usize,
        name: String,
        rows: usize,
        cols: usize,
        file: String,
    },

    #[error("Matrix \"{name}({rows},{cols})\" from file \"{file}\" is empty.")]
    EmptyMatrix {
        name: String,
        rows: usize,
        cols: usize,
        file: String,
    },

    #[error("Cannot write variable \"{name}\": {len} values given for a {rows}x{cols} matrix")]
    DataLength {
        name: String,
        len: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Error reading first line from file \"{file}\": End-Of-File reached.")]
    FirstLineEof { file: String },

    #[error("Error reading format and version information in first line of file \"{file}\": {found}")]
    BadSignature { file: String, found: Signature },

    #[error("End-of-file reached when reading numeric data of matrix \"{name}({rows},{cols})\" from file \"{file}\"")]
    UnexpectedEof {
        name: String,
        rows: u64,
        cols: u64,
        file: String,
    },

    #[error("Error in line {line} when reading numeric data of matrix \"{name}({rows},{cols})\" from file \"{file}\"")]
    Parse {
        line: u64,
        name: String,
        rows: u64,
        cols: u64,
        file: String,
    },

    #[error("Table matrix \"{name}({rows},{cols})\" from file \"{file}\" has a zero dimension.")]
    ZeroDimension {
        name: String,
        rows: u64,
        cols: u64,
        file: String,
    },

    #[error("Error when reading numeric data of matrix \"{name}({rows},{cols})\" from file \"{file}\"")]
    ReadData {
        name: String,
        rows: usize,
        cols: usize,
        file: String,
    },

    #[error("Invalid MAT-file \"{file}\": {error}")]
    Container { file: String, error: CoreError },

    #[error("The table dimensions of matrix \"{name}({rows},{cols})\" from file \"{file}\" do not match the actual table size (line {line}).")]
    DeclaredSizeMismatch {
        name: String,
        rows: u64,
        cols: u64,
        file: String,
        line: u64,
    },

    #[error("Memory allocation error")]
    Allocation,

    #[error("Invalid version {version} for file \"{file}\"")]
    InvalidVersion { version: String, file: String },

    #[error("Not possible to newly create file \"{file}\"\n(maybe version 7.3 not supported)")]
    Create { file: String },

    #[error("Cannot write variable \"{name}\" to \"{file}\"")]
    Write {
        name: String,
        file: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason
        .as_deref()
        .map(|r| format!(": {r}"))
        .unwrap_or_default()
}

/// Coarse classification of [`TableIoError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    ShapeMismatch,
    Format,
    DeclaredSizeMismatch,
    Allocation,
    Version,
    Io,
}

impl TableIoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableIoError::Open { .. }
            | TableIoError::VariableNotFound { .. }
            | TableIoError::TableNotFound { .. } => ErrorKind::NotFound,
            TableIoError::WrongRank { .. }
            | TableIoError::UnsupportedClass { .. }
            | TableIoError::Complex { .. }
            | TableIoError::DimensionMismatch { .. }
            | TableIoError::EmptyMatrix { .. }
            | TableIoError::DataLength { .. } => ErrorKind::ShapeMismatch,
            TableIoError::FirstLineEof { .. }
            | TableIoError::BadSignature { .. }
            | TableIoError::UnexpectedEof { .. }
            | TableIoError::Parse { .. }
            | TableIoError::ZeroDimension { .. }
            | TableIoError::ReadData { .. }
            | TableIoError::Container { .. } => ErrorKind::Format,
            TableIoError::DeclaredSizeMismatch { .. } => ErrorKind::DeclaredSizeMismatch,
            TableIoError::Allocation => ErrorKind::Allocation,
            TableIoError::InvalidVersion { .. } => ErrorKind::Version,
            TableIoError::Create { .. } | TableIoError::Write { .. } | TableIoError::Io(_) => {
                ErrorKind::Io
            }
        }
    }

    /// Wrap a format error raised while interpreting `file`
    pub fn container(file: impl Into<String>, error: CoreError) -> Self {
        TableIoError::Container {
            file: file.into(),
            error,
        }
    }

    /// Open failure with the reason derived from the I/O error
    pub fn open(path: impl Into<String>, err: &std::io::Error) -> Self {
        let reason = match err.kind() {
            std::io::ErrorKind::NotFound => "No such file or directory".to_string(),
            _ => err.to_string(),
        };
        TableIoError::Open {
            path: path.into(),
            reason: Some(reason),
        }
    }
}
