//! tableio - Numeric lookup tables stored in MAT-files and text table files
//!
//! Loads and stores the 2-D `f64` tables a simulation runtime uses as
//! lookup data. A table lives either in a MATLAB MAT-file (level 4 or
//! level 5, optionally zlib compressed) or as a named block in an ASCII
//! text table file starting with `#1`.
//!
//! ## Architecture
//!
//! - **tableio-core**: format definitions, number parsing and transposition
//!   (no I/O, `no_std`)
//! - **tableio**: file access, codecs, diagnostics and the [`TableIo`] facade
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tableio::{TableConfig, TableIo};
//!
//! fn example() -> tableio::Result<()> {
//!     let io = TableIo::with_config(TableConfig::default().with_verbose(true));
//!
//!     // A field of a 1x1 struct inside a MAT-file
//!     let (rows, cols) = io.sizes("data.mat", "params.gain");
//!     let gain = io.read_matrix("data.mat", "params.gain", rows, cols)?;
//!     println!("gain[0, 1] = {:?}", gain.get(0, 1));
//!
//!     // A block of a text table file
//!     let curve = io.read_table("curves.txt", "tab1")?;
//!     for row in curve.iter_rows() {
//!         println!("{row:?}");
//!     }
//!
//!     // Store a row-major 2x2 matrix as a compressed level 5 variable
//!     io.write_matrix("out.mat", "k", &[1.0, 2.0, 3.0, 4.0], 2, 2, false, "7");
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **mmap** (default): MAT-files are memory-mapped instead of read
//! - **serde** (default): serde derives for configuration and listings
//! - **cli** (default): the `tableio` command-line tool

pub use tableio_core::{
    // Values
    Table, ParsedNumber,
    // Format definitions
    ArrayClass, ByteOrder, ElementKind, ElementType, FileLevel, FormatVersion, Signature,
    // Algorithms
    column_major_to_row_major, is_number, parse_number, row_major_to_column_major, transpose,
    // Errors
    CoreError,
};

pub mod config;
pub mod container;
pub mod error;
pub mod facade;
pub mod line_reader;
pub mod mat_file;
mod persist;
pub mod report;
pub mod text_codec;

pub use config::TableConfig;
pub use container::VariableInfo;
pub use error::{Axis, ErrorKind, Result, TableIoError};
pub use facade::{is_container_file, TableIo};
pub use line_reader::LineReader;
pub use mat_file::{MatFile, MatWriter, Variable, VariableSummary};
pub use report::{CollectingReporter, Reporter, Severity, TracingReporter};
pub use text_codec::TextTableInfo;
