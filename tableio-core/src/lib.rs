#![cfg_attr(not(test), no_std)]

//! tableio core - numeric table format definitions
//!
//! This crate holds everything about the on-disk formats that does not need
//! a file system: the text table grammar, locale-free number tokens, the
//! MAT-file wire layout and in-place transposition between column-major
//! and row-major buffers.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod format;
pub mod numeric;
#[cfg(feature = "alloc")]
pub mod table;
pub mod text;
pub mod traits;
pub mod transpose;
pub mod validation;

pub use error::*;
pub use format::*;
pub use numeric::{is_number, parse_number, ParsedNumber};
#[cfg(feature = "alloc")]
pub use table::Table;
pub use text::{ElementKind, Signature, TextTableHeader};
pub use traits::*;
pub use transpose::{column_major_to_row_major, row_major_to_column_major, transpose};
