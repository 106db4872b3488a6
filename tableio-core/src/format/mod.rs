//! MAT-file wire format definitions
//!
//! Pure data structure definitions for level 4 and level 5 MAT-files.
//! No I/O happens here; the `tableio` crate drives these over files.

pub mod class;
pub mod constants;
pub mod header;
pub mod mat4;
pub mod tag;
pub mod version;

pub use class::{ArrayClass, ArrayFlags};
pub use header::Mat5Header;
pub use mat4::{Mat4Header, Mat4Kind, Mat4Precision};
pub use tag::{ByteOrder, DataTag, ElementType};
pub use version::{FileLevel, FormatVersion};
