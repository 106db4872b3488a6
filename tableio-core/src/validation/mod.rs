//! Size and layout validation
//!
//! Pure arithmetic on declared dimensions and element layouts, with no I/O.

pub mod bounds;
pub mod format;

pub use bounds::{checked_byte_size, checked_element_count, validate_payload_len};
pub use format::{align_to_boundary, calculate_padding};
