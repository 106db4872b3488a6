//! Format constants for MAT-file layouts

/// Alignment boundary of level 5 data elements
pub const ALIGNMENT_BOUNDARY: usize = 8;

/// Size of a level 5 data element tag
pub const TAG_SIZE: usize = 8;

/// Largest payload a small data element can hold
pub const SMALL_ELEMENT_MAX: usize = 4;

/// Field name slot width written for struct variables
pub const DEFAULT_FIELD_NAME_LENGTH: usize = 32;

/// Upper bound for level 4 name lengths; larger values mean a corrupt file
pub const MAX_MAT4_NAME_LENGTH: usize = 4096;

/// Descriptive text written at the start of level 5 files
pub const HEADER_TEXT: &str = "MATLAB 5.0 MAT-file, written by tableio";

/// Array flag bits (second byte of the flags word)
pub mod flags {
    pub const COMPLEX: u32 = 0x0800;
    pub const GLOBAL: u32 = 0x0400;
    pub const LOGICAL: u32 = 0x0200;
    pub const CLASS_MASK: u32 = 0x00FF;
}
