//! Error types for table format operations

/// Errors that can occur while interpreting table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid file or record header
    InvalidHeader,
    /// Unsupported file format or variable encoding
    UnsupportedFormat,
    /// Buffer ended before a complete structure could be read
    InsufficientBuffer,
    /// Structure sizes or counts are inconsistent
    CorruptedData,
    /// Element count or byte size does not fit in `usize`
    DimensionOverflow,
    /// Buffer length does not match the stated dimensions
    LengthMismatch,
    /// Unrecognised write version tag
    InvalidVersion,
}

impl core::fmt::Display for CoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            CoreError::InvalidHeader => "Invalid header",
            CoreError::UnsupportedFormat => "Unsupported format",
            CoreError::InsufficientBuffer => "Unexpected end of data",
            CoreError::CorruptedData => "Data corruption detected",
            CoreError::DimensionOverflow => "Dimensions too large",
            CoreError::LengthMismatch => "Buffer length does not match dimensions",
            CoreError::InvalidVersion => "Invalid version",
        };
        write!(f, "{msg}")
    }
}

/// Result type for core format operations
pub type Result<T> = core::result::Result<T, CoreError>;
