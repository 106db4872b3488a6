//! Write version tags

use crate::{CoreError, Result};

/// Container layout of a MAT-file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FileLevel {
    /// Level 4 record stream
    Level4,
    /// Level 5 tagged elements (versions 6 and 7)
    Level5,
    /// HDF5-based version 7.3
    Hdf5,
}

impl core::fmt::Display for FileLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            FileLevel::Level4 => "level 4",
            FileLevel::Level5 => "level 5",
            FileLevel::Hdf5 => "HDF5 (7.3)",
        };
        f.write_str(name)
    }
}

/// Version tag accepted when writing a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatVersion {
    /// "4": level 4, uncompressed
    V4,
    /// "6": level 5, uncompressed
    V6,
    /// "7": level 5, zlib compressed
    V7,
    /// "7.3": HDF5 based
    V73,
}

impl FormatVersion {
    /// Parse a version tag
    ///
    /// Only the exact strings "4", "6", "7" and "7.3" are accepted.
    pub fn parse(tag: &str) -> Result<Self> {
        match tag {
            "4" => Ok(FormatVersion::V4),
            "6" => Ok(FormatVersion::V6),
            "7" => Ok(FormatVersion::V7),
            "7.3" => Ok(FormatVersion::V73),
            _ => Err(CoreError::InvalidVersion),
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            FormatVersion::V4 => "4",
            FormatVersion::V6 => "6",
            FormatVersion::V7 => "7",
            FormatVersion::V73 => "7.3",
        }
    }

    pub const fn level(self) -> FileLevel {
        match self {
            FormatVersion::V4 => FileLevel::Level4,
            FormatVersion::V6 | FormatVersion::V7 => FileLevel::Level5,
            FormatVersion::V73 => FileLevel::Hdf5,
        }
    }

    pub const fn is_compressed(self) -> bool {
        matches!(self, FormatVersion::V7 | FormatVersion::V73)
    }
}

impl core::str::FromStr for FormatVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl core::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.tag())
    }
}
