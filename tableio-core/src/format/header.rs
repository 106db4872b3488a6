//! Level 5 MAT-file header
//!
//! ```text
//! [0..116)    descriptive text, space padded
//! [116..124)  subsystem data offset
//! [124..126)  version
//! [126..128)  endian indicator "IM" (little) or "MI" (big)
//! ```

use super::constants::HEADER_TEXT;
use super::tag::ByteOrder;
use crate::{CoreError, Result};

const TEXT_LEN: usize = 116;

/// Header at the start of every level 5 (and 7.3) MAT-file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mat5Header {
    pub text: [u8; TEXT_LEN],
    pub subsys_offset: [u8; 8],
    pub version: u16,
    pub order: ByteOrder,
}

impl Mat5Header {
    /// Size of the header in bytes
    pub const SIZE: usize = 128;

    /// Version word of level 5 files
    pub const VERSION_5: u16 = 0x0100;

    /// Version word of HDF5-based 7.3 files
    pub const VERSION_73: u16 = 0x0200;

    /// Header for a new file in the given byte order
    pub fn new(order: ByteOrder) -> Self {
        let mut text = [b' '; TEXT_LEN];
        let description = HEADER_TEXT.as_bytes();
        text[..description.len()].copy_from_slice(description);
        Self {
            text,
            subsys_offset: [0; 8],
            version: Self::VERSION_5,
            order,
        }
    }

    /// Parse a header from the first 128 bytes of a file
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CoreError::InsufficientBuffer);
        }
        let order = match &bytes[126..128] {
            b"IM" => ByteOrder::Little,
            b"MI" => ByteOrder::Big,
            _ => return Err(CoreError::InvalidHeader),
        };

        let mut text = [0u8; TEXT_LEN];
        text.copy_from_slice(&bytes[..TEXT_LEN]);
        let mut subsys_offset = [0u8; 8];
        subsys_offset.copy_from_slice(&bytes[TEXT_LEN..124]);

        Ok(Self {
            text,
            subsys_offset,
            version: order.read_u16(&bytes[124..126])?,
            order,
        })
    }

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[..TEXT_LEN].copy_from_slice(&self.text);
        bytes[TEXT_LEN..124].copy_from_slice(&self.subsys_offset);
        bytes[124..126].copy_from_slice(&self.order.u16_bytes(self.version));
        // 'M' << 8 | 'I' written in file order reads back as "IM" or "MI"
        bytes[126..128].copy_from_slice(&self.order.u16_bytes(0x4D49));
        bytes
    }

    /// Whether the header announces an HDF5-based 7.3 file
    pub fn is_hdf5(&self) -> bool {
        self.version == Self::VERSION_73
    }

    /// Descriptive text without trailing padding
    pub fn description(&self) -> &[u8] {
        let end = self
            .text
            .iter()
            .rposition(|&b| b != b' ' && b != 0)
            .map_or(0, |p| p + 1);
        &self.text[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let header = Mat5Header::new(order);
            let bytes = header.to_bytes();
            assert_eq!(bytes.len(), Mat5Header::SIZE);
            let parsed = Mat5Header::from_bytes(&bytes).unwrap();
            assert_eq!(parsed, header);
            assert_eq!(parsed.version, Mat5Header::VERSION_5);
            assert!(!parsed.is_hdf5());
            assert_eq!(parsed.description(), HEADER_TEXT.as_bytes());
        }
    }

    #[test]
    fn test_endian_indicator() {
        assert_eq!(&Mat5Header::new(ByteOrder::Little).to_bytes()[126..], b"IM");
        assert_eq!(&Mat5Header::new(ByteOrder::Big).to_bytes()[126..], b"MI");
        assert_eq!(
            &Mat5Header::new(ByteOrder::Little).to_bytes()[124..126],
            &[0x00, 0x01]
        );
    }

    #[test]
    fn test_rejects_bad_indicator() {
        let mut bytes = Mat5Header::new(ByteOrder::Little).to_bytes();
        bytes[126] = b'X';
        assert_eq!(Mat5Header::from_bytes(&bytes), Err(CoreError::InvalidHeader));
        assert_eq!(
            Mat5Header::from_bytes(&bytes[..100]),
            Err(CoreError::InsufficientBuffer)
        );
    }

    #[test]
    fn test_detects_hdf5_version() {
        let mut header = Mat5Header::new(ByteOrder::Little);
        header.version = Mat5Header::VERSION_73;
        let parsed = Mat5Header::from_bytes(&header.to_bytes()).unwrap();
        assert!(parsed.is_hdf5());
    }
}
