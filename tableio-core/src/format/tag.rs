//! Byte order and level 5 data element tags

use super::constants::{ALIGNMENT_BOUNDARY, SMALL_ELEMENT_MAX, TAG_SIZE};
use crate::validation::align_to_boundary;
use crate::{CoreError, Result};

/// Byte order of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    /// Byte order of the running machine
    pub const fn native() -> Self {
        if cfg!(target_endian = "little") {
            ByteOrder::Little
        } else {
            ByteOrder::Big
        }
    }

    pub fn is_native(self) -> bool {
        self == Self::native()
    }

    pub fn read_u16(self, bytes: &[u8]) -> Result<u16> {
        let array: [u8; 2] = take(bytes)?;
        Ok(match self {
            ByteOrder::Little => u16::from_le_bytes(array),
            ByteOrder::Big => u16::from_be_bytes(array),
        })
    }

    pub fn read_u32(self, bytes: &[u8]) -> Result<u32> {
        let array: [u8; 4] = take(bytes)?;
        Ok(match self {
            ByteOrder::Little => u32::from_le_bytes(array),
            ByteOrder::Big => u32::from_be_bytes(array),
        })
    }

    pub fn read_i32(self, bytes: &[u8]) -> Result<i32> {
        let array: [u8; 4] = take(bytes)?;
        Ok(match self {
            ByteOrder::Little => i32::from_le_bytes(array),
            ByteOrder::Big => i32::from_be_bytes(array),
        })
    }

    pub fn u16_bytes(self, value: u16) -> [u8; 2] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn u32_bytes(self, value: u32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    pub fn i32_bytes(self, value: i32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }
}

fn take<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes
        .get(..N)
        .and_then(|head| head.try_into().ok())
        .ok_or(CoreError::InsufficientBuffer)
}

/// Level 5 data element types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ElementType {
    Int8 = 1,
    UInt8 = 2,
    Int16 = 3,
    UInt16 = 4,
    Int32 = 5,
    UInt32 = 6,
    Single = 7,
    Double = 9,
    Int64 = 12,
    UInt64 = 13,
    Matrix = 14,
    Compressed = 15,
    Utf8 = 16,
    Utf16 = 17,
    Utf32 = 18,
}

impl ElementType {
    /// Convert from the raw tag value
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(ElementType::Int8),
            2 => Some(ElementType::UInt8),
            3 => Some(ElementType::Int16),
            4 => Some(ElementType::UInt16),
            5 => Some(ElementType::Int32),
            6 => Some(ElementType::UInt32),
            7 => Some(ElementType::Single),
            9 => Some(ElementType::Double),
            12 => Some(ElementType::Int64),
            13 => Some(ElementType::UInt64),
            14 => Some(ElementType::Matrix),
            15 => Some(ElementType::Compressed),
            16 => Some(ElementType::Utf8),
            17 => Some(ElementType::Utf16),
            18 => Some(ElementType::Utf32),
            _ => None,
        }
    }

    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    /// Size of one element for numeric types
    pub const fn size_bytes(self) -> Option<usize> {
        match self {
            ElementType::Int8 | ElementType::UInt8 | ElementType::Utf8 => Some(1),
            ElementType::Int16 | ElementType::UInt16 | ElementType::Utf16 => Some(2),
            ElementType::Int32 | ElementType::UInt32 | ElementType::Single | ElementType::Utf32 => {
                Some(4)
            }
            ElementType::Double | ElementType::Int64 | ElementType::UInt64 => Some(8),
            ElementType::Matrix | ElementType::Compressed => None,
        }
    }

    /// Whether values of this type can be widened to `f64`
    pub const fn is_numeric(self) -> bool {
        !matches!(
            self,
            ElementType::Matrix
                | ElementType::Compressed
                | ElementType::Utf8
                | ElementType::Utf16
                | ElementType::Utf32
        )
    }
}

impl core::fmt::Display for ElementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            ElementType::Int8 => "miINT8",
            ElementType::UInt8 => "miUINT8",
            ElementType::Int16 => "miINT16",
            ElementType::UInt16 => "miUINT16",
            ElementType::Int32 => "miINT32",
            ElementType::UInt32 => "miUINT32",
            ElementType::Single => "miSINGLE",
            ElementType::Double => "miDOUBLE",
            ElementType::Int64 => "miINT64",
            ElementType::UInt64 => "miUINT64",
            ElementType::Matrix => "miMATRIX",
            ElementType::Compressed => "miCOMPRESSED",
            ElementType::Utf8 => "miUTF8",
            ElementType::Utf16 => "miUTF16",
            ElementType::Utf32 => "miUTF32",
        };
        f.write_str(name)
    }
}

/// Tag in front of every level 5 data element
///
/// Regular tags are 8 bytes (type, byte count) followed by the data padded
/// to 8 bytes. Small elements of at most 4 bytes pack the count into the
/// upper half of the first word and the data into the second word.
/// Compressed elements are not padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTag {
    /// Raw element type value
    pub element: u32,
    /// Payload size in bytes
    pub size: usize,
    /// Small element format
    pub small: bool,
}

impl DataTag {
    pub const fn new(element: ElementType, size: usize) -> Self {
        Self {
            element: element as u32,
            size,
            small: false,
        }
    }

    /// Parse a tag from the start of `bytes`
    pub fn from_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self> {
        let first = order.read_u32(bytes)?;
        if first >> 16 != 0 {
            let size = (first >> 16) as usize;
            if size > SMALL_ELEMENT_MAX {
                return Err(CoreError::CorruptedData);
            }
            if bytes.len() < TAG_SIZE {
                return Err(CoreError::InsufficientBuffer);
            }
            return Ok(Self {
                element: first & 0xFFFF,
                size,
                small: true,
            });
        }

        let size = order.read_u32(bytes.get(4..).ok_or(CoreError::InsufficientBuffer)?)?;
        Ok(Self {
            element: first,
            size: size as usize,
            small: false,
        })
    }

    pub fn element_type(&self) -> Option<ElementType> {
        ElementType::from_u32(self.element)
    }

    /// Offset of the payload from the start of the tag
    pub const fn data_offset(&self) -> usize {
        if self.small {
            4
        } else {
            TAG_SIZE
        }
    }

    /// Bytes occupied by tag, payload and padding
    pub fn total_len(&self) -> Result<usize> {
        if self.small {
            return Ok(TAG_SIZE);
        }
        let payload = if self.element == ElementType::Compressed as u32 {
            self.size
        } else {
            align_to_boundary(self.size, ALIGNMENT_BOUNDARY).ok_or(CoreError::DimensionOverflow)?
        };
        payload.checked_add(TAG_SIZE).ok_or(CoreError::DimensionOverflow)
    }

    /// Encode a regular (non-small) tag
    pub fn to_bytes(&self, order: ByteOrder) -> Result<[u8; TAG_SIZE]> {
        let size = u32::try_from(self.size).map_err(|_| CoreError::DimensionOverflow)?;
        let mut bytes = [0u8; TAG_SIZE];
        bytes[0..4].copy_from_slice(&order.u32_bytes(self.element));
        bytes[4..8].copy_from_slice(&order.u32_bytes(size));
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_tag_round_trip() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let tag = DataTag::new(ElementType::Double, 24);
            let bytes = tag.to_bytes(order).unwrap();
            let parsed = DataTag::from_bytes(&bytes, order).unwrap();
            assert_eq!(parsed, tag);
            assert_eq!(parsed.total_len(), Ok(32));
            assert_eq!(parsed.data_offset(), 8);
        }
    }

    #[test]
    fn test_padding_and_compressed_length() {
        assert_eq!(DataTag::new(ElementType::Int8, 5).total_len(), Ok(16));
        assert_eq!(DataTag::new(ElementType::Int8, 0).total_len(), Ok(8));
        assert_eq!(DataTag::new(ElementType::Compressed, 5).total_len(), Ok(13));
    }

    #[test]
    fn test_small_element() {
        // miINT8 with 3 bytes "abc" packed into the tag
        let mut bytes = [0u8; 8];
        bytes[0..4].copy_from_slice(&(3u32 << 16 | 1).to_le_bytes());
        bytes[4..7].copy_from_slice(b"abc");
        let tag = DataTag::from_bytes(&bytes, ByteOrder::Little).unwrap();
        assert!(tag.small);
        assert_eq!(tag.element_type(), Some(ElementType::Int8));
        assert_eq!(tag.size, 3);
        assert_eq!(tag.data_offset(), 4);
        assert_eq!(tag.total_len(), Ok(8));
    }

    #[test]
    fn test_small_element_too_large() {
        let bytes = (9u32 << 16 | 1).to_le_bytes();
        let mut padded = [0u8; 8];
        padded[..4].copy_from_slice(&bytes);
        assert_eq!(
            DataTag::from_bytes(&padded, ByteOrder::Little),
            Err(CoreError::CorruptedData)
        );
    }

    #[test]
    fn test_truncated_tag() {
        assert_eq!(
            DataTag::from_bytes(&[14, 0, 0, 0, 8], ByteOrder::Little),
            Err(CoreError::InsufficientBuffer)
        );
    }

    #[test]
    fn test_byte_order_reads() {
        let bytes = [0x01, 0x02, 0x03, 0x04];
        assert_eq!(ByteOrder::Little.read_u32(&bytes), Ok(0x0403_0201));
        assert_eq!(ByteOrder::Big.read_u32(&bytes), Ok(0x0102_0304));
        assert_eq!(ByteOrder::Big.read_u16(&bytes), Ok(0x0102));
        assert_eq!(
            ByteOrder::Little.read_u32(&bytes[..3]),
            Err(CoreError::InsufficientBuffer)
        );
    }
}
