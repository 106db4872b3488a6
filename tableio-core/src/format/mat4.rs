//! Level 4 MAT-file records
//!
//! A level 4 file is a plain sequence of records. Each record starts with
//! five 32-bit integers `type, mrows, ncols, imagf, namlen`, followed by the
//! NUL-terminated name, the real part in column-major order and, when
//! `imagf` is set, the imaginary part.
//!
//! The type word encodes `M*1000 + O*100 + P*10 + T` where `M` is the
//! machine format, `O` is always zero, `P` the precision and `T` the matrix
//! type.

use super::class::ArrayClass;
use super::constants::MAX_MAT4_NAME_LENGTH;
use super::tag::{ByteOrder, ElementType};
use crate::{CoreError, Result};

/// Storage precision of a level 4 record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mat4Precision {
    Double = 0,
    Single = 1,
    Int32 = 2,
    Int16 = 3,
    UInt16 = 4,
    UInt8 = 5,
}

impl Mat4Precision {
    pub const fn from_digit(digit: i32) -> Option<Self> {
        match digit {
            0 => Some(Mat4Precision::Double),
            1 => Some(Mat4Precision::Single),
            2 => Some(Mat4Precision::Int32),
            3 => Some(Mat4Precision::Int16),
            4 => Some(Mat4Precision::UInt16),
            5 => Some(Mat4Precision::UInt8),
            _ => None,
        }
    }

    /// Precision able to store `element` values, if level 4 has one
    pub const fn from_element(element: ElementType) -> Option<Self> {
        match element {
            ElementType::Double => Some(Mat4Precision::Double),
            ElementType::Single => Some(Mat4Precision::Single),
            ElementType::Int32 => Some(Mat4Precision::Int32),
            ElementType::Int16 => Some(Mat4Precision::Int16),
            ElementType::UInt16 => Some(Mat4Precision::UInt16),
            ElementType::UInt8 => Some(Mat4Precision::UInt8),
            _ => None,
        }
    }

    pub const fn element_type(self) -> ElementType {
        match self {
            Mat4Precision::Double => ElementType::Double,
            Mat4Precision::Single => ElementType::Single,
            Mat4Precision::Int32 => ElementType::Int32,
            Mat4Precision::Int16 => ElementType::Int16,
            Mat4Precision::UInt16 => ElementType::UInt16,
            Mat4Precision::UInt8 => ElementType::UInt8,
        }
    }

    /// Level 4 files store everything as double-valued matrices; the
    /// precision only describes the on-disk encoding.
    pub const fn class(self) -> ArrayClass {
        ArrayClass::Double
    }
}

/// Matrix type digit of a level 4 record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mat4Kind {
    Numeric = 0,
    Text = 1,
    Sparse = 2,
}

impl Mat4Kind {
    pub const fn from_digit(digit: i32) -> Option<Self> {
        match digit {
            0 => Some(Mat4Kind::Numeric),
            1 => Some(Mat4Kind::Text),
            2 => Some(Mat4Kind::Sparse),
            _ => None,
        }
    }

    pub const fn class(self) -> ArrayClass {
        match self {
            Mat4Kind::Numeric => ArrayClass::Double,
            Mat4Kind::Text => ArrayClass::Char,
            Mat4Kind::Sparse => ArrayClass::Sparse,
        }
    }
}

/// Fixed part of a level 4 record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mat4Header {
    pub order: ByteOrder,
    pub precision: Mat4Precision,
    pub kind: Mat4Kind,
    pub rows: usize,
    pub cols: usize,
    pub complex: bool,
    /// Name length including the terminating NUL
    pub name_len: usize,
}

impl Mat4Header {
    /// Size of the fixed header in bytes
    pub const SIZE: usize = 20;

    /// Header of a real double matrix written in `order`
    pub fn numeric(order: ByteOrder, rows: usize, cols: usize, name: &str) -> Self {
        Self {
            order,
            precision: Mat4Precision::Double,
            kind: Mat4Kind::Numeric,
            rows,
            cols,
            complex: false,
            name_len: name.len() + 1,
        }
    }

    /// Parse a record header, detecting its byte order
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(CoreError::InsufficientBuffer);
        }
        Self::parse_with(bytes, ByteOrder::Little)
            .or_else(|_| Self::parse_with(bytes, ByteOrder::Big))
    }

    fn parse_with(bytes: &[u8], order: ByteOrder) -> Result<Self> {
        let type_word = order.read_i32(bytes)?;
        if !(0..10_000).contains(&type_word) {
            return Err(CoreError::InvalidHeader);
        }
        let machine = type_word / 1000;
        let reserved = (type_word / 100) % 10;
        let expected_machine = match order {
            ByteOrder::Little => 0,
            ByteOrder::Big => 1,
        };
        if machine != expected_machine || reserved != 0 {
            return Err(CoreError::InvalidHeader);
        }
        let precision =
            Mat4Precision::from_digit((type_word / 10) % 10).ok_or(CoreError::InvalidHeader)?;
        let kind = Mat4Kind::from_digit(type_word % 10).ok_or(CoreError::InvalidHeader)?;

        let rows = non_negative(order.read_i32(&bytes[4..])?)?;
        let cols = non_negative(order.read_i32(&bytes[8..])?)?;
        let complex = match order.read_i32(&bytes[12..])? {
            0 => false,
            1 => true,
            _ => return Err(CoreError::InvalidHeader),
        };
        let name_len = non_negative(order.read_i32(&bytes[16..])?)?;
        if name_len == 0 || name_len > MAX_MAT4_NAME_LENGTH {
            return Err(CoreError::InvalidHeader);
        }

        Ok(Self {
            order,
            precision,
            kind,
            rows,
            cols,
            complex,
            name_len,
        })
    }

    pub fn to_bytes(&self) -> Result<[u8; Self::SIZE]> {
        let machine = match self.order {
            ByteOrder::Little => 0,
            ByteOrder::Big => 1,
        };
        let type_word = machine * 1000 + (self.precision as i32) * 10 + self.kind as i32;
        let words = [
            type_word,
            to_i32(self.rows)?,
            to_i32(self.cols)?,
            i32::from(self.complex),
            to_i32(self.name_len)?,
        ];

        let mut bytes = [0u8; Self::SIZE];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&self.order.i32_bytes(word));
        }
        Ok(bytes)
    }

    /// Class the record is reported as
    pub const fn class(&self) -> ArrayClass {
        match self.kind {
            Mat4Kind::Numeric => self.precision.class(),
            other => other.class(),
        }
    }
}

fn non_negative(value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| CoreError::InvalidHeader)
}

fn to_i32(value: usize) -> Result<i32> {
    i32::try_from(value).map_err(|_| CoreError::DimensionOverflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_both_orders() {
        for order in [ByteOrder::Little, ByteOrder::Big] {
            let header = Mat4Header::numeric(order, 3, 2, "tab1");
            let bytes = header.to_bytes().unwrap();
            let parsed = Mat4Header::from_bytes(&bytes).unwrap();
            assert_eq!(parsed, header);
            assert_eq!(parsed.name_len, 5);
            assert_eq!(parsed.class(), ArrayClass::Double);
        }
    }

    #[test]
    fn test_type_word_layout() {
        let header = Mat4Header {
            precision: Mat4Precision::Int16,
            kind: Mat4Kind::Text,
            ..Mat4Header::numeric(ByteOrder::Big, 1, 1, "s")
        };
        let bytes = header.to_bytes().unwrap();
        assert_eq!(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 1031);
        let parsed = Mat4Header::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.class(), ArrayClass::Char);
        assert_eq!(parsed.precision.element_type(), ElementType::Int16);
    }

    #[test]
    fn test_precision_from_element() {
        assert_eq!(
            Mat4Precision::from_element(ElementType::Double),
            Some(Mat4Precision::Double)
        );
        assert_eq!(Mat4Precision::from_element(ElementType::Int64), None);
        assert_eq!(Mat4Precision::from_element(ElementType::Int8), None);
    }

    #[test]
    fn test_rejects_garbage() {
        let mut bytes = [0u8; 20];
        // precision digit 9 is undefined
        bytes[0..4].copy_from_slice(&90i32.to_le_bytes());
        bytes[16..20].copy_from_slice(&2i32.to_le_bytes());
        assert_eq!(Mat4Header::from_bytes(&bytes), Err(CoreError::InvalidHeader));

        // zero-length name
        let mut bytes = Mat4Header::numeric(ByteOrder::Little, 1, 1, "a")
            .to_bytes()
            .unwrap();
        bytes[16..20].copy_from_slice(&0i32.to_le_bytes());
        assert_eq!(Mat4Header::from_bytes(&bytes), Err(CoreError::InvalidHeader));

        assert_eq!(
            Mat4Header::from_bytes(&[0u8; 12]),
            Err(CoreError::InsufficientBuffer)
        );
    }
}
