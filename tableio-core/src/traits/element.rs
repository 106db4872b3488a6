//! Numeric element types a matrix can be stored as
//!
//! Every numeric MATLAB class maps to one Rust primitive. Reading widens
//! the stored values to `f64`.

use crate::format::{ArrayClass, ByteOrder, ElementType};
use crate::{CoreError, Result};

/// Trait for primitives that can appear as matrix payload
///
/// `bytemuck::Pod` lets writers cast native slices straight to bytes.
pub trait StorageElement: bytemuck::Pod + PartialEq {
    /// Element type tag of the payload
    const ELEMENT: ElementType;

    /// Array class the element belongs to
    const CLASS: ArrayClass;

    /// Size of one value in bytes
    fn size_bytes() -> usize {
        core::mem::size_of::<Self>()
    }

    /// Decode one value from exactly `size_bytes()` bytes
    fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self;

    fn to_f64(self) -> f64;

    /// Reverse the byte order of a value
    fn swap_bytes(self) -> Self;
}

macro_rules! impl_storage_element {
    ($ty:ty, $element:ident, $class:ident, |$v:ident| $swap:expr) => {
        impl StorageElement for $ty {
            const ELEMENT: ElementType = ElementType::$element;
            const CLASS: ArrayClass = ArrayClass::$class;

            fn from_bytes(bytes: &[u8], order: ByteOrder) -> Self {
                let mut raw = [0u8; core::mem::size_of::<$ty>()];
                raw.copy_from_slice(&bytes[..core::mem::size_of::<$ty>()]);
                match order {
                    ByteOrder::Little => <$ty>::from_le_bytes(raw),
                    ByteOrder::Big => <$ty>::from_be_bytes(raw),
                }
            }

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn swap_bytes(self) -> Self {
                let $v = self;
                $swap
            }
        }
    };
}

impl_storage_element!(i8, Int8, Int8, |v| v);
impl_storage_element!(u8, UInt8, UInt8, |v| v);
impl_storage_element!(i16, Int16, Int16, |v| v.swap_bytes());
impl_storage_element!(u16, UInt16, UInt16, |v| v.swap_bytes());
impl_storage_element!(i32, Int32, Int32, |v| v.swap_bytes());
impl_storage_element!(u32, UInt32, UInt32, |v| v.swap_bytes());
impl_storage_element!(i64, Int64, Int64, |v| v.swap_bytes());
impl_storage_element!(u64, UInt64, UInt64, |v| v.swap_bytes());
impl_storage_element!(f32, Single, Single, |v| f32::from_bits(v.to_bits().swap_bytes()));
impl_storage_element!(f64, Double, Double, |v| f64::from_bits(v.to_bits().swap_bytes()));

fn widen_as<T: StorageElement>(bytes: &[u8], order: ByteOrder, out: &mut [f64]) {
    for (slot, chunk) in out.iter_mut().zip(bytes.chunks_exact(T::size_bytes())) {
        *slot = T::from_bytes(chunk, order).to_f64();
    }
}

/// Widen a stored payload of `element` values into `out`
///
/// `bytes` must hold exactly `out.len()` values.
pub fn widen_into(element: ElementType, bytes: &[u8], order: ByteOrder, out: &mut [f64]) -> Result<()> {
    let size = element.size_bytes().ok_or(CoreError::UnsupportedFormat)?;
    if !element.is_numeric() {
        return Err(CoreError::UnsupportedFormat);
    }
    crate::validation::validate_payload_len(bytes.len(), out.len(), size)?;

    match element {
        ElementType::Int8 => widen_as::<i8>(bytes, order, out),
        ElementType::UInt8 => widen_as::<u8>(bytes, order, out),
        ElementType::Int16 => widen_as::<i16>(bytes, order, out),
        ElementType::UInt16 => widen_as::<u16>(bytes, order, out),
        ElementType::Int32 => widen_as::<i32>(bytes, order, out),
        ElementType::UInt32 => widen_as::<u32>(bytes, order, out),
        ElementType::Int64 => widen_as::<i64>(bytes, order, out),
        ElementType::UInt64 => widen_as::<u64>(bytes, order, out),
        ElementType::Single => widen_as::<f32>(bytes, order, out),
        ElementType::Double => widen_as::<f64>(bytes, order, out),
        _ => return Err(CoreError::UnsupportedFormat),
    }
    Ok(())
}
