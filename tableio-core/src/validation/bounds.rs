//! Overflow-checked size arithmetic for declared dimensions

use crate::{CoreError, Result};

/// Number of elements described by a dimension list
///
/// An empty list describes no elements.
pub fn checked_element_count(dims: &[usize]) -> Result<usize> {
    if dims.is_empty() {
        return Ok(0);
    }
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or(CoreError::DimensionOverflow)
}

/// Byte size of `count` elements of `element_size` bytes
pub const fn checked_byte_size(count: usize, element_size: usize) -> Result<usize> {
    match count.checked_mul(element_size) {
        Some(size) => Ok(size),
        None => Err(CoreError::DimensionOverflow),
    }
}

/// Check that a payload holds exactly `count` elements
pub const fn validate_payload_len(byte_len: usize, count: usize, element_size: usize) -> Result<()> {
    match checked_byte_size(count, element_size) {
        Ok(expected) if expected == byte_len => Ok(()),
        Ok(_) => Err(CoreError::CorruptedData),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_count() {
        assert_eq!(checked_element_count(&[3, 4]), Ok(12));
        assert_eq!(checked_element_count(&[3, 0]), Ok(0));
        assert_eq!(checked_element_count(&[]), Ok(0));
        assert_eq!(
            checked_element_count(&[usize::MAX, 2]),
            Err(CoreError::DimensionOverflow)
        );
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(validate_payload_len(48, 6, 8), Ok(()));
        assert_eq!(validate_payload_len(47, 6, 8), Err(CoreError::CorruptedData));
        assert_eq!(
            validate_payload_len(0, usize::MAX, 8),
            Err(CoreError::DimensionOverflow)
        );
    }
}
