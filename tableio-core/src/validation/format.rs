//! Layout arithmetic for aligned data elements

/// Align an offset up to a power-of-two boundary
///
/// Returns `None` when the aligned offset does not fit in `usize`.
pub const fn align_to_boundary(offset: usize, boundary: usize) -> Option<usize> {
    match offset.checked_add(boundary - 1) {
        Some(end) => Some(end & !(boundary - 1)),
        None => None,
    }
}

/// Bytes of padding after `len` payload bytes to reach the boundary
pub const fn calculate_padding(len: usize, boundary: usize) -> usize {
    let rem = len % boundary;
    if rem == 0 {
        0
    } else {
        boundary - rem
    }
}
