//! In-place conversion between column-major and row-major layouts
//!
//! Uses the cycle-following algorithm for non-square matrices: every linear
//! index belongs to exactly one permutation cycle, and each cycle is rotated
//! once, starting from its smallest index. No second buffer is allocated.

use crate::{CoreError, Result};

/// Transpose a buffer in place
///
/// Interprets `data` as a column-major `n_row x n_col` matrix and rewrites it
/// as the row-major `n_row x n_col` matrix. Because a row-major `m x n`
/// buffer is the column-major `n x m` buffer, calling this twice with the
/// dimensions swapped restores the original contents.
pub fn transpose<T: Copy>(data: &mut [T], n_row: usize, n_col: usize) -> Result<()> {
    let len = n_row.checked_mul(n_col).ok_or(CoreError::DimensionOverflow)?;
    if data.len() != len {
        return Err(CoreError::LengthMismatch);
    }
    if len < 3 {
        return Ok(());
    }

    let predecessor = |x: usize| n_row * (x % n_col) + x / n_col;

    for i in 1..len - 1 {
        let mut x = predecessor(i);
        // Cycle of length one, or its smallest index was handled already
        if x <= i {
            continue;
        }
        while x > i {
            x = predecessor(x);
        }
        if x < i {
            continue;
        }

        let tmp = data[i];
        let mut s = i;
        x = predecessor(i);
        while x != i {
            data[s] = data[x];
            s = x;
            x = predecessor(x);
        }
        data[s] = tmp;
    }
    Ok(())
}

/// Convert a column-major `rows x cols` buffer to row-major order
pub fn column_major_to_row_major<T: Copy>(data: &mut [T], rows: usize, cols: usize) -> Result<()> {
    transpose(data, rows, cols)
}

/// Convert a row-major `rows x cols` buffer to column-major order
pub fn row_major_to_column_major<T: Copy>(data: &mut [T], rows: usize, cols: usize) -> Result<()> {
    transpose(data, cols, rows)
}
