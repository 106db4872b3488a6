//! Row-major numeric table value

use alloc::vec::Vec;

use crate::transpose::{column_major_to_row_major, row_major_to_column_major};
use crate::{CoreError, Result};

/// A 2-D numeric table stored row-major
///
/// A decoded table always has at least one row and one column. The only
/// table with a zero dimension is [`Table::absent`], which stands for "no
/// data".
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawTable"))]
pub struct Table {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

/// Deserialized fields, checked by [`Table::new`] before use
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawTable {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTable> for Table {
    type Error = CoreError;

    fn try_from(raw: RawTable) -> Result<Self> {
        if raw.rows == 0 && raw.cols == 0 && raw.data.is_empty() {
            return Ok(Self::absent());
        }
        Self::new(raw.rows, raw.cols, raw.data)
    }
}

impl Table {
    /// Build a table from row-major data
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(CoreError::InvalidHeader);
        }
        let len = rows.checked_mul(cols).ok_or(CoreError::DimensionOverflow)?;
        if data.len() != len {
            return Err(CoreError::LengthMismatch);
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a table from column-major data, converting it in place
    pub fn from_column_major(rows: usize, cols: usize, mut data: Vec<f64>) -> Result<Self> {
        column_major_to_row_major(&mut data, rows, cols)?;
        Self::new(rows, cols, data)
    }

    /// The explicit "no table" value: zero rows, zero columns, no data
    pub const fn absent() -> Self {
        Self {
            rows: 0,
            cols: 0,
            data: Vec::new(),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Dimensions as (rows, cols)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Row-major values
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn into_data(self) -> Vec<f64> {
        self.data
    }

    /// Element at (row, col), `None` when out of range
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            self.data.get(row * self.cols + col).copied()
        } else {
            None
        }
    }

    /// One row as a slice
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            let start = row * self.cols;
            self.data.get(start..start + self.cols)
        } else {
            None
        }
    }

    /// Iterate over rows as slices
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on zero, which only the absent table has
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Copy of the values in column-major order
    pub fn to_column_major(&self) -> Result<Vec<f64>> {
        let mut out = self.data.clone();
        row_major_to_column_major(&mut out, self.rows, self.cols)?;
        Ok(out)
    }
}
