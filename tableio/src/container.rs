//! Real matrices stored in MAT-files
//!
//! A matrix is addressed by a dotted path: the first segment names a
//! top-level variable and every further segment a field of a 1x1 struct,
//! e.g. `"params.gain.table"`. Empty segments are ignored.

use std::path::Path;

use tableio_core::{row_major_to_column_major, FormatVersion, Table};

use crate::config::TableConfig;
use crate::error::{Axis, Result, TableIoError};
use crate::mat_file::{MatFile, MatWriter, Variable};

/// Summary of one top-level variable
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableInfo {
    pub name: String,
    pub class: String,
    pub dims: Vec<usize>,
    pub complex: bool,
    /// Numeric array flagged as boolean
    pub logical: bool,
    /// Struct field names, empty for other classes
    pub fields: Vec<String>,
}

/// Split a dotted path, dropping empty segments
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('.').filter(|s| !s.is_empty())
}

/// Shorten a name for a "not found" diagnostic
///
/// Names longer than `limit - 1` characters are cut to that length and
/// marked with `...`.
pub fn display_name(name: &str, limit: usize) -> String {
    let keep = limit.saturating_sub(1);
    if name.chars().count() > keep {
        let mut short: String = name.chars().take(keep).collect();
        short.push_str("...");
        short
    } else {
        name.to_string()
    }
}

/// Find the real numeric rank-2 matrix at `path`
pub fn resolve<'a>(file: &'a MatFile, path: &str, config: &TableConfig) -> Result<&'a Variable> {
    let file_name = file.path().display().to_string();
    let not_found = |name: String| TableIoError::VariableNotFound {
        name,
        file: file_name.clone(),
    };

    let mut segments = path_segments(path);
    let variable = match segments.next() {
        Some(first) => file
            .variable(first)?
            .ok_or_else(|| not_found(display_name(first, config.name_display_limit)))?,
        None => file
            .variable(path)?
            .ok_or_else(|| not_found(path.to_string()))?,
    };

    let mut variable = variable;
    for segment in segments {
        let is_scalar_struct = variable.is_struct() && variable.dims() == [1, 1];
        variable = is_scalar_struct
            .then(|| variable.field(segment, 0))
            .flatten()
            .ok_or_else(|| not_found(path.to_string()))?;
    }

    if variable.rank() != 2 {
        return Err(TableIoError::WrongRank {
            name: path.to_string(),
            rank: variable.rank(),
        });
    }
    if !variable.class().is_some_and(|c| c.is_numeric()) {
        return Err(TableIoError::UnsupportedClass {
            name: path.to_string(),
            class: variable.class_name(),
        });
    }
    if variable.is_complex() {
        return Err(TableIoError::Complex {
            name: path.to_string(),
        });
    }
    tracing::trace!(file = %file_name, variable = path, dims = ?variable.dims(), "resolved matrix");
    Ok(variable)
}

/// Dimensions of the matrix at `name`
pub fn matrix_sizes(path: &Path, name: &str, config: &TableConfig) -> Result<(usize, usize)> {
    let file = MatFile::open(path)?;
    let variable = resolve(&file, name, config)?;
    Ok(dims2(variable))
}

/// Read the matrix at `name`, which must be `rows x cols`
pub fn read_matrix(
    path: &Path,
    name: &str,
    rows: usize,
    cols: usize,
    config: &TableConfig,
) -> Result<Table> {
    let file = MatFile::open(path)?;
    let variable = resolve(&file, name, config)?;
    let (actual_rows, actual_cols) = dims2(variable);

    for (axis, requested, actual) in [
        (Axis::Rows, rows, actual_rows),
        (Axis::Columns, cols, actual_cols),
    ] {
        if requested != actual {
            return Err(TableIoError::DimensionMismatch {
                axis,
                requested,
                name: name.to_string(),
                rows: actual_rows,
                cols: actual_cols,
                file: path.display().to_string(),
            });
        }
    }
    read_resolved(&file, variable, name)
}

/// Read the matrix at `name` with whatever size it has
pub fn read_mat_table(path: &Path, name: &str, config: &TableConfig) -> Result<Table> {
    let file = MatFile::open(path)?;
    let variable = resolve(&file, name, config)?;
    read_resolved(&file, variable, name)
}

fn dims2(variable: &Variable) -> (usize, usize) {
    match variable.dims() {
        [rows, cols] => (*rows, *cols),
        _ => (0, 0),
    }
}

fn read_resolved(file: &MatFile, variable: &Variable, name: &str) -> Result<Table> {
    let (rows, cols) = dims2(variable);
    let file_name = file.path().display().to_string();
    if variable.is_empty() {
        return Err(TableIoError::EmptyMatrix {
            name: name.to_string(),
            rows,
            cols,
            file: file_name,
        });
    }

    let read_error = || TableIoError::ReadData {
        name: name.to_string(),
        rows,
        cols,
        file: file_name.clone(),
    };
    let data = file.read_real(variable).map_err(|e| match e {
        TableIoError::Allocation => e,
        other => {
            tracing::debug!(error = %other, "reading matrix data failed");
            read_error()
        }
    })?;
    Table::from_column_major(rows, cols, data).map_err(|_| read_error())
}

/// Store a row-major `rows x cols` matrix as a double variable
///
/// With `append` the variable replaces any variable of the same name in
/// the existing file; otherwise a new file is created. `version` is one of
/// "4", "6", "7" or "7.3".
pub fn write_matrix(
    path: &Path,
    name: &str,
    data: &[f64],
    rows: usize,
    cols: usize,
    append: bool,
    version: &str,
) -> Result<()> {
    let file_name = path.display().to_string();
    let version = FormatVersion::parse(version).map_err(|_| TableIoError::InvalidVersion {
        version: version.to_string(),
        file: file_name.clone(),
    })?;
    if rows.checked_mul(cols) != Some(data.len()) {
        return Err(TableIoError::DataLength {
            name: name.to_string(),
            len: data.len(),
            rows,
            cols,
        });
    }

    let mut writer = if append {
        let mut writer = MatWriter::open_append(path, version)?;
        if writer.delete_variable(name) {
            tracing::debug!(file = %file_name, variable = name, "replacing existing variable");
        }
        writer
    } else {
        MatWriter::create(path, version)?
    };

    let mut column_major = Vec::new();
    column_major
        .try_reserve_exact(data.len())
        .map_err(|_| TableIoError::Allocation)?;
    column_major.extend_from_slice(data);
    row_major_to_column_major(&mut column_major, rows, cols)
        .map_err(|e| TableIoError::container(&file_name, e))?;

    let write_error = |e: TableIoError| {
        let source = match e {
            TableIoError::Io(io) => Some(io),
            other => {
                tracing::debug!(error = %other, "writing variable failed");
                None
            }
        };
        TableIoError::Write {
            name: name.to_string(),
            file: file_name.clone(),
            source,
        }
    };
    writer
        .write_matrix(name, rows, cols, &column_major)
        .map_err(write_error)?;
    writer.finish().map_err(write_error)?;
    tracing::debug!(file = %file_name, variable = name, rows, cols, %version, "wrote matrix");
    Ok(())
}

/// All readable top-level variables of a MAT-file
///
/// Only struct variables are decoded, to name their fields; one that fails
/// to decode is listed without fields.
pub fn list_variables(path: &Path) -> Result<Vec<VariableInfo>> {
    let file = MatFile::open(path)?;
    Ok(file
        .summaries()
        .enumerate()
        .map(|(pos, v)| {
            let fields = if v.is_struct() {
                match file.decode(pos) {
                    Ok(variable) => variable.field_names().to_vec(),
                    Err(error) => {
                        tracing::debug!(variable = v.name(), %error, "cannot list struct fields");
                        Vec::new()
                    }
                }
            } else {
                Vec::new()
            };
            VariableInfo {
                name: v.name().to_string(),
                class: v.class_name(),
                dims: v.dims().to_vec(),
                complex: v.is_complex(),
                logical: v.is_logical(),
                fields,
            }
        })
        .collect())
}
