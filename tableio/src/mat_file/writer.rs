//! Creating and rewriting MAT-files

use std::path::{Path, PathBuf};

use tableio_core::{ByteOrder, CoreError, FileLevel, FormatVersion, Mat5Header, StorageElement};

use super::{mat4, mat5, MatFile};
use crate::error::{Result, TableIoError};
use crate::persist::replace_file;

/// One top-level element, fully encoded
///
/// Elements copied from an existing file keep their bytes even when their
/// header is unreadable; those have no name and are never replaced.
struct Record {
    name: Option<String>,
    bytes: Vec<u8>,
}

/// Pending contents of a MAT-file
///
/// Nothing touches the disk until [`finish`](Self::finish), which replaces
/// the file atomically. Dropping an unfinished writer leaves the file as it
/// was.
pub struct MatWriter {
    path: PathBuf,
    level: FileLevel,
    order: ByteOrder,
    compress: bool,
    header: Option<Mat5Header>,
    records: Vec<Record>,
}

impl MatWriter {
    /// Start a new, empty file in the layout of `version`
    pub fn create<P: AsRef<Path>>(path: P, version: FormatVersion) -> Result<Self> {
        let path = path.as_ref();
        let create_error = || TableIoError::Create {
            file: path.display().to_string(),
        };
        if version.level() == FileLevel::Hdf5 {
            return Err(create_error());
        }
        let parent_ok = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.is_dir(),
            _ => true,
        };
        if !parent_ok || path.is_dir() {
            return Err(create_error());
        }

        let order = ByteOrder::native();
        let level = version.level();
        tracing::debug!(file = %path.display(), %version, "creating MAT-file");
        Ok(Self {
            path: path.to_path_buf(),
            level,
            order,
            compress: version == FormatVersion::V7,
            header: (level == FileLevel::Level5).then(|| Mat5Header::new(order)),
            records: Vec::new(),
        })
    }

    /// Start from the contents of an existing file
    ///
    /// The existing layout and byte order are kept. New level 5 elements
    /// are compressed when `version` is "7".
    pub fn open_append<P: AsRef<Path>>(path: P, version: FormatVersion) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.display().to_string();
        if version.level() == FileLevel::Hdf5 {
            return Err(TableIoError::Create { file: file_name });
        }
        let existing = MatFile::open(path).map_err(|e| {
            tracing::debug!(file = %file_name, error = %e, "cannot reopen MAT-file");
            TableIoError::Open {
                path: file_name.clone(),
                reason: None,
            }
        })?;

        let records = existing
            .raw_elements()
            .map(|(name, bytes)| Record {
                name: name.map(str::to_string),
                bytes: bytes.to_vec(),
            })
            .collect();
        let level = existing.level();
        tracing::debug!(file = %file_name, %level, %version, "appending to MAT-file");

        Ok(Self {
            path: path.to_path_buf(),
            level,
            order: existing.byte_order(),
            compress: level == FileLevel::Level5 && version == FormatVersion::V7,
            header: existing.header().copied(),
            records,
        })
    }

    pub fn level(&self) -> FileLevel {
        self.level
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    pub fn is_compressed(&self) -> bool {
        self.compress
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().filter_map(|r| r.name.as_deref())
    }

    /// Remove every variable called `name`; true if one existed
    pub fn delete_variable(&mut self, name: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.name.as_deref() != Some(name));
        before != self.records.len()
    }

    /// Add a real matrix given in column-major order
    pub fn write_matrix<T: StorageElement>(
        &mut self,
        name: &str,
        rows: usize,
        cols: usize,
        column_major: &[T],
    ) -> Result<()> {
        let encoded = match self.level {
            FileLevel::Level4 => mat4::encode_record(name, rows, cols, column_major, self.order),
            FileLevel::Level5 => mat5::encode_matrix(name, rows, cols, column_major, self.order),
            FileLevel::Hdf5 => Err(CoreError::UnsupportedFormat),
        }
        .map_err(|e| TableIoError::container(self.path.display().to_string(), e))?;

        let bytes = if self.compress {
            mat5::compress_element(&encoded, self.order)?
        } else {
            encoded
        };
        tracing::trace!(variable = name, rows, cols, bytes = bytes.len(), "encoded variable");
        self.records.push(Record {
            name: Some(name.to_string()),
            bytes,
        });
        Ok(())
    }

    /// Write everything to disk
    pub fn finish(self) -> Result<()> {
        let mut out = Vec::new();
        if let Some(header) = &self.header {
            out.extend_from_slice(&header.to_bytes());
        }
        for record in &self.records {
            out.extend_from_slice(&record.bytes);
        }
        replace_file(&self.path, &out)?;
        tracing::debug!(
            file = %self.path.display(),
            variables = self.records.len(),
            bytes = out.len(),
            "wrote MAT-file"
        );
        Ok(())
    }
}
