//! MAT-file container access
//!
//! [`MatFile`] opens level 4 and level 5 files (memory-mapped with the
//! `mmap` feature). Opening reads only the header of each variable; a
//! variable is decoded the first time it is requested and numeric parts are
//! widened to `f64` on request, so a damaged variable only fails the reads
//! that reach it.
//! [`MatWriter`] builds a new file or rewrites an existing one.

mod bytes;
mod mat4;
mod mat5;
mod variable;
mod writer;

use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use hashbrown::HashMap;
use tableio_core::{widen_into, ByteOrder, CoreError, FileLevel, Mat5Header};

use crate::error::{Result, TableIoError};
use bytes::FileBytes;
pub use variable::{Content, Payload, Variable, VariableSummary};
use variable::PayloadSource;
pub use writer::MatWriter;

/// A top-level variable and its decoded form once requested
struct Entry {
    summary: VariableSummary,
    body: Range<usize>,
    compressed: bool,
    decoded: OnceLock<std::result::Result<Variable, CoreError>>,
}

/// What indexing a file found
struct Layout {
    level: FileLevel,
    order: ByteOrder,
    header: Option<Mat5Header>,
    entries: Vec<Entry>,
    /// Every top-level element, with the entry it defines if readable
    spans: Vec<(Option<usize>, Range<usize>)>,
}

/// An opened MAT-file
pub struct MatFile {
    path: PathBuf,
    bytes: FileBytes,
    level: FileLevel,
    order: ByteOrder,
    header: Option<Mat5Header>,
    entries: Vec<Entry>,
    spans: Vec<(Option<usize>, Range<usize>)>,
    /// Name to position of its first occurrence
    index: HashMap<String, usize>,
}

impl MatFile {
    /// Open a file read-only and index its variables
    ///
    /// A file whose header or element framing cannot be read fails like a
    /// missing file, with the cause as the reason.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path.display().to_string();
        let file = File::open(path).map_err(|e| TableIoError::open(&file_name, &e))?;
        let bytes = FileBytes::load(&file)?;

        let layout = Self::index(&bytes).map_err(|e| {
            tracing::debug!(file = %file_name, error = %e, "not a readable MAT-file");
            TableIoError::Open {
                path: file_name.clone(),
                reason: Some(e.to_string()),
            }
        })?;
        tracing::debug!(
            file = %file_name,
            level = %layout.level,
            variables = layout.entries.len(),
            "opened MAT-file"
        );

        let mut index = HashMap::with_capacity(layout.entries.len());
        for (pos, entry) in layout.entries.iter().enumerate() {
            index.entry(entry.summary.name().to_string()).or_insert(pos);
        }

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
            level: layout.level,
            order: layout.order,
            header: layout.header,
            entries: layout.entries,
            spans: layout.spans,
            index,
        })
    }

    fn index(bytes: &[u8]) -> std::result::Result<Layout, CoreError> {
        let header = match Mat5Header::from_bytes(bytes) {
            Ok(header) if header.is_hdf5() => return Err(CoreError::UnsupportedFormat),
            Ok(header) => header,
            Err(_) => return Self::index_level4(bytes),
        };

        let mut entries = Vec::new();
        let mut spans = Vec::new();
        for element in mat5::index_file(bytes, header.order)? {
            let position = match element.summary {
                Some(summary) => {
                    entries.push(Entry {
                        summary,
                        body: element.body,
                        compressed: element.compressed,
                        decoded: OnceLock::new(),
                    });
                    Some(entries.len() - 1)
                }
                None => None,
            };
            spans.push((position, element.span));
        }
        Ok(Layout {
            level: FileLevel::Level5,
            order: header.order,
            header: Some(header),
            entries,
            spans,
        })
    }

    /// Level 4 records carry no compression and are decoded right away
    fn index_level4(bytes: &[u8]) -> std::result::Result<Layout, CoreError> {
        let (records, order) = mat4::parse_file(bytes)?;
        let mut entries = Vec::with_capacity(records.len());
        let mut spans = Vec::with_capacity(records.len());
        for (variable, span) in records {
            spans.push((Some(entries.len()), span));
            entries.push(Entry {
                summary: variable.summary(),
                body: 0..0,
                compressed: false,
                decoded: OnceLock::from(Ok(variable)),
            });
        }
        Ok(Layout {
            level: FileLevel::Level4,
            order,
            header: None,
            entries,
            spans,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> FileLevel {
        self.level
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Headers of the readable top-level variables, in file order
    pub fn summaries(&self) -> impl Iterator<Item = &VariableSummary> + '_ {
        self.entries.iter().map(|e| &e.summary)
    }

    /// Header of the first top-level variable called `name`
    pub fn summary(&self, name: &str) -> Option<&VariableSummary> {
        self.index.get(name).map(|&pos| &self.entries[pos].summary)
    }

    /// First top-level variable called `name`, decoded on first use
    pub fn variable(&self, name: &str) -> Result<Option<&Variable>> {
        match self.index.get(name) {
            Some(&pos) => self.decode(pos).map(Some),
            None => Ok(None),
        }
    }

    /// Variable at `position` in [`summaries`](Self::summaries) order
    pub(crate) fn decode(&self, position: usize) -> Result<&Variable> {
        let file_name = || self.path.display().to_string();
        let entry = self
            .entries
            .get(position)
            .ok_or_else(|| TableIoError::container(file_name(), CoreError::InsufficientBuffer))?;
        let decoded = entry.decoded.get_or_init(|| {
            let decoded = mat5::decode_element(
                &self.bytes,
                self.order,
                entry.body.clone(),
                entry.compressed,
            );
            tracing::trace!(
                file = %self.path.display(),
                variable = entry.summary.name(),
                ok = decoded.is_ok(),
                "decoded variable"
            );
            decoded
        });
        decoded
            .as_ref()
            .map_err(|&e| TableIoError::container(file_name(), e))
    }

    /// Real part of a numeric variable, column-major, widened to `f64`
    pub fn read_real(&self, variable: &Variable) -> Result<Vec<f64>> {
        let file_name = self.path.display().to_string();
        let Content::Numeric { real, .. } = variable.content() else {
            return Err(TableIoError::container(file_name, CoreError::UnsupportedFormat));
        };
        let count = variable
            .element_count()
            .ok_or_else(|| TableIoError::container(&file_name, CoreError::DimensionOverflow))?;
        widen_payload(&file_name, &self.bytes, real, count)
    }

    pub(crate) fn header(&self) -> Option<&Mat5Header> {
        self.header.as_ref()
    }

    /// Raw bytes of every top-level element, with the variable name when
    /// its header is readable
    pub(crate) fn raw_elements(&self) -> impl Iterator<Item = (Option<&str>, &[u8])> + '_ {
        self.spans.iter().map(|(position, span)| {
            let name = position.map(|pos| self.entries[pos].summary.name());
            (name, &self.bytes[span.clone()])
        })
    }
}

/// Decode `count` values of a payload into a new vector
pub(crate) fn widen_payload(
    file_name: &str,
    file_bytes: &[u8],
    payload: &Payload,
    count: usize,
) -> Result<Vec<f64>> {
    let bytes = match &payload.source {
        PayloadSource::File(range) => file_bytes.get(range.clone()),
        PayloadSource::Inflated { buf, range } => buf.get(range.clone()),
    }
    .ok_or_else(|| TableIoError::container(file_name, CoreError::InsufficientBuffer))?;

    let mut out = Vec::new();
    out.try_reserve_exact(count)
        .map_err(|_| TableIoError::Allocation)?;
    out.resize(count, 0.0);
    widen_into(payload.element, bytes, payload.order, &mut out)
        .map_err(|e| TableIoError::container(file_name, e))?;
    Ok(out)
}
