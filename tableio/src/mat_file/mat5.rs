//! Level 5 element parsing and encoding

use std::io::{Read, Write};
use std::ops::Range;
use std::sync::Arc;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use tableio_core::format::constants::TAG_SIZE;
use tableio_core::validation::{checked_element_count, validate_payload_len};
use tableio_core::{
    ArrayClass, ArrayFlags, ByteOrder, CoreError, DataTag, ElementType, Mat5Header, StorageElement,
};

use super::bytes::ByteWriter;
use super::variable::{Content, Payload, PayloadSource, Variable, VariableSummary};

type CoreResult<T> = Result<T, CoreError>;

/// Largest header subelement accepted while indexing
const SUMMARY_SUB_MAX: usize = 1 << 16;

/// A top-level matrix element found while indexing a file
pub(crate) struct IndexedElement {
    /// Tag, payload and padding
    pub span: Range<usize>,
    /// Payload: matrix body, or zlib stream when `compressed`
    pub body: Range<usize>,
    pub compressed: bool,
    /// `None` when the element has no readable matrix header
    pub summary: Option<VariableSummary>,
}

/// Locate every top-level element after the 128-byte header
///
/// Only the flags, dimensions and name of each matrix are read. A
/// compressed element is inflated just far enough to reach its name.
pub(crate) fn index_file(bytes: &[u8], order: ByteOrder) -> CoreResult<Vec<IndexedElement>> {
    let mut elements = Vec::new();

    let mut pos = Mat5Header::SIZE;
    while bytes.len().saturating_sub(pos) >= TAG_SIZE {
        let tag = DataTag::from_bytes(&bytes[pos..], order)?;
        let body = element_data(bytes, pos, &tag, bytes.len())?;
        let end = pos
            .checked_add(tag.total_len()?)
            .ok_or(CoreError::DimensionOverflow)?
            .min(bytes.len());

        let compressed = match tag.element_type() {
            Some(ElementType::Matrix) => false,
            Some(ElementType::Compressed) => true,
            _ => {
                tracing::trace!(offset = pos, element = tag.element, "skipping top-level element");
                pos = end;
                continue;
            }
        };
        let summary = if compressed {
            read_summary(ZlibDecoder::new(&bytes[body.clone()]), order)
        } else {
            read_summary(&bytes[pos..end], order)
        };
        let summary = match summary {
            Ok(summary) => Some(summary),
            Err(error) => {
                tracing::debug!(offset = pos, compressed, %error, "unreadable variable header");
                None
            }
        };

        elements.push(IndexedElement {
            span: pos..end,
            body,
            compressed,
            summary,
        });
        pos = end;
    }

    Ok(elements)
}

/// Decode the complete variable of an element located by [`index_file`]
pub(crate) fn decode_element(
    bytes: &[u8],
    order: ByteOrder,
    body: Range<usize>,
    compressed: bool,
) -> CoreResult<Variable> {
    if !compressed {
        let file = Region {
            bytes,
            order,
            backing: Backing::File,
        };
        return file.parse_matrix(body);
    }

    let stream = bytes.get(body).ok_or(CoreError::InsufficientBuffer)?;
    let mut inflated = Vec::new();
    ZlibDecoder::new(stream)
        .read_to_end(&mut inflated)
        .map_err(|_| CoreError::CorruptedData)?;
    let buf: Arc<[u8]> = inflated.into();

    let tag = DataTag::from_bytes(&buf, order)?;
    if tag.element_type() != Some(ElementType::Matrix) {
        return Err(CoreError::UnsupportedFormat);
    }
    let data = element_data(&buf, 0, &tag, buf.len())?;
    let region = Region {
        bytes: &buf,
        order,
        backing: Backing::Inflated(Arc::clone(&buf)),
    };
    region.parse_matrix(data)
}

/// Read the leading flags, dimensions and name of a matrix element
fn read_summary<R: Read>(mut reader: R, order: ByteOrder) -> CoreResult<VariableSummary> {
    let mut head = [0u8; TAG_SIZE];
    reader.read_exact(&mut head).map_err(stream_error)?;
    if DataTag::from_bytes(&head, order)?.element_type() != Some(ElementType::Matrix) {
        return Err(CoreError::UnsupportedFormat);
    }

    let (_, flags) = read_sub(&mut reader, order)?;
    let flags = ArrayFlags::from_word(order.read_u32(&flags)?);
    let (dims_tag, dims) = read_sub(&mut reader, order)?;
    let dims = decode_dims(&dims_tag, &dims, order)?;
    let (_, name) = read_sub(&mut reader, order)?;

    Ok(VariableSummary {
        name: decode_name(&name),
        class: flags.class,
        complex: flags.complex,
        logical: flags.logical,
        dims,
    })
}

/// Read one subelement, padding included, returning its payload
fn read_sub<R: Read>(reader: &mut R, order: ByteOrder) -> CoreResult<(DataTag, Vec<u8>)> {
    let mut head = [0u8; TAG_SIZE];
    reader.read_exact(&mut head).map_err(stream_error)?;
    let tag = DataTag::from_bytes(&head, order)?;
    if tag.small {
        return Ok((tag, head[4..4 + tag.size].to_vec()));
    }
    if tag.size > SUMMARY_SUB_MAX {
        return Err(CoreError::CorruptedData);
    }
    let mut data = vec![0u8; tag.total_len()? - TAG_SIZE];
    reader.read_exact(&mut data).map_err(stream_error)?;
    data.truncate(tag.size);
    Ok((tag, data))
}

fn stream_error(error: std::io::Error) -> CoreError {
    match error.kind() {
        std::io::ErrorKind::UnexpectedEof => CoreError::InsufficientBuffer,
        _ => CoreError::CorruptedData,
    }
}

/// Dimensions subelement: one `i32` per dimension
fn decode_dims(tag: &DataTag, bytes: &[u8], order: ByteOrder) -> CoreResult<Vec<usize>> {
    if tag.element_type() != Some(ElementType::Int32) || bytes.len() % 4 != 0 {
        return Err(CoreError::CorruptedData);
    }
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let dim = order.read_i32(chunk)?;
            usize::try_from(dim).map_err(|_| CoreError::CorruptedData)
        })
        .collect()
}

/// Payload range of the element whose tag starts at `pos`
fn element_data(bytes: &[u8], pos: usize, tag: &DataTag, limit: usize) -> CoreResult<Range<usize>> {
    let start = pos + tag.data_offset();
    let end = start
        .checked_add(tag.size)
        .ok_or(CoreError::DimensionOverflow)?;
    if end > limit.min(bytes.len()) {
        return Err(CoreError::InsufficientBuffer);
    }
    Ok(start..end)
}

#[derive(Clone)]
enum Backing {
    File,
    Inflated(Arc<[u8]>),
}

/// A byte buffer holding matrix elements
struct Region<'a> {
    bytes: &'a [u8],
    order: ByteOrder,
    backing: Backing,
}

impl Region<'_> {
    fn source(&self, range: Range<usize>) -> PayloadSource {
        match &self.backing {
            Backing::File => PayloadSource::File(range),
            Backing::Inflated(buf) => PayloadSource::Inflated {
                buf: Arc::clone(buf),
                range,
            },
        }
    }

    /// Read the subelement at `*pos`, stopping at `end`
    fn next_sub(&self, pos: &mut usize, end: usize) -> CoreResult<(DataTag, Range<usize>)> {
        if end.saturating_sub(*pos) < TAG_SIZE {
            return Err(CoreError::InsufficientBuffer);
        }
        let tag = DataTag::from_bytes(&self.bytes[*pos..end], self.order)?;
        let data = element_data(self.bytes, *pos, &tag, end)?;
        *pos = pos
            .checked_add(tag.total_len()?)
            .ok_or(CoreError::DimensionOverflow)?
            .min(end);
        Ok((tag, data))
    }

    /// Parse the body of an miMATRIX element
    fn parse_matrix(&self, body: Range<usize>) -> CoreResult<Variable> {
        if body.is_empty() {
            // Empty struct fields are written as zero-length matrices
            return Ok(Variable {
                name: String::new(),
                class: ArrayClass::Double as u8,
                complex: false,
                dims: vec![0, 0],
                content: Content::Numeric {
                    real: Payload {
                        element: ElementType::Double,
                        order: self.order,
                        source: self.source(body.start..body.start),
                    },
                    imag: None,
                },
            });
        }

        let end = body.end;
        let mut pos = body.start;

        let (_, flags_range) = self.next_sub(&mut pos, end)?;
        let flags = ArrayFlags::from_word(self.order.read_u32(&self.bytes[flags_range])?);

        let (dims_tag, dims_range) = self.next_sub(&mut pos, end)?;
        let dims = decode_dims(&dims_tag, &self.bytes[dims_range], self.order)?;

        let (_, name_range) = self.next_sub(&mut pos, end)?;
        let name = decode_name(&self.bytes[name_range]);

        let content = match flags.array_class() {
            Some(class) if class.is_numeric() => {
                let count = checked_element_count(&dims)?;
                let real = self.numeric_part(&mut pos, end, count)?;
                let imag = if flags.complex {
                    Some(self.numeric_part(&mut pos, end, count)?)
                } else {
                    None
                };
                Content::Numeric { real, imag }
            }
            Some(ArrayClass::Struct) => self.struct_content(&mut pos, end, &dims)?,
            _ => Content::Opaque,
        };

        Ok(Variable {
            name,
            class: flags.class,
            complex: flags.complex,
            dims,
            content,
        })
    }

    fn numeric_part(&self, pos: &mut usize, end: usize, count: usize) -> CoreResult<Payload> {
        let (tag, range) = self.next_sub(pos, end)?;
        let element = tag
            .element_type()
            .filter(|e| e.is_numeric())
            .ok_or(CoreError::UnsupportedFormat)?;
        let size = element.size_bytes().ok_or(CoreError::UnsupportedFormat)?;
        validate_payload_len(range.len(), count, size)?;
        Ok(Payload {
            element,
            order: self.order,
            source: self.source(range),
        })
    }

    fn struct_content(&self, pos: &mut usize, end: usize, dims: &[usize]) -> CoreResult<Content> {
        let (_, len_range) = self.next_sub(pos, end)?;
        let name_len = usize::try_from(self.order.read_i32(&self.bytes[len_range])?)
            .map_err(|_| CoreError::CorruptedData)?;
        let (_, names_range) = self.next_sub(pos, end)?;

        let field_names: Vec<String> = if name_len == 0 {
            Vec::new()
        } else {
            if names_range.len() % name_len != 0 {
                return Err(CoreError::CorruptedData);
            }
            self.bytes[names_range]
                .chunks_exact(name_len)
                .map(decode_name)
                .collect()
        };

        let count = checked_element_count(dims)?;
        let total = count
            .checked_mul(field_names.len())
            .ok_or(CoreError::DimensionOverflow)?;
        let mut fields = Vec::new();
        for _ in 0..total {
            let (tag, range) = self.next_sub(pos, end)?;
            if tag.element_type() != Some(ElementType::Matrix) {
                return Err(CoreError::CorruptedData);
            }
            fields.push(self.parse_matrix(range)?);
        }
        // Fields carry no name of their own
        for (k, field) in fields.iter_mut().enumerate() {
            if field.name.is_empty() {
                field.name = field_names[k % field_names.len()].clone();
            }
        }

        Ok(Content::Struct {
            field_names,
            fields,
        })
    }
}

/// Name bytes up to the first NUL
fn decode_name(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Encode a real numeric matrix as a complete miMATRIX element
pub(crate) fn encode_matrix<T: StorageElement>(
    name: &str,
    rows: usize,
    cols: usize,
    column_major: &[T],
    order: ByteOrder,
) -> CoreResult<Vec<u8>> {
    let count = rows.checked_mul(cols).ok_or(CoreError::DimensionOverflow)?;
    if column_major.len() != count {
        return Err(CoreError::LengthMismatch);
    }
    let dim = |d: usize| i32::try_from(d).map_err(|_| CoreError::DimensionOverflow);

    let mut body = ByteWriter::new(order);
    body.put_tag(ElementType::UInt32, 8)?;
    body.put_u32(ArrayFlags::new(T::CLASS).to_word());
    body.put_u32(0);

    body.put_tag(ElementType::Int32, 8)?;
    body.put_i32(dim(rows)?);
    body.put_i32(dim(cols)?);

    body.put_element(ElementType::Int8, name.as_bytes())?;

    body.put_tag(T::ELEMENT, std::mem::size_of_val(column_major))?;
    body.put_values(column_major);
    body.pad();

    let mut element = ByteWriter::new(order);
    element.put_tag(ElementType::Matrix, body.len())?;
    element.put_bytes(&body.into_inner());
    Ok(element.into_inner())
}

/// Wrap a complete element into an miCOMPRESSED element
pub(crate) fn compress_element(element: &[u8], order: ByteOrder) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(element)?;
    let stream = encoder.finish()?;

    let mut out = ByteWriter::new(order);
    out.put_tag(ElementType::Compressed, stream.len())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    out.put_bytes(&stream);
    Ok(out.into_inner())
}
