//! Level 4 record parsing and encoding

use std::ops::Range;

use tableio_core::validation::{checked_byte_size, checked_element_count};
use tableio_core::{
    ByteOrder, CoreError, Mat4Header, Mat4Kind, Mat4Precision, StorageElement,
};

use super::bytes::ByteWriter;
use super::variable::{Content, Payload, PayloadSource, Variable};

type CoreResult<T> = Result<T, CoreError>;

/// Parse all records with their byte spans; the byte order of the first
/// record is returned as the byte order of the file
pub(crate) fn parse_file(bytes: &[u8]) -> CoreResult<(Vec<(Variable, Range<usize>)>, ByteOrder)> {
    let first = Mat4Header::from_bytes(bytes)?;
    let mut records = Vec::new();

    let mut pos = 0;
    while pos < bytes.len() {
        let start = pos;
        let header = Mat4Header::from_bytes(&bytes[pos..])?;
        pos += Mat4Header::SIZE;

        let name_end = checked_end(pos, header.name_len, bytes.len())?;
        let name_bytes = &bytes[pos..name_end];
        let name_len = name_bytes.iter().position(|&b| b == 0).unwrap_or(name_bytes.len());
        let name = String::from_utf8_lossy(&name_bytes[..name_len]).into_owned();
        pos = name_end;

        let element = header.precision.element_type();
        let size = element.size_bytes().ok_or(CoreError::UnsupportedFormat)?;
        let count = checked_element_count(&[header.rows, header.cols])?;
        let part_len = checked_byte_size(count, size)?;

        let real = pos..checked_end(pos, part_len, bytes.len())?;
        pos = real.end;
        let imag = if header.complex {
            let imag = pos..checked_end(pos, part_len, bytes.len())?;
            pos = imag.end;
            Some(imag)
        } else {
            None
        };

        let payload = |range| Payload {
            element,
            order: header.order,
            source: PayloadSource::File(range),
        };
        let content = match header.kind {
            Mat4Kind::Numeric => Content::Numeric {
                real: payload(real),
                imag: imag.map(payload),
            },
            Mat4Kind::Text | Mat4Kind::Sparse => Content::Opaque,
        };

        let variable = Variable {
            name,
            class: header.class() as u8,
            complex: header.complex,
            dims: vec![header.rows, header.cols],
            content,
        };
        records.push((variable, start..pos));
    }

    Ok((records, first.order))
}

fn checked_end(start: usize, len: usize, limit: usize) -> CoreResult<usize> {
    let end = start.checked_add(len).ok_or(CoreError::DimensionOverflow)?;
    if end > limit {
        return Err(CoreError::InsufficientBuffer);
    }
    Ok(end)
}

/// Encode a real numeric matrix as one record
pub(crate) fn encode_record<T: StorageElement>(
    name: &str,
    rows: usize,
    cols: usize,
    column_major: &[T],
    order: ByteOrder,
) -> CoreResult<Vec<u8>> {
    let precision = Mat4Precision::from_element(T::ELEMENT).ok_or(CoreError::UnsupportedFormat)?;
    let count = rows.checked_mul(cols).ok_or(CoreError::DimensionOverflow)?;
    if column_major.len() != count {
        return Err(CoreError::LengthMismatch);
    }
    let header = Mat4Header {
        precision,
        ..Mat4Header::numeric(order, rows, cols, name)
    };

    let mut out = ByteWriter::new(order);
    out.put_bytes(&header.to_bytes()?);
    out.put_bytes(name.as_bytes());
    out.put_bytes(&[0]);
    out.put_values(column_major);
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mat_file::widen_payload;
    use tableio_core::ArrayClass;

    #[test]
    fn test_records_in_both_orders() {
        let mut bytes = encode_record("x", 2, 1, &[1.0f64, 2.0], ByteOrder::Big).unwrap();
        bytes.extend(encode_record("small", 1, 2, &[3u8, 250], ByteOrder::Little).unwrap());

        let (records, order) = parse_file(&bytes).unwrap();
        assert_eq!(order, ByteOrder::Big);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].1, 0..20 + 2 + 16);

        let x = &records[0].0;
        assert_eq!(x.name(), "x");
        assert_eq!(x.dims(), &[2, 1]);
        let Content::Numeric { real, .. } = x.content() else {
            panic!("not numeric")
        };
        assert_eq!(widen_payload("t.mat", &bytes, real, 2).unwrap(), vec![1.0, 2.0]);

        let small = &records[1].0;
        assert_eq!(small.class(), Some(ArrayClass::Double));
        let Content::Numeric { real, .. } = small.content() else {
            panic!("not numeric")
        };
        assert_eq!(widen_payload("t.mat", &bytes, real, 2).unwrap(), vec![3.0, 250.0]);
    }

    #[test]
    fn test_unsupported_precision() {
        assert_eq!(
            encode_record("x", 1, 1, &[1i64], ByteOrder::Little).err(),
            Some(CoreError::UnsupportedFormat)
        );
    }

    #[test]
    fn test_truncated_record() {
        let bytes = encode_record("x", 2, 2, &[1.0f64; 4], ByteOrder::Little).unwrap();
        assert_eq!(
            parse_file(&bytes[..bytes.len() - 1]).err(),
            Some(CoreError::InsufficientBuffer)
        );
    }
}
