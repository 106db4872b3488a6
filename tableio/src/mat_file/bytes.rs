//! File contents and byte-order aware encoding

use std::fs::File;
use std::ops::Deref;

#[cfg(feature = "mmap")]
use memmap2::Mmap;
use tableio_core::format::constants::ALIGNMENT_BOUNDARY;
use tableio_core::validation::calculate_padding;
use tableio_core::{ByteOrder, CoreError, DataTag, ElementType, StorageElement};

/// Read-only contents of an opened file
pub(crate) enum FileBytes {
    #[cfg(feature = "mmap")]
    Mapped(Mmap),
    Owned(Vec<u8>),
}

impl FileBytes {
    #[cfg(feature = "mmap")]
    pub(crate) fn load(file: &File) -> std::io::Result<Self> {
        if file.metadata()?.len() == 0 {
            // Mapping an empty file fails on some platforms
            return Ok(FileBytes::Owned(Vec::new()));
        }
        // SAFETY: the mapping is read-only. Writers in this crate never
        // modify a file in place; they rename a new file over it, so the
        // mapped inode stays unchanged while the map lives.
        let map = unsafe { Mmap::map(file)? };
        Ok(FileBytes::Mapped(map))
    }

    #[cfg(not(feature = "mmap"))]
    pub(crate) fn load(file: &File) -> std::io::Result<Self> {
        use std::io::Read;
        let mut bytes = Vec::new();
        let mut reader = file;
        reader.read_to_end(&mut bytes)?;
        Ok(FileBytes::Owned(bytes))
    }
}

impl Deref for FileBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            FileBytes::Mapped(map) => map,
            FileBytes::Owned(bytes) => bytes,
        }
    }
}

/// Growable output buffer writing integers in a fixed byte order
pub(crate) struct ByteWriter {
    buf: Vec<u8>,
    order: ByteOrder,
}

impl ByteWriter {
    pub(crate) fn new(order: ByteOrder) -> Self {
        Self {
            buf: Vec::new(),
            order,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&self.order.u32_bytes(value));
    }

    pub(crate) fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&self.order.i32_bytes(value));
    }

    pub(crate) fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Zero-fill up to the next 8-byte boundary
    pub(crate) fn pad(&mut self) {
        let padding = calculate_padding(self.buf.len(), ALIGNMENT_BOUNDARY);
        self.buf.resize(self.buf.len() + padding, 0);
    }

    pub(crate) fn put_tag(&mut self, element: ElementType, size: usize) -> Result<(), CoreError> {
        let tag = DataTag::new(element, size).to_bytes(self.order)?;
        self.buf.extend_from_slice(&tag);
        Ok(())
    }

    /// Tagged element with padding; payloads of up to 4 bytes use the
    /// small element form
    pub(crate) fn put_element(&mut self, element: ElementType, data: &[u8]) -> Result<(), CoreError> {
        if data.len() <= 4 && !data.is_empty() {
            self.put_u32((data.len() as u32) << 16 | element.to_u32());
            let mut word = [0u8; 4];
            word[..data.len()].copy_from_slice(data);
            self.buf.extend_from_slice(&word);
            return Ok(());
        }
        self.put_tag(element, data.len())?;
        self.put_bytes(data);
        self.pad();
        Ok(())
    }

    /// Values in the writer's byte order
    pub(crate) fn put_values<T: StorageElement>(&mut self, values: &[T]) {
        if self.order.is_native() {
            self.buf.extend_from_slice(bytemuck::cast_slice(values));
        } else {
            self.buf.reserve(std::mem::size_of_val(values));
            for value in values {
                self.buf
                    .extend_from_slice(bytemuck::bytes_of(&value.swap_bytes()));
            }
        }
    }

    pub(crate) fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_and_padded_elements() {
        let mut writer = ByteWriter::new(ByteOrder::Little);
        writer.put_element(ElementType::Int8, b"ab").unwrap();
        assert_eq!(writer.len(), 8);
        writer.put_element(ElementType::Int8, b"abcde").unwrap();
        assert_eq!(writer.len(), 8 + 16);

        let bytes = writer.into_inner();
        let small = DataTag::from_bytes(&bytes, ByteOrder::Little).unwrap();
        assert!(small.small);
        assert_eq!(small.size, 2);
        assert_eq!(&bytes[4..6], b"ab");
        let regular = DataTag::from_bytes(&bytes[8..], ByteOrder::Little).unwrap();
        assert_eq!(regular.size, 5);
        assert_eq!(&bytes[21..24], &[0, 0, 0]);
    }

    #[test]
    fn test_values_in_foreign_order() {
        let mut writer = ByteWriter::new(ByteOrder::Big);
        writer.put_values(&[1.5f64, -2.0]);
        writer.put_values(&[0x0102i16]);
        let bytes = writer.into_inner();
        assert_eq!(&bytes[..8], &1.5f64.to_be_bytes());
        assert_eq!(&bytes[8..16], &(-2.0f64).to_be_bytes());
        assert_eq!(&bytes[16..], &[0x01, 0x02]);
    }
}
