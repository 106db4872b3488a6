//! Variables found in a MAT-file

use std::ops::Range;
use std::sync::Arc;

use tableio_core::validation::checked_element_count;
use tableio_core::{ArrayClass, ByteOrder, ElementType};

/// Where the bytes of a numeric payload live
#[derive(Debug, Clone)]
pub(crate) enum PayloadSource {
    /// Range of the file contents
    File(Range<usize>),
    /// Range of a decompressed element
    Inflated { buf: Arc<[u8]>, range: Range<usize> },
}

/// Location and encoding of one numeric part (real or imaginary)
///
/// Payload bytes are only decoded on request, so inspecting a file never
/// touches matrix data.
#[derive(Debug, Clone)]
pub struct Payload {
    pub(crate) element: ElementType,
    pub(crate) order: ByteOrder,
    pub(crate) source: PayloadSource,
}

impl Payload {
    /// Storage element type of the values
    pub fn element(&self) -> ElementType {
        self.element
    }

    pub fn byte_len(&self) -> usize {
        match &self.source {
            PayloadSource::File(range) => range.len(),
            PayloadSource::Inflated { range, .. } => range.len(),
        }
    }
}

/// Content of a variable
#[derive(Debug, Clone)]
pub enum Content {
    /// Numeric array with lazily read parts
    Numeric {
        real: Payload,
        imag: Option<Payload>,
    },
    /// Struct array; `fields` holds `field_names.len()` entries per element,
    /// element after element
    Struct {
        field_names: Vec<String>,
        fields: Vec<Variable>,
    },
    /// Recognised but not decoded (char, cell, sparse, object, ...)
    Opaque,
}

fn class_name(class: u8) -> String {
    match ArrayClass::from_u8(class) {
        Some(class) => class.name().to_string(),
        None => format!("class {class}"),
    }
}

/// Header of a top-level variable: what a file lists without reading data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSummary {
    pub(crate) name: String,
    pub(crate) class: u8,
    pub(crate) complex: bool,
    pub(crate) logical: bool,
    pub(crate) dims: Vec<usize>,
}

impl VariableSummary {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> Option<ArrayClass> {
        ArrayClass::from_u8(self.class)
    }

    pub fn class_name(&self) -> String {
        class_name(self.class)
    }

    pub fn is_complex(&self) -> bool {
        self.complex
    }

    /// Numeric array flagged as holding booleans
    pub fn is_logical(&self) -> bool {
        self.logical
    }

    pub fn is_struct(&self) -> bool {
        self.class() == Some(ArrayClass::Struct)
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }
}

/// One named array of a MAT-file, or one field of a struct
#[derive(Debug, Clone)]
pub struct Variable {
    pub(crate) name: String,
    /// Raw class byte; `None` from [`class`](Self::class) for unknown values
    pub(crate) class: u8,
    pub(crate) complex: bool,
    pub(crate) dims: Vec<usize>,
    pub(crate) content: Content,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> Option<ArrayClass> {
        ArrayClass::from_u8(self.class)
    }

    /// Class name for display, including unknown class numbers
    pub fn class_name(&self) -> String {
        class_name(self.class)
    }

    pub fn is_complex(&self) -> bool {
        self.complex
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements, `None` when the dimensions overflow
    pub fn element_count(&self) -> Option<usize> {
        checked_element_count(&self.dims).ok()
    }

    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Header of a level 4 record, which has no logical flag
    pub(crate) fn summary(&self) -> VariableSummary {
        VariableSummary {
            name: self.name.clone(),
            class: self.class,
            complex: self.complex,
            logical: false,
            dims: self.dims.clone(),
        }
    }

    /// Storage type of the real part of a numeric variable
    pub fn storage_element(&self) -> Option<ElementType> {
        match &self.content {
            Content::Numeric { real, .. } => Some(real.element),
            _ => None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.content, Content::Struct { .. })
    }

    pub fn field_names(&self) -> &[String] {
        match &self.content {
            Content::Struct { field_names, .. } => field_names,
            _ => &[],
        }
    }

    /// Field `name` of struct element `index` (column-major linear index)
    pub fn field(&self, name: &str, index: usize) -> Option<&Variable> {
        let Content::Struct {
            field_names,
            fields,
        } = &self.content
        else {
            return None;
        };
        let position = field_names.iter().position(|f| f == name)?;
        fields.get(index.checked_mul(field_names.len())? + position)
    }
}
