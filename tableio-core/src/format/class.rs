//! Array classes and array flags of level 5 matrices

use super::constants::flags;
use super::tag::ElementType;

/// MATLAB array class stored in the array flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ArrayClass {
    Cell = 1,
    Struct = 2,
    Object = 3,
    Char = 4,
    Sparse = 5,
    Double = 6,
    Single = 7,
    Int8 = 8,
    UInt8 = 9,
    Int16 = 10,
    UInt16 = 11,
    Int32 = 12,
    UInt32 = 13,
    Int64 = 14,
    UInt64 = 15,
    Function = 16,
    Opaque = 17,
}

impl ArrayClass {
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(ArrayClass::Cell),
            2 => Some(ArrayClass::Struct),
            3 => Some(ArrayClass::Object),
            4 => Some(ArrayClass::Char),
            5 => Some(ArrayClass::Sparse),
            6 => Some(ArrayClass::Double),
            7 => Some(ArrayClass::Single),
            8 => Some(ArrayClass::Int8),
            9 => Some(ArrayClass::UInt8),
            10 => Some(ArrayClass::Int16),
            11 => Some(ArrayClass::UInt16),
            12 => Some(ArrayClass::Int32),
            13 => Some(ArrayClass::UInt32),
            14 => Some(ArrayClass::Int64),
            15 => Some(ArrayClass::UInt64),
            16 => Some(ArrayClass::Function),
            17 => Some(ArrayClass::Opaque),
            _ => None,
        }
    }

    /// Whether the class holds plain numbers readable as `f64`
    pub const fn is_numeric(self) -> bool {
        self.storage_element().is_some()
    }

    /// Element type the class is written with
    pub const fn storage_element(self) -> Option<ElementType> {
        match self {
            ArrayClass::Double => Some(ElementType::Double),
            ArrayClass::Single => Some(ElementType::Single),
            ArrayClass::Int8 => Some(ElementType::Int8),
            ArrayClass::UInt8 => Some(ElementType::UInt8),
            ArrayClass::Int16 => Some(ElementType::Int16),
            ArrayClass::UInt16 => Some(ElementType::UInt16),
            ArrayClass::Int32 => Some(ElementType::Int32),
            ArrayClass::UInt32 => Some(ElementType::UInt32),
            ArrayClass::Int64 => Some(ElementType::Int64),
            ArrayClass::UInt64 => Some(ElementType::UInt64),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ArrayClass::Cell => "cell",
            ArrayClass::Struct => "struct",
            ArrayClass::Object => "object",
            ArrayClass::Char => "char",
            ArrayClass::Sparse => "sparse",
            ArrayClass::Double => "double",
            ArrayClass::Single => "single",
            ArrayClass::Int8 => "int8",
            ArrayClass::UInt8 => "uint8",
            ArrayClass::Int16 => "int16",
            ArrayClass::UInt16 => "uint16",
            ArrayClass::Int32 => "int32",
            ArrayClass::UInt32 => "uint32",
            ArrayClass::Int64 => "int64",
            ArrayClass::UInt64 => "uint64",
            ArrayClass::Function => "function_handle",
            ArrayClass::Opaque => "opaque",
        }
    }
}

impl core::fmt::Display for ArrayClass {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// First word of the array flags subelement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayFlags {
    /// Raw class byte; unknown classes are kept so they can be reported
    pub class: u8,
    pub complex: bool,
    pub global: bool,
    pub logical: bool,
}

impl ArrayFlags {
    pub const fn new(class: ArrayClass) -> Self {
        Self {
            class: class as u8,
            complex: false,
            global: false,
            logical: false,
        }
    }

    pub const fn from_word(word: u32) -> Self {
        Self {
            class: (word & flags::CLASS_MASK) as u8,
            complex: word & flags::COMPLEX != 0,
            global: word & flags::GLOBAL != 0,
            logical: word & flags::LOGICAL != 0,
        }
    }

    pub const fn to_word(self) -> u32 {
        let mut word = self.class as u32;
        if self.complex {
            word |= flags::COMPLEX;
        }
        if self.global {
            word |= flags::GLOBAL;
        }
        if self.logical {
            word |= flags::LOGICAL;
        }
        word
    }

    pub const fn array_class(self) -> Option<ArrayClass> {
        ArrayClass::from_u8(self.class)
    }
}
