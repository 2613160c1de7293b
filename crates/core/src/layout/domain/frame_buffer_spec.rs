use std::fmt;

use crate::vocabulary::domain::pixel_format::Endianness;

/// Bytes per primitive element of a raw frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementWidth {
    U8,
    U16,
    U32,
    U64,
}

impl ElementWidth {
    /// Smallest standard width that holds `bits` bits.
    pub fn for_bits(bits: u32) -> Option<Self> {
        match bits {
            1..=8 => Some(Self::U8),
            9..=16 => Some(Self::U16),
            17..=32 => Some(Self::U32),
            33..=64 => Some(Self::U64),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::U8 => 1,
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

/// Shape and element type of one raw frame as it comes off the pipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBufferSpec {
    shape: Vec<usize>,
    element_width: ElementWidth,
    endianness: Option<Endianness>,
    opaque: bool,
}

impl FrameBufferSpec {
    pub fn new(shape: Vec<usize>, element_width: ElementWidth) -> Self {
        debug_assert!(
            shape.iter().all(|&d| d > 0),
            "every dimension must be positive"
        );
        Self {
            shape,
            element_width,
            endianness: None,
            opaque: false,
        }
    }

    /// A flat byte buffer with no structured interpretation.
    pub fn opaque(byte_len: usize) -> Self {
        Self {
            opaque: true,
            ..Self::new(vec![byte_len], ElementWidth::U8)
        }
    }

    pub fn with_endianness(mut self, endianness: Option<Endianness>) -> Self {
        // Byte order is meaningless for single-byte elements.
        if self.element_width != ElementWidth::U8 {
            self.endianness = endianness;
        }
        self
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn element_width(&self) -> ElementWidth {
        self.element_width
    }

    pub fn endianness(&self) -> Option<Endianness> {
        self.endianness
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    pub fn element_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// Bytes to read from the pipe for one frame.
    pub fn byte_len(&self) -> usize {
        self.element_count() * self.element_width.bytes()
    }
}

impl fmt::Display for FrameBufferSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.shape.iter().map(ToString::to_string).collect();
        write!(f, "({}) x {}B", dims.join(", "), self.element_width.bytes())?;
        match self.endianness {
            Some(Endianness::Little) => write!(f, " le")?,
            Some(Endianness::Big) => write!(f, " be")?,
            None => {}
        }
        if self.opaque {
            write!(f, " opaque")?;
        }
        Ok(())
    }
}
