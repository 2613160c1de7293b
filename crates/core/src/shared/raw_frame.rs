use ndarray::{ArrayD, ArrayViewD, IxDyn};

use crate::layout::domain::frame_buffer_spec::{ElementWidth, FrameBufferSpec};
use crate::vocabulary::domain::pixel_format::Endianness;

/// One raw frame exactly as the tool wrote it to the pipe.
///
/// The bytes are not converted; `spec` says how to interpret them.
#[derive(Clone, Debug)]
pub struct RawFrame {
    data: Vec<u8>,
    spec: FrameBufferSpec,
    index: usize,
}

impl RawFrame {
    pub fn new(data: Vec<u8>, spec: FrameBufferSpec, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            spec.byte_len(),
            "data length must equal the frame buffer byte length"
        );
        Self { data, spec, index }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn spec(&self) -> &FrameBufferSpec {
        &self.spec
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// View of an 8-bit structured frame in its buffer shape.
    ///
    /// `None` for opaque frames and wider elements.
    pub fn as_ndarray(&self) -> Option<ArrayViewD<'_, u8>> {
        if self.spec.is_opaque() || self.spec.element_width() != ElementWidth::U8 {
            return None;
        }
        ArrayViewD::from_shape(IxDyn(self.spec.shape()), &self.data).ok()
    }

    /// Decoded copy of a 16-bit frame, honouring the format's byte order.
    ///
    /// Formats without a declared byte order are read as little-endian.
    pub fn to_ndarray_u16(&self) -> Option<ArrayD<u16>> {
        if self.spec.is_opaque() || self.spec.element_width() != ElementWidth::U16 {
            return None;
        }
        let decode: fn([u8; 2]) -> u16 = match self.spec.endianness() {
            Some(Endianness::Big) => u16::from_be_bytes,
            _ => u16::from_le_bytes,
        };
        let values: Vec<u16> = self
            .data
            .chunks_exact(2)
            .map(|pair| decode([pair[0], pair[1]]))
            .collect();
        ArrayD::from_shape_vec(IxDyn(self.spec.shape()), values).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let spec = FrameBufferSpec::new(vec![2, 2, 3], ElementWidth::U8);
        let data = vec![0u8; 12];
        let frame = RawFrame::new(data.clone(), spec.clone(), 5);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.spec(), &spec);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    #[should_panic(expected = "data length must equal the frame buffer byte length")]
    fn test_mismatched_data_length_panics_in_debug() {
        let spec = FrameBufferSpec::new(vec![2, 2, 3], ElementWidth::U8);
        RawFrame::new(vec![0u8; 10], spec, 0);
    }

    #[test]
    fn test_as_ndarray_pixel_access() {
        // 2x2 bgr24: pixel (row=1, col=0) blue
        let mut data = vec![0u8; 12];
        data[6] = 255;
        let spec = FrameBufferSpec::new(vec![2, 2, 3], ElementWidth::U8);
        let frame = RawFrame::new(data, spec, 0);
        let arr = frame.as_ndarray().unwrap();
        assert_eq!(arr.shape(), &[2, 2, 3]);
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }

    #[test]
    fn test_as_ndarray_rejects_opaque_and_wide() {
        let opaque = RawFrame::new(vec![0u8; 4], FrameBufferSpec::opaque(4), 0);
        assert!(opaque.as_ndarray().is_none());

        let wide = RawFrame::new(
            vec![0u8; 8],
            FrameBufferSpec::new(vec![2, 2], ElementWidth::U16),
            0,
        );
        assert!(wide.as_ndarray().is_none());
    }

    #[test]
    fn test_to_ndarray_u16_little_endian() {
        let spec = FrameBufferSpec::new(vec![1, 2], ElementWidth::U16)
            .with_endianness(Some(Endianness::Little));
        let frame = RawFrame::new(vec![0x01, 0x02, 0xff, 0x03], spec, 0);
        let arr = frame.to_ndarray_u16().unwrap();
        assert_eq!(arr[[0, 0]], 0x0201);
        assert_eq!(arr[[0, 1]], 0x03ff);
    }

    #[test]
    fn test_to_ndarray_u16_big_endian() {
        let spec = FrameBufferSpec::new(vec![2], ElementWidth::U16)
            .with_endianness(Some(Endianness::Big));
        let frame = RawFrame::new(vec![0x01, 0x02, 0xff, 0x03], spec, 0);
        let arr = frame.to_ndarray_u16().unwrap();
        assert_eq!(arr[[0]], 0x0102);
        assert_eq!(arr[[1]], 0xff03);
    }

    #[test]
    fn test_to_ndarray_u16_rejects_bytes() {
        let spec = FrameBufferSpec::new(vec![2], ElementWidth::U8);
        let frame = RawFrame::new(vec![0, 0], spec, 0);
        assert!(frame.to_ndarray_u16().is_none());
    }
}
