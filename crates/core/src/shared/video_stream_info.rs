use crate::layout::domain::frame_buffer_spec::FrameBufferSpec;

use super::stream_id::StreamId;

/// A terminal video stream together with the buffer layout of its frames.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoStreamInfo {
    pub stream: StreamId,
    pub codec: String,
    pub pixel_format: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: Option<f64>,
    pub frame_spec: FrameBufferSpec,
}

impl VideoStreamInfo {
    pub fn frame_bytes(&self) -> usize {
        self.frame_spec.byte_len()
    }
}
