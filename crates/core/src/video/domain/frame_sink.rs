use crate::shared::raw_frame::RawFrame;
use crate::shared::video_stream_info::VideoStreamInfo;

use super::pipe_error::PipeError;

/// Feeds raw frames to an external tool.
pub trait FrameSink: Send {
    /// Starts the tool reading frames laid out as `stream` from its stdin,
    /// followed by the caller's output arguments.
    fn open(&mut self, stream: &VideoStreamInfo, output_args: &[String]) -> Result<(), PipeError>;

    fn write(&mut self, frame: &RawFrame) -> Result<(), PipeError>;

    /// Signals end of input and waits for the tool to finish.
    fn close(&mut self) -> Result<(), PipeError>;
}
