use crate::shared::raw_frame::RawFrame;
use crate::shared::video_stream_info::VideoStreamInfo;

use super::pipe_error::PipeError;

/// Reads raw frames produced by an external tool.
///
/// `open` runs the tool with the caller's arguments and returns the
/// layout of the single video stream it writes to the pipe.
pub trait FrameSource: Send {
    fn open(&mut self, args: &[String]) -> Result<VideoStreamInfo, PipeError>;

    /// Frames in pipe order. Ends at end of stream or after the first error.
    fn frames(&mut self) -> Box<dyn Iterator<Item = Result<RawFrame, PipeError>> + '_>;

    /// Waits for the tool to exit. Closing before the stream is exhausted
    /// stops the tool.
    fn close(&mut self) -> Result<(), PipeError>;
}
