pub mod constants;
pub mod raw_frame;
pub mod stream_id;
pub mod tool_config;
pub mod video_stream_info;
