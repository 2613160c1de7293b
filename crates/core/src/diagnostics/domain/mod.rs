pub mod block_echo;
pub mod block_segmenter;
pub mod diagnostics_error;
pub mod io_block;
pub mod line_source;
pub mod parse_result;
pub mod protocol_driver;
pub mod stream_mapping;
pub mod stream_record;
