pub mod frame_buffer_spec;
pub mod layout_resolver;
