pub mod listing;
pub mod pixel_format;
pub mod vocabulary;
