pub mod ffmpeg_vocabulary;
pub mod static_vocabulary;
