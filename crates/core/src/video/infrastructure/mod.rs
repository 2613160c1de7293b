pub mod ffmpeg_pipe_reader;
pub mod ffmpeg_pipe_writer;
mod stderr_drain;
mod stdout_pump;
