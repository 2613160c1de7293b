pub const DEFAULT_FFMPEG_BINARY: &str = "ffmpeg";

/// Environment variable overriding the ffmpeg binary path.
pub const FFMPEG_BINARY_ENV: &str = "FRAMEPIPE_FFMPEG";

/// Endpoint name ffmpeg prints for stdin/stdout I/O.
pub const PIPE_ENDPOINT: &str = "pipe:";

pub const RAWVIDEO_CONTAINER: &str = "rawvideo";

pub const PIX_FMTS_FLAG: &str = "-pix_fmts";
pub const CODECS_FLAG: &str = "-codecs";

/// Stderr lines kept after the stream header has been parsed.
pub const DEFAULT_STDERR_TAIL: usize = 10;

/// Raw lines retained for error reports when parsing fails.
pub const DIAGNOSTIC_TAIL_LINES: usize = 64;

/// Chunk size used when pumping frame bytes off the subprocess stdout.
pub const STDOUT_CHUNK_BYTES: usize = 64 * 1024;

/// Chunks buffered between the stdout pump and the frame reader.
pub const STDOUT_CHANNEL_CAPACITY: usize = 32;
