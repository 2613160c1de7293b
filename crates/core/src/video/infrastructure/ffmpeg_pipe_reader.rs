use std::io::{self, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::Arc;

use crate::diagnostics::domain::block_echo::{BlockEcho, LogBlockEcho, WriterBlockEcho};
use crate::diagnostics::domain::line_source::PushbackLines;
use crate::diagnostics::domain::parse_result::ParseResult;
use crate::diagnostics::domain::protocol_driver::ProtocolDriver;
use crate::layout::domain::layout_resolver::resolve_stream;
use crate::shared::raw_frame::RawFrame;
use crate::shared::tool_config::ToolConfig;
use crate::shared::video_stream_info::VideoStreamInfo;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::pipe_error::PipeError;
use crate::vocabulary::domain::vocabulary::Vocabulary;
use crate::vocabulary::infrastructure::ffmpeg_vocabulary::FfmpegVocabulary;

use super::stderr_drain::StderrDrain;
use super::stdout_pump::StdoutPump;

/// Runs ffmpeg with an output of `pipe:` and reads its raw frames.
///
/// The frame layout is discovered from the tool's own stderr header, so
/// the caller's arguments decide codec, scaling and pixel format.
pub struct FfmpegPipeReader {
    config: ToolConfig,
    vocabulary: Arc<dyn Vocabulary>,
    session: Option<Session>,
}

struct Session {
    child: Child,
    stdout: StdoutPump,
    drain: StderrDrain,
    header: ParseResult,
    info: VideoStreamInfo,
    frames_read: usize,
    finished: bool,
}

impl FfmpegPipeReader {
    pub fn new(config: ToolConfig) -> Self {
        let vocabulary = Arc::new(FfmpegVocabulary::new(&config));
        Self::with_vocabulary(config, vocabulary)
    }

    /// Shares one vocabulary (and its cached listings) between readers.
    pub fn with_vocabulary(config: ToolConfig, vocabulary: Arc<dyn Vocabulary>) -> Self {
        Self {
            config,
            vocabulary,
            session: None,
        }
    }

    pub fn info(&self) -> Option<&VideoStreamInfo> {
        self.session.as_ref().map(|s| &s.info)
    }

    /// Everything the tool declared in its stderr header.
    pub fn header(&self) -> Option<&ParseResult> {
        self.session.as_ref().map(|s| &s.header)
    }

    fn start(&self, child: &mut Child) -> Result<(StdoutPump, StderrDrain, ParseResult, VideoStreamInfo), PipeError> {
        let stdout = child.stdout.take().ok_or(PipeError::MissingPipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(PipeError::MissingPipe("stderr"))?;
        let pump = StdoutPump::spawn(stdout);

        let echo: Box<dyn BlockEcho> = if self.config.verbose() {
            Box::new(WriterBlockEcho::stderr())
        } else {
            Box::new(LogBlockEcho)
        };
        let mut driver = ProtocolDriver::new(self.vocabulary.as_ref())?.with_echo(echo);
        let mut lines = PushbackLines::from_reader(BufReader::new(stderr));
        let result = driver.parse(&mut lines)?;

        let (stream, video) = result.pipe_rawvideo_stream()?;
        let info = resolve_stream(stream, video, self.vocabulary.as_ref())?;

        let (pending, rest) = lines.into_parts();
        let drain = StderrDrain::spawn(pending, rest, self.config.stderr_tail(), self.config.verbose());
        pump.start_streaming();
        Ok((pump, drain, result, info))
    }
}

impl FrameSource for FfmpegPipeReader {
    fn open(&mut self, args: &[String]) -> Result<VideoStreamInfo, PipeError> {
        if self.session.is_some() {
            self.close()?;
        }
        let binary = self.config.binary();
        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PipeError::Spawn {
                binary: binary.display().to_string(),
                source,
            })?;
        log::info!("started {} (pid {})", binary.display(), child.id());

        let (stdout, drain, header, info) = match self.start(&mut child) {
            Ok(parts) => parts,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        log::info!(
            "reading stream #{} {} {}x{} as {}",
            info.stream,
            info.pixel_format,
            info.width,
            info.height,
            info.frame_spec
        );
        self.session = Some(Session {
            child,
            stdout,
            drain,
            header,
            info: info.clone(),
            frames_read: 0,
            finished: false,
        });
        Ok(info)
    }

    fn frames(&mut self) -> Box<dyn Iterator<Item = Result<RawFrame, PipeError>> + '_> {
        match self.session.as_mut() {
            Some(session) => Box::new(std::iter::from_fn(move || session.next_frame().transpose())),
            None => Box::new(std::iter::once(Err(PipeError::NotOpen("FfmpegPipeReader")))),
        }
    }

    fn close(&mut self) -> Result<(), PipeError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let Session {
            mut child,
            stdout,
            drain,
            finished,
            frames_read,
            ..
        } = session;

        if !finished {
            log::info!("stopping pid {} after {frames_read} frame(s)", child.id());
            let _ = child.kill();
        }
        drop(stdout);
        let status = child.wait()?;
        let stderr_tail = drain.finish();
        if finished && !status.success() {
            return Err(PipeError::ToolFailed { status, stderr_tail });
        }
        log::info!("pid {} exited with {status}", child.id());
        Ok(())
    }
}

impl Drop for FfmpegPipeReader {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("closing ffmpeg reader: {e}");
        }
    }
}

impl Session {
    fn next_frame(&mut self) -> Result<Option<RawFrame>, PipeError> {
        if self.finished {
            return Ok(None);
        }
        let expected = self.info.frame_bytes();
        let mut data = vec![0u8; expected];
        let got = match read_full(&mut self.stdout, &mut data) {
            Ok(got) => got,
            Err(e) => {
                self.finished = true;
                return Err(e.into());
            }
        };
        if got < expected {
            self.finished = true;
            if got == 0 {
                return Ok(None);
            }
            return Err(PipeError::ShortFrame { expected, got });
        }
        let frame = RawFrame::new(data, self.info.frame_spec.clone(), self.frames_read);
        self.frames_read += 1;
        Ok(Some(frame))
    }
}

/// Fills `buf` unless the stream ends first; returns the bytes read.
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
