use std::io::{BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::diagnostics::domain::line_source::DiagnosticLines;
use crate::shared::constants::{PIPE_ENDPOINT, RAWVIDEO_CONTAINER};
use crate::shared::raw_frame::RawFrame;
use crate::shared::tool_config::ToolConfig;
use crate::shared::video_stream_info::VideoStreamInfo;
use crate::video::domain::frame_sink::FrameSink;
use crate::video::domain::pipe_error::PipeError;

use super::stderr_drain::StderrDrain;

/// Arguments describing raw frames of `stream` arriving on stdin.
pub fn rawvideo_input_args(stream: &VideoStreamInfo) -> Vec<String> {
    let mut args = vec![
        "-f".to_string(),
        RAWVIDEO_CONTAINER.to_string(),
        "-pix_fmt".to_string(),
        stream.pixel_format.clone(),
        "-s".to_string(),
        format!("{}x{}", stream.width, stream.height),
    ];
    if let Some(fps) = stream.frame_rate {
        args.push("-r".to_string());
        args.push(fps.to_string());
    }
    args.push("-i".to_string());
    args.push(PIPE_ENDPOINT.to_string());
    args
}

/// Runs ffmpeg reading raw frames from its stdin.
///
/// Nothing is parsed from stderr; the caller decides the geometry.
pub struct FfmpegPipeWriter {
    config: ToolConfig,
    session: Option<Session>,
}

struct Session {
    child: Child,
    stdin: ChildStdin,
    drain: StderrDrain,
    frame_bytes: usize,
    frames_written: usize,
}

impl FfmpegPipeWriter {
    pub fn new(config: ToolConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.frames_written)
    }
}

impl FrameSink for FfmpegPipeWriter {
    fn open(&mut self, stream: &VideoStreamInfo, output_args: &[String]) -> Result<(), PipeError> {
        if self.session.is_some() {
            self.close()?;
        }
        let binary = self.config.binary();
        let mut child = Command::new(binary)
            .arg("-hide_banner")
            .args(rawvideo_input_args(stream))
            .args(output_args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| PipeError::Spawn {
                binary: binary.display().to_string(),
                source,
            })?;
        log::info!("started {} (pid {}) for {}", binary.display(), child.id(), stream.frame_spec);

        let (Some(stdin), Some(stderr)) = (child.stdin.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(PipeError::MissingPipe("stdin"));
        };
        let lines = DiagnosticLines::new(BufReader::new(stderr));
        let drain = StderrDrain::spawn(Vec::new(), lines, self.config.stderr_tail(), self.config.verbose());

        self.session = Some(Session {
            child,
            stdin,
            drain,
            frame_bytes: stream.frame_bytes(),
            frames_written: 0,
        });
        Ok(())
    }

    fn write(&mut self, frame: &RawFrame) -> Result<(), PipeError> {
        let session = self.session.as_mut().ok_or(PipeError::NotOpen("FfmpegPipeWriter"))?;
        if frame.data().len() != session.frame_bytes {
            return Err(PipeError::FrameSize {
                expected: session.frame_bytes,
                got: frame.data().len(),
            });
        }
        session.stdin.write_all(frame.data())?;
        session.frames_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), PipeError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        let Session {
            mut child,
            mut stdin,
            drain,
            frames_written,
            ..
        } = session;

        // A tool that already exited shows up as a failed status below.
        if let Err(e) = stdin.flush() {
            log::debug!("flushing ffmpeg stdin: {e}");
        }
        drop(stdin);
        let status = child.wait()?;
        let stderr_tail = drain.finish();
        if !status.success() {
            return Err(PipeError::ToolFailed { status, stderr_tail });
        }
        log::info!("pid {} exited with {status} after {frames_written} frame(s)", child.id());
        Ok(())
    }
}

impl Drop for FfmpegPipeWriter {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("closing ffmpeg writer: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::domain::frame_buffer_spec::{ElementWidth, FrameBufferSpec};
    use crate::shared::stream_id::StreamId;

    fn stream() -> VideoStreamInfo {
        VideoStreamInfo {
            stream: StreamId::new(0, 0),
            codec: "rawvideo".to_string(),
            pixel_format: "bgr24".to_string(),
            width: 4,
            height: 3,
            frame_rate: Some(25.0),
            frame_spec: FrameBufferSpec::new(vec![3, 4, 3], ElementWidth::U8),
        }
    }

    fn frame(value: u8, index: usize) -> RawFrame {
        RawFrame::new(vec![value; 36], stream().frame_spec, index)
    }

    #[test]
    fn test_input_args() {
        assert_eq!(
            rawvideo_input_args(&stream()),
            ["-f", "rawvideo", "-pix_fmt", "bgr24", "-s", "4x3", "-r", "25", "-i", "pipe:"]
        );
        let mut no_rate = stream();
        no_rate.frame_rate = None;
        assert!(!rawvideo_input_args(&no_rate).contains(&"-r".to_string()));
    }

    #[test]
    fn test_write_before_open() {
        let mut writer = FfmpegPipeWriter::new(ToolConfig::new());
        assert!(matches!(writer.write(&frame(0, 0)), Err(PipeError::NotOpen(_))));
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::{Path, PathBuf};

        fn fake_tool(dir: &Path, body: &str) -> PathBuf {
            let script = dir.join("ffmpeg");
            let text = format!(
                "#!/bin/sh\necho \"$@\" > '{dir}/args'\n{body}\n",
                dir = dir.display()
            );
            fs::write(&script, text).unwrap();
            fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
            script
        }

        #[test]
        fn test_frames_reach_the_tool() {
            let dir = tempfile::tempdir().unwrap();
            let received = dir.path().join("received.bin");
            let tool = fake_tool(dir.path(), &format!("cat > '{}'", received.display()));
            let mut writer = FfmpegPipeWriter::new(ToolConfig::new().with_binary(&tool));

            let out_args = vec!["-c:v".to_string(), "ffv1".to_string(), "out.mkv".to_string()];
            writer.open(&stream(), &out_args).unwrap();
            writer.write(&frame(1, 0)).unwrap();
            writer.write(&frame(2, 1)).unwrap();
            assert_eq!(writer.frames_written(), 2);
            writer.close().unwrap();

            let bytes = fs::read(&received).unwrap();
            assert_eq!(bytes.len(), 72);
            assert!(bytes[..36].iter().all(|&b| b == 1));
            assert!(bytes[36..].iter().all(|&b| b == 2));
            let args = fs::read_to_string(dir.path().join("args")).unwrap();
            assert_eq!(
                args.trim(),
                "-hide_banner -f rawvideo -pix_fmt bgr24 -s 4x3 -r 25 -i pipe: -c:v ffv1 out.mkv"
            );
        }

        #[test]
        fn test_wrong_frame_size_is_rejected() {
            let dir = tempfile::tempdir().unwrap();
            let tool = fake_tool(dir.path(), "cat > /dev/null");
            let mut writer = FfmpegPipeWriter::new(ToolConfig::new().with_binary(&tool));
            writer.open(&stream(), &[]).unwrap();

            let small = RawFrame::new(vec![0; 12], FrameBufferSpec::new(vec![12], ElementWidth::U8), 0);
            assert!(matches!(
                writer.write(&small),
                Err(PipeError::FrameSize { expected: 36, got: 12 })
            ));
            writer.close().unwrap();
        }

        #[test]
        fn test_failure_returns_stderr_tail() {
            let dir = tempfile::tempdir().unwrap();
            let body = "cat > /dev/null\necho \"Unknown encoder 'nope'\" >&2\nexit 1";
            let tool = fake_tool(dir.path(), body);
            let mut writer = FfmpegPipeWriter::new(ToolConfig::new().with_binary(&tool));
            writer.open(&stream(), &[]).unwrap();
            writer.write(&frame(0, 0)).unwrap();

            match writer.close() {
                Err(PipeError::ToolFailed { stderr_tail, .. }) => {
                    assert_eq!(stderr_tail, vec!["Unknown encoder 'nope'"]);
                }
                other => panic!("expected ToolFailed, got {other:?}"),
            }
        }
    }
}
