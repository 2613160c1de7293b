use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use framepipe_core::diagnostics::domain::block_echo::{BlockEcho, NullBlockEcho, WriterBlockEcho};
use framepipe_core::diagnostics::domain::io_block::IoBlock;
use framepipe_core::diagnostics::domain::parse_result::ParseResult;
use framepipe_core::diagnostics::domain::protocol_driver::ProtocolDriver;
use framepipe_core::diagnostics::domain::stream_mapping::CodecTransition;
use framepipe_core::diagnostics::domain::stream_record::{StreamKind, StreamRecord};
use framepipe_core::layout::domain::layout_resolver::{layout, resolve_stream};
use framepipe_core::shared::tool_config::ToolConfig;
use framepipe_core::shared::video_stream_info::VideoStreamInfo;
use framepipe_core::video::domain::frame_source::FrameSource;
use framepipe_core::video::infrastructure::ffmpeg_pipe_reader::FfmpegPipeReader;
use framepipe_core::vocabulary::domain::vocabulary::Vocabulary;
use framepipe_core::vocabulary::infrastructure::ffmpeg_vocabulary::FfmpegVocabulary;

/// Inspect the streams and raw frame layout of an ffmpeg run.
#[derive(Parser)]
#[command(name = "framepipe")]
struct Cli {
    /// ffmpeg binary (defaults to $FRAMEPIPE_FFMPEG, then `ffmpeg` on PATH).
    #[arg(long, global = true)]
    ffmpeg: Option<PathBuf>,

    /// Echo ffmpeg's diagnostic output to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run ffmpeg and report the video stream it writes to `pipe:`.
    Probe {
        /// Frames to read after the header (0 reads none, omit to read all).
        #[arg(long)]
        frames: Option<usize>,

        /// Arguments passed to ffmpeg, e.g. `-- -i in.mkv -f rawvideo -pix_fmt bgr24 pipe:`.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },

    /// Parse a saved ffmpeg stderr transcript (`-` reads stdin).
    Parse { transcript: PathBuf },

    /// Print the frame buffer layout of a pixel format.
    Layout {
        pix_fmt: String,
        /// Frame size as WIDTHxHEIGHT.
        size: String,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = tool_config(&cli);
    match cli.command {
        Command::Probe { frames, args } => run_probe(config, &args, frames),
        Command::Parse { transcript } => run_parse(&config, &transcript),
        Command::Layout { pix_fmt, size } => {
            let (width, height) = parse_size(&size)?;
            run_layout(&config, &pix_fmt, width, height)
        }
    }
}

fn tool_config(cli: &Cli) -> ToolConfig {
    let config = ToolConfig::from_env().with_verbose(cli.verbose);
    match &cli.ffmpeg {
        Some(path) => config.with_binary(path),
        None => config,
    }
}

fn run_probe(config: ToolConfig, args: &[String], frames: Option<usize>) -> Result<(), Box<dyn std::error::Error>> {
    let mut reader = FfmpegPipeReader::new(config);
    let info = reader.open(args)?;
    if let Some(header) = reader.header() {
        print_parse_result(header);
        println!();
    }
    print_stream_info(&info);

    let limit = frames.unwrap_or(usize::MAX);
    let mut count = 0;
    for frame in reader.frames().take(limit) {
        frame?;
        count += 1;
        if count % 100 == 0 {
            eprint!("\rRead {count} frames");
        }
    }
    if count >= 100 {
        eprintln!();
    }
    reader.close()?;
    println!("frames read: {count}");
    Ok(())
}

fn run_parse(config: &ToolConfig, transcript: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = if transcript.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        text
    } else {
        std::fs::read_to_string(transcript)?
    };

    let vocabulary = FfmpegVocabulary::new(config);
    let echo: Box<dyn BlockEcho> = if config.verbose() {
        Box::new(WriterBlockEcho::stderr())
    } else {
        Box::new(NullBlockEcho)
    };
    let result = ProtocolDriver::new(&vocabulary)?
        .with_echo(echo)
        .parse_text(&text)?;
    print_parse_result(&result);

    match result.pipe_rawvideo_stream() {
        Ok((stream, video)) => {
            println!();
            print_stream_info(&resolve_stream(stream, video, &vocabulary)?);
        }
        Err(e) => log::info!("{e}"),
    }
    Ok(())
}

fn run_layout(config: &ToolConfig, pix_fmt: &str, width: u32, height: u32) -> Result<(), Box<dyn std::error::Error>> {
    let vocabulary = FfmpegVocabulary::new(config);
    let descriptor = vocabulary
        .pixel_format(pix_fmt)?
        .ok_or_else(|| format!("Unknown pixel format: {pix_fmt}"))?;
    let spec = layout(&descriptor, width, height)?;
    println!("{pix_fmt} {width}x{height}: {spec}, {} bytes per frame", spec.byte_len());
    Ok(())
}

fn print_parse_result(result: &ParseResult) {
    for io in result.inputs().values().chain(result.outputs().values()) {
        print_io(io);
    }
    if let Some(mapping) = result.mapping() {
        println!("Stream mapping:");
        for entry in mapping.entries() {
            let transition = match &entry.transition {
                Some(CodecTransition::Copy) => " (copy)".to_string(),
                Some(CodecTransition::Transcode { from, to }) => format!(" ({from} -> {to})"),
                None => String::new(),
            };
            println!("  #{} -> #{}{transition}", entry.input, entry.output);
        }
    }
}

fn print_io(io: &IoBlock) {
    println!("{} #{}, {}, '{}'", io.direction, io.index, io.container, io.endpoint);
    for record in io.streams.values() {
        println!("  {}", describe(record));
    }
}

fn describe(record: &StreamRecord) -> String {
    let language = record
        .language
        .as_deref()
        .map(|l| format!("({l})"))
        .unwrap_or_default();
    let body = match &record.kind {
        StreamKind::Video(video) => {
            let rate = video.frame_rate.map(|r| format!(" @ {r} fps")).unwrap_or_default();
            format!(
                "video {} {} {}x{}{rate}",
                video.codec,
                video.pixel_format.as_deref().unwrap_or("?"),
                video.width,
                video.height
            )
        }
        StreamKind::Audio(audio) => {
            let rate = audio.sample_rate.map(|r| format!(" {r} Hz")).unwrap_or_default();
            let layout = audio.channel_layout.as_deref().map(|l| format!(" {l}")).unwrap_or_default();
            format!("audio {}{rate}{layout}", audio.codec.as_deref().unwrap_or("?"))
        }
        StreamKind::Other(other) => other.type_name.to_lowercase(),
    };
    format!("#{}{language}: {body}", record.id)
}

fn print_stream_info(info: &VideoStreamInfo) {
    println!("pipe stream: #{}", info.stream);
    println!("  codec:        {}", info.codec);
    println!("  pixel format: {}", info.pixel_format);
    println!("  size:         {}x{}", info.width, info.height);
    if let Some(rate) = info.frame_rate {
        println!("  frame rate:   {rate}");
    }
    println!("  frame buffer: {} ({} bytes)", info.frame_spec, info.frame_bytes());
}

fn parse_size(size: &str) -> Result<(u32, u32), Box<dyn std::error::Error>> {
    let invalid = || format!("Size must be WIDTHxHEIGHT, got '{size}'");
    let (w, h) = size.split_once('x').ok_or_else(invalid)?;
    let width: u32 = w.parse().map_err(|_| invalid())?;
    let height: u32 = h.parse().map_err(|_| invalid())?;
    if width == 0 || height == 0 {
        return Err(format!("Size must be positive, got '{size}'").into());
    }
    Ok((width, height))
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = &cli.ffmpeg {
        if path.as_os_str().is_empty() {
            return Err("--ffmpeg must not be empty".into());
        }
    }
    match &cli.command {
        Command::Parse { transcript } => {
            if transcript.as_os_str() != "-" && !transcript.exists() {
                return Err(format!("Transcript not found: {}", transcript.display()).into());
            }
        }
        Command::Layout { size, .. } => {
            parse_size(size)?;
        }
        Command::Probe { args, .. } => {
            if !args.iter().any(|a| a == "pipe:" || a == "-") {
                log::warn!("no `pipe:` output in the arguments; probing will find no stream");
            }
        }
    }
    Ok(())
}
