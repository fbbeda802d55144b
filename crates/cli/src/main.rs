use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::thread::{self, JoinHandle};

use clap::Parser;

use recorder_core::config::RecorderConfig;
use recorder_core::conversion::infrastructure::display_converter::DisplayConverter;
use recorder_core::pipeline::record_error::RecordError;
use recorder_core::pipeline::recorder_service::RecorderService;
use recorder_core::recording::domain::output_file_namer::OutputFileNamer;
use recorder_core::transport::infrastructure::channel_dispatcher::{
    ChannelDispatcher, DispatcherHandle,
};
use recorder_core::video::domain::frame_source::FrameSource;
use recorder_core::video::infrastructure::ffmpeg_source::FfmpegSource;
use recorder_core::video::infrastructure::ffmpeg_writer::FfmpegWriter;

/// Records a live frame stream to a video file.
#[derive(Parser)]
#[command(name = "video-recorder")]
struct Cli {
    /// Video file, device or stream URL standing in for the camera.
    input: String,

    /// JSON config file; flags below override its keys.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file, or base name when stamped.
    #[arg(long)]
    filename: Option<String>,

    /// Append a capture-time suffix and .avi to the output name.
    #[arg(long)]
    stamped_filename: bool,

    /// Frame rate of the recording.
    #[arg(long)]
    fps: Option<i64>,

    /// FOURCC code of the video codec (e.g. MJPG, XVID, H264).
    #[arg(long)]
    codec: Option<String>,

    /// Encoding frames are converted to before encoding (bgr8 or rgb8).
    #[arg(long)]
    encoding: Option<String>,

    /// Lower bound when scaling single-channel images.
    #[arg(long)]
    min_depth_range: Option<f64>,

    /// Upper bound when scaling single-channel images.
    #[arg(long)]
    max_depth_range: Option<f64>,

    /// Scale single-channel images by each frame's own range.
    #[arg(long)]
    use_dynamic_depth_range: bool,

    /// Colormap id for single-channel images (-1 for gray).
    #[arg(long, allow_negative_numbers = true)]
    colormap: Option<i32>,

    /// Start idle and take start / start_named <name> / stop from stdin.
    #[arg(long)]
    save_all_video: bool,

    /// Topic the frames are published on.
    #[arg(long)]
    topic: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let mut recorder = RecorderService::new(
        &config,
        Box::new(FfmpegWriter::new()),
        Box::new(DisplayConverter::new()),
        OutputFileNamer::default(),
    )?;

    let mut source: Box<dyn FrameSource> = Box::new(FfmpegSource::new());
    let info = source.open(&cli.input)?;
    log::info!(
        "Reading {} ({}x{} @ {:.2}fps)",
        cli.input,
        info.width,
        info.height,
        info.fps
    );

    let mut dispatcher: ChannelDispatcher<RecorderService, RecordError> = ChannelDispatcher::new();
    recorder.register(&mut dispatcher);

    let shutdown = dispatcher.handle();
    ctrlc::set_handler(move || {
        log::info!("Ctrl+C received, shutting down...");
        let _ = shutdown.shutdown();
    })?;

    let publisher = spawn_publisher(source, recorder.topic().to_string(), dispatcher.handle());
    if recorder.commands_enabled() {
        spawn_command_reader(dispatcher.handle());
    }

    let result = dispatcher.spin(&mut recorder);
    // Unblocks a publisher waiting on a full queue.
    drop(dispatcher);

    let report = recorder.shutdown();
    let stats = recorder.stats();
    log::info!(
        "{} of {} frames written, {} dropped",
        stats.written(),
        stats.received(),
        stats.dropped()
    );
    if result.is_ok() && report.was_recording {
        println!("Video saved as {}", report.output_path);
    }
    if publisher.join().is_err() {
        log::warn!("Frame publisher panicked");
    }
    result?;
    Ok(())
}

fn build_config(cli: &Cli) -> Result<RecorderConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => RecorderConfig::from_json_file(path)?,
        None => RecorderConfig::default(),
    };

    if let Some(filename) = &cli.filename {
        config.filename = filename.clone();
    }
    if cli.stamped_filename {
        config.stamped_filename = true;
    }
    if let Some(fps) = cli.fps {
        config.fps = fps;
    }
    if let Some(codec) = &cli.codec {
        config.codec = codec.clone();
    }
    if let Some(encoding) = &cli.encoding {
        config.encoding = encoding.clone();
    }
    if let Some(min) = cli.min_depth_range {
        config.min_depth_range = min;
    }
    if let Some(max) = cli.max_depth_range {
        config.max_depth_range = max;
    }
    if cli.use_dynamic_depth_range {
        config.use_dynamic_depth_range = true;
    }
    if let Some(colormap) = cli.colormap {
        config.colormap = colormap;
    }
    if cli.save_all_video {
        config.save_all_video = true;
    }
    if let Some(topic) = &cli.topic {
        config.topic = topic.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Decodes the input and publishes every frame, then asks the dispatcher
/// to stop once the input runs out.
fn spawn_publisher(
    mut source: Box<dyn FrameSource>,
    topic: String,
    handle: DispatcherHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        for frame in source.frames() {
            match frame {
                Ok(frame) => {
                    if handle.publish(&topic, frame).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("Failed to decode input: {e}");
                    break;
                }
            }
        }
        source.close();
        log::info!("End of input");
        let _ = handle.shutdown();
    })
}

/// Reads `start`, `start_named <name>` and `stop` from stdin, one per line.
/// The thread is left detached since it may be blocked on stdin at exit.
fn spawn_command_reader(handle: DispatcherHandle) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let Some((name, argument)) = parse_command_line(&line) else {
                continue;
            };
            match handle.call(name, argument) {
                Ok(response) if response.success => println!("ok: {}", response.message),
                Ok(response) => println!("failed: {}", response.message),
                Err(_) => break,
            }
        }
    });
}

fn parse_command_line(line: &str) -> Option<(&str, Option<String>)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    match line.split_once(char::is_whitespace) {
        Some((name, rest)) => Some((name, Some(rest.trim().to_string()))),
        None => Some((line, None)),
    }
}
