use std::io;
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use blobscan_core::detection::domain::component_labeler::Connectivity;
use blobscan_core::pipeline::detect_frames_use_case::DetectFramesUseCase;
use blobscan_core::pipeline::detection_config::{DetectionConfig, LabelerKind};
use blobscan_core::pipeline::detector_pipeline::DetectorPipeline;
use blobscan_core::pipeline::frame_executor::{FrameExecutor, SequentialExecutor};
use blobscan_core::pipeline::infrastructure::threaded_frame_executor::ThreadedFrameExecutor;
use blobscan_core::pipeline::pipeline_logger::LogPipelineLogger;
use blobscan_core::video::domain::detection_sink::DetectionSink;
use blobscan_core::video::infrastructure::image_sequence_source::ImageSequenceSource;
use blobscan_core::video::infrastructure::json_lines_sink::JsonLinesSink;
use blobscan_core::video::infrastructure::overlay_image_sink::OverlayImageSink;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LabelerArg {
    UnionFind,
    Imageproc,
}

/// Bright blob detection for grayscale images and image sequences.
#[derive(Parser)]
#[command(name = "blobscan")]
struct Cli {
    /// Input image file or directory of images.
    input: PathBuf,

    /// JSON detection config; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Adaptive threshold neighbourhood size (odd, >= 3).
    #[arg(long)]
    block_size: Option<usize>,

    /// Amount a pixel must exceed its local mean by.
    #[arg(long, allow_hyphen_values = true)]
    bias: Option<i32>,

    /// Connected-components implementation.
    #[arg(long, value_enum)]
    labeler: Option<LabelerArg>,

    /// Pixel connectivity: 4 or 8.
    #[arg(long)]
    connectivity: Option<u8>,

    /// Write detections as JSON lines to this file (default: stdout).
    #[arg(long)]
    json: Option<PathBuf>,

    /// Save frames with detections outlined to this directory.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Detection worker threads (1 = run on the main thread).
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Pass decoded images through without grayscale conversion.
    #[arg(long)]
    keep_native: bool,
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

    let config = build_config(&cli)?;
    let detector = DetectorPipeline::from_config(&config)?;

    let executor: Box<dyn FrameExecutor> = if cli.threads > 1 {
        Box::new(ThreadedFrameExecutor::new(cli.threads))
    } else {
        Box::new(SequentialExecutor)
    };

    let mut sinks: Vec<Box<dyn DetectionSink>> = Vec::new();
    match &cli.json {
        Some(path) => sinks.push(Box::new(JsonLinesSink::create(path)?)),
        None => sinks.push(Box::new(JsonLinesSink::new(io::stdout()))),
    }
    if let Some(dir) = &cli.overlay_dir {
        sinks.push(Box::new(OverlayImageSink::new(dir.clone())));
    }

    let source = ImageSequenceSource::new().keep_native(cli.keep_native);
    let mut use_case = DetectFramesUseCase::new(
        Box::new(source),
        Box::new(detector),
        executor,
        sinks,
    )
    .with_logger(Box::new(LogPipelineLogger::default()));

    let summary = use_case.execute(&cli.input)?;
    log::info!(
        "{} frames, {} detections, {} frames without detections",
        summary.frames,
        summary.detections,
        summary.empty_frames
    );
    if let Some(path) = &cli.json {
        log::info!("Detections written to {}", path.display());
    }
    if let Some(dir) = &cli.overlay_dir {
        log::info!("Overlays written to {}", dir.display());
    }
    Ok(())
}

/// Loads the config file, if any, then applies flag overrides.
fn build_config(cli: &Cli) -> Result<DetectionConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => DetectionConfig::load(path)?,
        None => DetectionConfig::default(),
    };
    if let Some(block_size) = cli.block_size {
        config.block_size = block_size;
    }
    if let Some(bias) = cli.bias {
        config.bias = bias;
    }
    if let Some(labeler) = cli.labeler {
        config.labeler = match labeler {
            LabelerArg::UnionFind => LabelerKind::UnionFind,
            LabelerArg::Imageproc => LabelerKind::Imageproc,
        };
    }
    if let Some(n) = cli.connectivity {
        config.connectivity = parse_connectivity(n)?;
    }
    config.validate()?;
    Ok(config)
}

fn parse_connectivity(n: u8) -> Result<Connectivity, Box<dyn std::error::Error>> {
    match n {
        4 => Ok(Connectivity::Four),
        8 => Ok(Connectivity::Eight),
        other => Err(format!("Connectivity must be 4 or 8, got {other}").into()),
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input not found: {}", cli.input.display()).into());
    }
    if let Some(path) = &cli.config {
        if !path.is_file() {
            return Err(format!("Config file not found: {}", path.display()).into());
        }
    }
    if cli.threads == 0 {
        return Err("Threads must be at least 1".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("blobscan").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = parse(&["in.png"]);
        assert_eq!(build_config(&cli).unwrap(), DetectionConfig::default());
        assert_eq!(cli.threads, 1);
        assert!(!cli.keep_native);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"block_size": 21, "bias": 7, "erode_iterations": 1}"#).unwrap();

        let cli = parse(&[
            "in.png",
            "--config",
            path.to_str().unwrap(),
            "--bias",
            "-4",
            "--labeler",
            "imageproc",
            "--connectivity",
            "4",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.block_size, 21);
        assert_eq!(config.bias, -4);
        assert_eq!(config.erode_iterations, 1);
        assert_eq!(config.labeler, LabelerKind::Imageproc);
        assert_eq!(config.connectivity, Connectivity::Four);
    }

    #[test]
    fn test_invalid_block_size_rejected() {
        let cli = parse(&["in.png", "--block-size", "10"]);
        assert!(build_config(&cli).is_err());
    }

    #[test]
    fn test_invalid_connectivity_rejected() {
        assert!(parse_connectivity(6).is_err());
        assert_eq!(parse_connectivity(8).unwrap(), Connectivity::Eight);
    }

    #[test]
    fn test_validate_missing_input() {
        let cli = parse(&["/nonexistent/in.png"]);
        assert!(validate(&cli).is_err());
    }

    #[test]
    fn test_validate_zero_threads() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        image::GrayImage::new(4, 4).save(&input).unwrap();

        let cli = parse(&[input.to_str().unwrap(), "--threads", "0"]);
        assert!(validate(&cli).is_err());
        let cli = parse(&[input.to_str().unwrap(), "--threads", "2"]);
        assert!(validate(&cli).is_ok());
    }
}
