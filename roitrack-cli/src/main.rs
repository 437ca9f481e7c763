use clap::Parser;
use roitrack::{
    BlockMatchConfig, BlockMatchSearch, Direction, ImageDirSource, Point, PreprocessConfig, Rect,
    ReferenceMode, SessionConfig, Threshold, Tick, TrackingSession,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "RoiTrack CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for session diagnostics.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ReferenceModeConfig {
    Drifting,
    Pinned,
}

impl From<ReferenceModeConfig> for ReferenceMode {
    fn from(value: ReferenceModeConfig) -> Self {
        match value {
            ReferenceModeConfig::Drifting => ReferenceMode::Drifting,
            ReferenceModeConfig::Pinned => ReferenceMode::Pinned,
        }
    }
}

/// Seed region: an explicit rect, or a center point with a square size.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum SeedConfig {
    Rect {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    Center {
        x: i32,
        y: i32,
        size: usize,
    },
}

impl From<&SeedConfig> for Rect {
    fn from(value: &SeedConfig) -> Self {
        match *value {
            SeedConfig::Rect {
                x,
                y,
                width,
                height,
            } => Rect::new(x, y, width, height),
            SeedConfig::Center { x, y, size } => Rect::from_center(Point::new(x, y), size, size),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThresholdJson {
    level: u8,
    max_value: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PreprocessJson {
    median_blur: Option<i32>,
    equalize_histogram: bool,
    threshold: Option<ThresholdJson>,
}

impl From<&PreprocessJson> for PreprocessConfig {
    fn from(value: &PreprocessJson) -> Self {
        PreprocessConfig {
            median_blur: value.median_blur,
            equalize_histogram: value.equalize_histogram,
            threshold: value.threshold.as_ref().map(|t| Threshold {
                level: t.level,
                max_value: t.max_value,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    frames_dir: String,
    seed: SeedConfig,
    #[serde(default)]
    output_path: Option<String>,
    #[serde(default = "default_radius")]
    radius: usize,
    #[serde(default = "default_reference")]
    reference: ReferenceModeConfig,
    #[serde(default)]
    preprocess: PreprocessJson,
    #[serde(default)]
    max_mean_error: Option<f64>,
    #[serde(default)]
    retain_capacity: Option<usize>,
}

fn default_radius() -> usize {
    BlockMatchConfig::default().radius
}

fn default_reference() -> ReferenceModeConfig {
    ReferenceModeConfig::Drifting
}

#[derive(Debug, Serialize)]
struct TickRecord {
    frame_index: usize,
    direction: &'static str,
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    error: u64,
    mean_error: f64,
}

#[derive(Debug, Serialize)]
struct Output {
    ticks: Vec<TickRecord>,
    lost_at: Option<usize>,
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "forward",
        Direction::Reverse => "reverse",
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("roitrack=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.frames_dir.is_empty() {
        return Err("frames_dir must be set in the config".into());
    }

    let source = ImageDirSource::open(&config.frames_dir)?;
    if source.is_empty() {
        return Err(format!("no image frames found in {}", config.frames_dir).into());
    }

    let locator = Box::new(BlockMatchSearch::new(BlockMatchConfig {
        radius: config.radius,
        preprocess: (&config.preprocess).into(),
        reference: config.reference.into(),
    }));
    let seed: Rect = (&config.seed).into();
    let mut session = TrackingSession::new(
        source,
        locator,
        seed,
        SessionConfig {
            max_mean_error: config.max_mean_error,
            retain_capacity: config.retain_capacity,
        },
    )?;

    let mut ticks = Vec::new();
    let mut lost_at = None;
    loop {
        match session.advance()? {
            Tick::Tracked(result) => ticks.push(TickRecord {
                frame_index: result.frame_index,
                direction: direction_label(result.direction),
                x: result.rect.x,
                y: result.rect.y,
                width: result.rect.width,
                height: result.rect.height,
                error: result.error,
                mean_error: result.mean_error,
            }),
            Tick::Lost { frame_index } => {
                // No re-acquisition is attempted; stop the loop here.
                lost_at = Some(frame_index);
                break;
            }
            Tick::Terminated => break,
        }
    }

    let output = Output { ticks, lost_at };
    let json = serde_json::to_string_pretty(&output)?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
