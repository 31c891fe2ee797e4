//! Command-line utilities for board-overlay.
//!
//! `summary` validates a layout descriptor and prints the calibration
//! summary; `project` runs one frame worth of geometry over detected
//! marker points and emits a JSON report.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use board_overlay::{ColorSample, OrderedQuad, Point, QuadBox, Session};

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Calibration(#[from] board_overlay::CalibrationError),
}

#[derive(Parser)]
#[command(name = "board-overlay", version, about = "Overlay geometry for guided board assembly")]
struct Cli {
    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info", global = true)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a layout descriptor and print the calibration summary.
    Summary {
        /// Path to the layout descriptor JSON.
        layout: PathBuf,
    },
    /// Project detected marker points through a layout descriptor and
    /// emit the reconstructed geometry as JSON.
    Project {
        /// Path to the layout descriptor JSON.
        layout: PathBuf,
        /// Path to the frame input JSON (detected marker centers).
        frame: PathBuf,
        /// Component index to generate assembly placements for.
        #[arg(long)]
        component: Option<usize>,
        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

/// Detected marker centers for one frame, as produced by the detection
/// frontend.
#[derive(Debug, Deserialize)]
struct FrameInput {
    #[serde(default)]
    board_points: Vec<[f64; 2]>,
    #[serde(default)]
    storage_points: Vec<[f64; 2]>,
    /// Mean RGB of the white reference region.
    #[serde(default = "neutral_sample")]
    color_sample: [f64; 3],
}

fn neutral_sample() -> [f64; 3] {
    [255.0, 255.0, 255.0]
}

#[derive(Debug, Serialize)]
struct QuadReport {
    quad: OrderedQuad,
    well_formed: bool,
    angle_score: Option<f64>,
}

impl QuadReport {
    fn new(quad: OrderedQuad) -> Self {
        Self {
            well_formed: quad.is_well_formed(),
            angle_score: quad.right_angle_score().ok(),
            quad,
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct ProjectReport {
    board: Option<QuadReport>,
    placements: Option<Vec<QuadBox>>,
    storage: Option<QuadReport>,
    cells: Option<Vec<QuadBox>>,
    withdrawal_index: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    frame_errors: Vec<String>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let _ = board_overlay_core::init_with_level(cli.log_level);

    match cli.command {
        Command::Summary { layout } => summary(layout),
        Command::Project {
            layout,
            frame,
            component,
            output,
        } => project(layout, frame, component, output),
    }
}

fn summary(layout: PathBuf) -> Result<(), CliError> {
    let session = Session::calibrate(default_sample(), &layout)?;
    let summary = session.summary();

    println!("board: {}", summary.board_name);
    for ((name, occurrences), polarity) in summary
        .component_names
        .iter()
        .zip(&summary.occurrences)
        .zip(&summary.polarities)
    {
        println!("  {name}: {occurrences} occurrence(s), polarity {polarity}");
    }
    Ok(())
}

fn default_sample() -> ColorSample {
    ColorSample {
        red: 255.0,
        green: 255.0,
        blue: 255.0,
    }
}

fn project(
    layout: PathBuf,
    frame: PathBuf,
    component: Option<usize>,
    output: Option<PathBuf>,
) -> Result<(), CliError> {
    let input: FrameInput = serde_json::from_str(&fs::read_to_string(&frame)?)?;
    let [red, green, blue] = input.color_sample;
    let session = Session::calibrate(ColorSample { red, green, blue }, &layout)?;

    let mut report = ProjectReport::default();

    let board_points = to_points(&input.board_points);
    match session.reconstruct_board(&board_points) {
        Ok(board) => {
            if let Some(index) = component {
                match session.build_assembly_placements(&board, index) {
                    Ok(boxes) => report.placements = Some(boxes),
                    Err(err) => report.frame_errors.push(err.to_string()),
                }
                match session.withdrawal_box_index(index) {
                    Ok(i) => report.withdrawal_index = Some(i),
                    Err(err) => report.frame_errors.push(err.to_string()),
                }
            }
            report.board = Some(QuadReport::new(board));
        }
        Err(err) => report.frame_errors.push(err.to_string()),
    }

    let storage_points = to_points(&input.storage_points);
    match session.reconstruct_storage(&storage_points) {
        Ok(storage) => {
            match session.build_storage_grid(&storage) {
                Ok(cells) => report.cells = Some(cells),
                Err(err) => report.frame_errors.push(err.to_string()),
            }
            report.storage = Some(QuadReport::new(storage));
        }
        Err(err) => report.frame_errors.push(err.to_string()),
    }

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

fn to_points(raw: &[[f64; 2]]) -> Vec<Point> {
    raw.iter().map(|[x, y]| Point::new(*x, *y)).collect()
}
