//! Run object detection on a single image file.
//!
//! Usage:
//!   cargo run --features ffi --bin detect-image -- \
//!     --config yolov3.cfg --weights yolov3.weights --meta coco.data \
//!     --image street.jpg --output annotated.png

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use darknet_runner::{draw_detections, to_records, Detector, ImageFrame};

/// Command line parameters for the detection demo.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network configuration file
    #[arg(long)]
    config: PathBuf,

    /// Path to the weights file
    #[arg(long)]
    weights: PathBuf,

    /// Path to the metadata file
    #[arg(long)]
    meta: PathBuf,

    /// Path to the image to process
    #[arg(long)]
    image: PathBuf,

    /// Where to write the annotated image; skipped when absent
    #[arg(long)]
    output: Option<PathBuf>,

    /// Detection score threshold
    #[arg(long, default_value_t = 0.25)]
    threshold: f32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let mut detector = Detector::open(&args.config, &args.weights, &args.meta)?;
    info!(classes = detector.metadata().classes(), "detector ready");

    let rgb = image::open(&args.image)
        .with_context(|| format!("failed to open image {}", args.image.display()))?
        .to_rgb8();
    let frame = ImageFrame::from_rgb(&rgb);

    let started = std::time::Instant::now();
    let detections = detector.detect_with_threshold(&frame, args.threshold)?;
    info!(count = detections.len(), elapsed = ?started.elapsed(), "detection finished");

    let records = to_records(&detections, frame.width(), frame.height());
    println!("{}", serde_json::to_string_pretty(&records)?);

    if let Some(output) = args.output {
        let mut canvas = rgb;
        draw_detections(&mut canvas, &records, false);
        canvas
            .save(&output)
            .with_context(|| format!("failed to save {}", output.display()))?;
        info!("annotated image written to {}", output.display());
    }

    Ok(())
}
