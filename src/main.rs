use clap::Parser;
use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use minsquare::{DetectorConfig, Pipeline, SquareDetection};

#[derive(Parser)]
#[command(name = "minsquare")]
#[command(about = "Find the smallest square outline in images")]
#[command(version)]
struct Cli {
    /// Input image files
    #[arg(value_name = "IMAGE", required_unless_present = "dump_config")]
    images: Vec<PathBuf>,

    /// Canny low threshold (overrides config)
    #[arg(long)]
    low: Option<f32>,

    /// Canny high threshold (overrides config)
    #[arg(long)]
    high: Option<f32>,

    /// Detector configuration (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Annotated output: a file for one input, a directory for several
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Save stage images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Print one JSON report per image
    #[arg(long)]
    json: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    let low = args.low.unwrap_or(config.edges.low_threshold);
    let high = args.high.unwrap_or(config.edges.high_threshold);
    config = config.with_thresholds(low, high);

    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let mut pipeline = Pipeline::new(config)?;
    if let Some(debug_dir) = args.debug_out.clone() {
        pipeline = pipeline.with_debug(debug_dir)?;
    }

    let images = args
        .images
        .iter()
        .map(|path| load_image(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let results = if images.len() == 1 {
        vec![pipeline.run(&images[0])]
    } else {
        pipeline.run_batch(&images)
    };

    let mut failures = 0;
    for (path, result) in args.images.iter().zip(results) {
        match result {
            Ok(detection) => {
                print_detection(path, &detection, args.json)?;
                if let Some(output) = &args.output {
                    let target = output_path(output, path, args.images.len() > 1)?;
                    detection
                        .annotated
                        .save(&target)
                        .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", target.display(), e))?;
                    tracing::info!("Annotated image written to {}", target.display());
                }
            }
            Err(e) => {
                failures += 1;
                eprintln!("{}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} image(s) failed", failures, args.images.len());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_image(path: &Path) -> anyhow::Result<DynamicImage> {
    tracing::debug!("Loading image: {:?}", path);
    let img = ImageReader::open(path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image {}: {}", path.display(), e))?;
    tracing::debug!("Image loaded: {}x{}", img.width(), img.height());
    Ok(img)
}

fn output_path(output: &Path, input: &Path, many: bool) -> anyhow::Result<PathBuf> {
    if !many {
        return Ok(output.to_path_buf());
    }
    std::fs::create_dir_all(output)?;
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(output.join(format!("{}_annotated.png", stem)))
}

fn print_detection(path: &Path, detection: &SquareDetection, json: bool) -> anyhow::Result<()> {
    if json {
        let report = detection.report(path.display().to_string());
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!("\n=== {} ===", path.display());
    println!(
        "Square candidates: {} ({} after nested suppression)",
        detection.candidates.len(),
        detection.survivors.len()
    );
    match &detection.min_square {
        Some(min) => {
            println!("Smallest square, side length: {:.1} px", min.side_length());
            println!("  area: {:.1} px², circularity: {:.3}", min.area(), min.circularity());
            for (i, v) in min.vertices().iter().enumerate() {
                println!("  vertex {}: ({:.0}, {:.0})", i + 1, v.x, v.y);
            }
        }
        None => println!("No square found."),
    }
    Ok(())
}
