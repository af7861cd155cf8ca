use anyhow::{Context, Result};
use image::DynamicImage;
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::DetectorConfig;
use crate::detection::{annotate, SquareDetector, StageOutputs};
use crate::models::SquareDetection;

/// Debug configuration for pipeline execution
#[derive(Clone, Debug)]
pub struct DebugConfig {
    /// Root directory for debug outputs
    pub output_dir: PathBuf,
    /// Whether debug mode is enabled
    pub enabled: bool,
}

/// Context shared by every run of a pipeline
#[derive(Clone, Debug, Default)]
pub struct PipelineContext {
    pub debug: Option<DebugConfig>,
}

impl PipelineContext {
    fn debug_dir(&self) -> Option<&Path> {
        self.debug
            .as_ref()
            .filter(|d| d.enabled)
            .map(|d| d.output_dir.as_path())
    }
}

/// A detector plus execution context: stage dumps and batch runs
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    detector: SquareDetector,
    context: PipelineContext,
}

impl Pipeline {
    pub fn new(config: DetectorConfig) -> Result<Self> {
        Ok(Self {
            detector: SquareDetector::new(config)?,
            context: PipelineContext::default(),
        })
    }

    pub fn detector(&self) -> &SquareDetector {
        &self.detector
    }

    /// Dump every stage of each run under `output_dir`.
    /// The directory is created when missing and must otherwise be empty.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        match std::fs::read_dir(&output_dir) {
            Ok(mut entries) => {
                anyhow::ensure!(
                    entries.next().is_none(),
                    "Debug directory is not empty: {}",
                    output_dir.display()
                );
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("creating debug directory {}", output_dir.display()))?,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading debug directory {}", output_dir.display()));
            }
        }
        tracing::info!("Stage images will be saved under {}", output_dir.display());

        self.context.debug = Some(DebugConfig {
            output_dir,
            enabled: true,
        });
        Ok(self)
    }

    /// Run the pipeline on one frame, dumping each stage in debug mode
    pub fn run(&self, input: &DynamicImage) -> Result<SquareDetection> {
        self.run_frame(input, self.context.debug_dir())
    }

    /// Run one independent pipeline invocation per frame, in parallel.
    /// Results are in input order; stage dumps go to `frame_NN/` subdirectories.
    pub fn run_batch(&self, inputs: &[DynamicImage]) -> Vec<Result<SquareDetection>> {
        inputs
            .par_iter()
            .enumerate()
            .map(|(i, input)| {
                let dir = self
                    .context
                    .debug_dir()
                    .map(|d| d.join(format!("frame_{:02}", i + 1)));
                self.run_frame(input, dir.as_deref())
                    .with_context(|| format!("frame {}", i + 1))
            })
            .collect()
    }

    fn run_frame(&self, input: &DynamicImage, debug_dir: Option<&Path>) -> Result<SquareDetection> {
        let Some(dir) = debug_dir else {
            return Ok(self.detector.detect(input)?);
        };

        std::fs::create_dir_all(dir)?;
        save(dir, "00_input", input)?;
        let stages = self.detector.detect_stages(input)?;
        save_stages(dir, &stages)?;
        tracing::debug!("Debug: saved stage images to {}", dir.display());

        Ok(stages.detection)
    }
}

fn save_stages(dir: &Path, stages: &StageOutputs) -> Result<()> {
    save(dir, "01_grayscale", &DynamicImage::ImageLuma8(stages.gray.clone()))?;
    save(dir, "02_blur", &DynamicImage::ImageLuma8(stages.blurred.clone()))?;
    save(dir, "03_edges", &DynamicImage::ImageLuma8(stages.edges.clone()))?;
    let contours = annotate::render_contours(&stages.edges, &stages.contours);
    save(dir, "04_contours", &DynamicImage::ImageRgb8(contours))?;
    save(dir, "05_result", &stages.detection.annotated)?;
    Ok(())
}

fn save(dir: &Path, stage: &str, image: &DynamicImage) -> Result<()> {
    let path = dir.join(format!("{}.png", stage));
    image
        .save(&path)
        .map_err(|e| anyhow::anyhow!("Failed to save debug image {}: {}", path.display(), e))
}
