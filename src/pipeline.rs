//! Pipeline orchestration
//!
//! This module runs the export and post-processing stages in order:
//! Horizon export, Gerber archiving, fab-offset loading, and the two
//! JLC generators. Data flows strictly forward; no stage is revisited.

use crate::{
    archive::GerberArchiver,
    bom::{mpn_map, read_bom},
    config::Config,
    error::{Result, ResultExt},
    export::Exporter,
    fabdata::load_fab_data,
    jlc::{generate_bom, generate_pnp, GeneratorStats},
    pnp::read_pnp,
    progress::ProgressTracker,
};
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// The export pipeline
pub struct Pipeline {
    config: Config,
    progress_tracker: ProgressTracker,
    stats: PipelineStats,
}

/// Statistics about a completed pipeline run
#[derive(Debug, Default)]
pub struct PipelineStats {
    pub gerber_files: usize,
    pub bom: GeneratorStats,
    pub pnp: GeneratorStats,
}

impl Pipeline {
    /// Create a new pipeline with the given configuration
    pub fn new(config: Config) -> Self {
        let progress_enabled = !config.no_progress;

        Self {
            config,
            progress_tracker: ProgressTracker::new(progress_enabled),
            stats: PipelineStats::default(),
        }
    }

    /// Run the complete pipeline
    pub fn run(&mut self) -> Result<()> {
        let start = std::time::Instant::now();

        self.config
            .validate()
            .context("Configuration validation failed")?;

        // Export via Horizon
        let mut exporter = Exporter::new(&self.config);
        let spinner = self
            .progress_tracker
            .create_spinner("Exporting manufacturing data...");
        exporter.run().with_stage_context("export")?;
        ProgressTracker::finish_progress(spinner, "Export completed");

        // Archive the Gerber layer set
        let gerber_dir = exporter
            .gerber_dir()
            .context("Gerber scratch directory missing after export")?;
        self.stats.gerber_files = GerberArchiver::create_zip(
            gerber_dir,
            &self.config.versioned_output("gerber.zip"),
            &self.progress_tracker,
        )
        .with_stage_context("gerber archive")?;

        // Cross-reference against the fab-offset database
        self.postprocess(&exporter.bom_path(), &exporter.pnp_path())?;

        info!("Pipeline completed in {} ms", start.elapsed().as_millis());
        Ok(())
    }

    /// JLC post-processing over the raw CSV exports. Split out from
    /// `run` so the CSV stages can operate on pre-existing exports.
    pub fn postprocess(&mut self, bom_csv: &Path, pnp_csv: &Path) -> Result<()> {
        let fab_data =
            load_fab_data(&self.config.fab_data_file()).with_stage_context("fab data")?;
        info!("Loaded {} part offsets", fab_data.len());

        let bom_rows = read_bom(bom_csv).with_stage_context("BOM")?;
        let designator_map = mpn_map(&bom_rows);

        let spinner = self.progress_tracker.create_spinner("Generating JLC BOM...");
        self.stats.bom = generate_bom(
            &bom_rows,
            &fab_data,
            &self.config.versioned_output("bom-jlc.csv"),
        )
        .with_stage_context("JLC BOM")?;
        ProgressTracker::finish_progress(spinner, "JLC BOM generated");

        let pnp_rows = read_pnp(pnp_csv).with_stage_context("PNP")?;

        let spinner = self.progress_tracker.create_spinner("Generating JLC PNP...");
        self.stats.pnp = generate_pnp(
            &pnp_rows,
            &designator_map,
            &fab_data,
            &self.config.versioned_output("pnp-jlc.csv"),
        )
        .with_stage_context("JLC PNP")?;
        ProgressTracker::finish_progress(spinner, "JLC PNP generated");

        Ok(())
    }

    /// Get statistics about the pipeline run
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }
}
