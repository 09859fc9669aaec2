//! Manufacturing artifact export
//!
//! This module builds the export plan handed to the embedded Horizon
//! driver script: schematic PDF, 3D render, Gerber layer set, raw BOM and
//! raw PNP data. All CAD work happens inside Horizon; this side only
//! decides filenames, layer mappings and column configuration.

use crate::{
    config::Config,
    error::{Result, ResultExt},
    horizon::HorizonScriptBuilder,
};
use anyhow::Context;
use rust_embed::RustEmbed;
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::info;

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

const DRIVER_SCRIPT: &str = "export_horizon.py";

/// Render dimensions for the 3D board image
const RENDER_WIDTH: u32 = 1920;
const RENDER_HEIGHT: u32 = 1080;

/// Exporter for all Horizon-produced artifacts
pub struct Exporter {
    project_file: PathBuf,
    project_dir: PathBuf,
    project_name: String,
    outdir: PathBuf,
    version: String,

    /// Scratch directory receiving the unpacked Gerber layer files;
    /// populated by a successful run
    gerber_scratch: Option<TempDir>,
}

impl Exporter {
    /// Create a new exporter from the application configuration
    pub fn new(config: &Config) -> Self {
        Self {
            project_file: config.project_file(),
            project_dir: config.project_dir.clone(),
            project_name: config.project_name(),
            outdir: config.outdir.clone(),
            version: config.version.clone(),
            gerber_scratch: None,
        }
    }

    /// Run all exports through the Horizon Python environment
    pub fn run(&mut self) -> Result<()> {
        let scratch =
            TempDir::new().context("Failed to create scratch directory for Gerber export")?;

        let plan = self.build_plan(scratch.path());

        let mut plan_file =
            NamedTempFile::new().context("Failed to create temporary file for export plan")?;
        serde_json::to_writer_pretty(&mut plan_file, &plan)
            .context("Failed to serialize export plan")?;
        plan_file
            .flush()
            .context("Failed to flush export plan file")?;

        let script = Asset::get(DRIVER_SCRIPT).context("Export driver script not embedded")?;
        let script = std::str::from_utf8(&script.data)
            .context("Export driver script is not valid UTF-8")?
            .to_string();

        info!("Exporting {} version {}", self.project_name, self.version);
        HorizonScriptBuilder::new(script)
            .arg(plan_file.path().to_string_lossy())
            .current_dir(&self.project_dir)
            .run()
            .with_path_context("export project", &self.project_file)?;

        self.gerber_scratch = Some(scratch);
        Ok(())
    }

    /// Path of the raw BOM CSV written by the export
    pub fn bom_path(&self) -> PathBuf {
        self.outdir
            .join(format!("{}-{}-bom.csv", self.project_name, self.version))
    }

    /// Path of the raw PNP CSV written by the export
    pub fn pnp_path(&self) -> PathBuf {
        self.outdir
            .join(format!("{}-{}-pnp.csv", self.project_name, self.version))
    }

    /// Scratch directory holding the exported Gerber layer files
    pub fn gerber_dir(&self) -> Option<&Path> {
        self.gerber_scratch.as_ref().map(|d| d.path())
    }

    /// Build the JSON export plan consumed by the driver script
    fn build_plan(&self, gerber_dir: &Path) -> Value {
        let outdir = self.outdir.to_string_lossy();
        let prefix = format!("{}-{}", self.project_name, self.version);
        let bom_output = self.bom_path();

        json!({
            "project_file": self.project_file.to_string_lossy(),
            "pdf": {
                "min_line_width": 0,
                "output_filename": format!("{}/schematic-{}.pdf", outdir, self.version),
            },
            "render": {
                "width": RENDER_WIDTH,
                "height": RENDER_HEIGHT,
                "output_filename": format!("{}/board-{}.png", outdir, self.version),
            },
            "gerber": {
                "drill_mode": "merged",
                "drill_npth": "",
                "drill_pth": ".XLN",
                "layers": {
                    "-1": {"enabled": true, "filename": ".G2L", "layer": -1},
                    "-100": {"enabled": true, "filename": ".GBL", "layer": -100},
                    "-110": {"enabled": true, "filename": ".GBS", "layer": -110},
                    "-120": {"enabled": true, "filename": ".GBO", "layer": -120},
                    "-130": {"enabled": true, "filename": ".GBP", "layer": -130},
                    "-2": {"enabled": true, "filename": ".G3L", "layer": -2},
                    "0": {"enabled": true, "filename": ".GTL", "layer": 0},
                    "10": {"enabled": true, "filename": ".GTS", "layer": 10},
                    "100": {"enabled": true, "filename": ".GKO", "layer": 100},
                    "20": {"enabled": true, "filename": ".GTO", "layer": 20},
                    "30": {"enabled": true, "filename": ".GTP", "layer": 30},
                },
                "output_directory": gerber_dir.to_string_lossy(),
                "prefix": prefix.as_str(),
                "zip_output": false,
            },
            "bom": {
                "concrete_parts": {},
                "csv_settings": {
                    "column_names": {
                        "MPN": "MPN",
                        "QTY": "",
                        "datasheet": "",
                        "description": "Description",
                        "manufacturer": "Manufacturer",
                        "package": "Package",
                        "refdes": "Designator",
                        "value": "Value",
                    },
                    "columns": ["refdes", "value", "description", "package", "MPN"],
                    "custom_column_names": true,
                    "order": "asc",
                    "sort_column": "refdes",
                },
                "include_nopopulate": false,
                "orderable_MPNs": {},
                "output_filename": bom_output.to_string_lossy(),
            },
            "pnp": {
                "column_names": {
                    "MPN": "",
                    "angle": "Rotation",
                    "manufacturer": "",
                    "package": "",
                    "refdes": "Designator",
                    "side": "Layer",
                    "value": "",
                    "x": "Mid X",
                    "y": "Mid Y",
                },
                "columns": ["refdes", "x", "y", "side", "angle"],
                "customize": true,
                "mode": "merged",
                "filename_top": "",
                "filename_bottom": "",
                "filename_merged": format!("{}-pnp.csv", prefix),
                "output_directory": outdir,
                "position_format": "%.4m",
                "bottom_side": "Bottom",
                "top_side": "Top",
            },
        })
    }
}
