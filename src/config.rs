//! Configuration management for fabgen
//!
//! This module handles CLI argument parsing and application settings.

use anyhow::{anyhow, Context, Result};
use clap::builder::styling;
use clap::{value_parser, Arg, ColorChoice, Command};
use std::path::PathBuf;
use tracing::info;

/// Fixed-name project file looked up in the project directory
pub const PROJECT_FILE: &str = "flexion.hprj";

/// Fixed-name JLCPCB part-offset database looked up in the project directory
pub const FAB_DATA_FILE: &str = "jlc-data.csv";

/// Build the CLI command
pub fn build_cli() -> Command {
    let styles = styling::Styles::styled()
        .header(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Blue.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default());

    Command::new("fabgen")
        .about("fabgen - Export manufacturing data and JLCPCB assembly files")
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("outdir")
                .help("Output directory for the exported artifacts")
                .value_parser(value_parser!(String))
                .required(true),
        )
        .arg(
            Arg::new("version")
                .help("Version string embedded in the output file names")
                .value_parser(value_parser!(String))
                .required(true),
        )
        .arg(
            Arg::new("project_dir")
                .long("project-dir")
                .help("Directory containing flexion.hprj and jlc-data.csv")
                .value_parser(value_parser!(String))
                .default_value("."),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no_progress")
                .long("no-progress")
                .help("Disable progress indicators")
                .action(clap::ArgAction::SetTrue),
        )
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Output directory for all exported artifacts
    pub outdir: PathBuf,

    /// Version string embedded in output file names
    pub version: String,

    /// Directory holding the project file and the fab-offset database
    pub project_dir: PathBuf,

    /// Enable verbose logging
    pub verbose: bool,

    /// Disable progress bars
    pub no_progress: bool,
}

impl Config {
    /// Parse arguments and apply initial configuration
    pub fn from_args() -> Result<Self> {
        let matches = build_cli().try_get_matches().unwrap_or_else(|e| {
            let _ = e.print();
            std::process::exit(match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            });
        });

        let outdir = matches
            .get_one::<String>("outdir")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Output directory is required"))?;

        let version = matches
            .get_one::<String>("version")
            .cloned()
            .ok_or_else(|| anyhow!("Version string is required"))?;

        let project_dir = matches
            .get_one::<String>("project_dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let verbose = matches.get_flag("verbose");
        let no_progress = matches.get_flag("no_progress");

        let config = Config {
            outdir,
            version,
            project_dir,
            verbose,
            no_progress,
        };

        // Set up tracing with environment variable support
        // RUST_LOG takes precedence over verbose flag; skip diagnostics
        // stay visible at the default level
        let default_filter = if config.verbose { "debug" } else { "warn" };
        let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

        tracing_subscriber::fmt().with_env_filter(env_filter).init();

        if config.verbose {
            info!("Configuration: {:?}", config);
        }

        Ok(config)
    }

    /// Path to the project file inside the project directory
    pub fn project_file(&self) -> PathBuf {
        self.project_dir.join(PROJECT_FILE)
    }

    /// Path to the fab-offset database inside the project directory
    pub fn fab_data_file(&self) -> PathBuf {
        self.project_dir.join(FAB_DATA_FILE)
    }

    /// Project name derived from the project file stem
    pub fn project_name(&self) -> String {
        self.project_file()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "project".to_string())
    }

    /// Output file name carrying the project name and version,
    /// e.g. `flexion-1.2-bom.csv` for kind `bom.csv`
    pub fn versioned_output(&self, kind: &str) -> PathBuf {
        self.outdir
            .join(format!("{}-{}-{}", self.project_name(), self.version, kind))
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        let project_file = self.project_file();
        if !project_file.exists() {
            return Err(crate::error::FabError::ProjectFileNotFound {
                path: project_file.display().to_string(),
            }
            .into());
        }

        // Create output directory if it doesn't exist
        if !self.outdir.exists() {
            std::fs::create_dir_all(&self.outdir).with_context(|| {
                format!("Failed to create output directory: {}", self.outdir.display())
            })?;
            info!("Created output directory: {}", self.outdir.display());
        }

        info!("Configuration validation completed successfully");
        Ok(())
    }
}
