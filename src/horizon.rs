//! Horizon EDA Python environment integration
//!
//! Horizon exposes its export automation as a Python API. This module
//! runs a driver script inside that environment and reports failures of
//! the external tool back as regular errors.

use crate::error::{FabError, Result};
use anyhow::Context;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Resolve the Horizon Python interpreter
///
/// The HORIZON_PYTHON environment variable overrides the default, for
/// installations where the horizon module lives in a dedicated prefix.
fn python_interpreter() -> String {
    std::env::var("HORIZON_PYTHON").unwrap_or_else(|_| "python3".to_string())
}

/// Check that the interpreter is present and executable
fn check_python() -> Result<()> {
    let python_path = python_interpreter();

    match Command::new(&python_path).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!(
            "Python interpreter found but failed to execute: {}",
            python_path
        )),
        Err(_) => Err(FabError::InterpreterNotFound { path: python_path }.into()),
    }
}

/// Builder for running scripts in the Horizon Python environment
#[derive(Debug, Default)]
pub struct HorizonScriptBuilder {
    script: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl HorizonScriptBuilder {
    /// Create a new builder with the given script content
    pub fn new(script: impl Into<String>) -> Self {
        Self {
            script: script.into(),
            ..Default::default()
        }
    }

    /// Add a command-line argument for the script
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Set the working directory for the script
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Execute the script in the Horizon Python environment
    pub fn run(self) -> Result<()> {
        check_python()?;

        let mut temp_file =
            NamedTempFile::new().context("Failed to create temporary file for export script")?;
        temp_file
            .write_all(self.script.as_bytes())
            .context("Failed to write export script to temporary file")?;

        let mut cmd = Command::new(python_interpreter());
        cmd.arg(temp_file.path());
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        info!("Running Horizon export script");
        let output = cmd.output().context("Failed to execute Horizon Python")?;

        if !output.stdout.is_empty() {
            debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
        }

        if !output.status.success() {
            return Err(FabError::ExportFailed {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(())
    }
}
