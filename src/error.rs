//! Error handling for fabgen
//!
//! This module provides unified error handling using anyhow for better error propagation
//! and context information throughout the application.

use anyhow::Context;
use std::path::Path;

pub type Result<T> = anyhow::Result<T>;

/// Extension trait for Results to add context with file paths
pub trait ResultExt<T> {
    /// Add context with file path information
    fn with_path_context<P: AsRef<Path>>(self, operation: &str, path: P) -> Result<T>;

    /// Add context with pipeline stage information
    fn with_stage_context(self, stage: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error> + Send + Sync + 'static,
{
    fn with_path_context<P: AsRef<Path>>(self, operation: &str, path: P) -> Result<T> {
        self.map_err(|e| e.into())
            .with_context(|| format!("Failed to {} file: {}", operation, path.as_ref().display()))
    }

    fn with_stage_context(self, stage: &str) -> Result<T> {
        self.map_err(|e| e.into())
            .with_context(|| format!("Error in {} stage", stage))
    }
}

/// Specific error types for fabgen operations
#[derive(Debug, thiserror::Error)]
pub enum FabError {
    #[error("Project file not found: {path}")]
    ProjectFileNotFound { path: String },

    #[error("Required column '{column}' not found in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Invalid offset value '{value}' for {mpn} in column {column}")]
    InvalidOffset {
        mpn: String,
        column: String,
        value: String,
    },

    #[error("Unknown board side: {side}")]
    UnknownSide { side: String },

    #[error("Horizon Python interpreter not found: {path}")]
    InterpreterNotFound { path: String },

    #[error("Horizon export script failed: {reason}")]
    ExportFailed { reason: String },

    #[error("No Gerber layer files found in {path}")]
    NoGerberFiles { path: String },
}
