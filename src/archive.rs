//! Gerber archive creation
//!
//! This module collects the exported layer files from the scratch
//! directory and packs them into the versioned ZIP delivered to the
//! fab house.

use crate::error::{FabError, Result, ResultExt};
use crate::progress::ProgressTracker;
use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;

lazy_static! {
    /// Layer and drill file extensions produced by the Gerber export
    static ref GERBER_FILE_RE: Regex = Regex::new(r"(?i)\.(g[tb][lsop]|gko|g\d+l|xln)$").unwrap();
}

/// Archive creator for the exported Gerber layer set
pub struct GerberArchiver;

impl GerberArchiver {
    /// Pack all Gerber layer files from `source_dir` into `zip_path`.
    /// Returns the number of archived files.
    pub fn create_zip(
        source_dir: &Path,
        zip_path: &Path,
        tracker: &ProgressTracker,
    ) -> Result<usize> {
        let mut files: Vec<PathBuf> = fs::read_dir(source_dir)
            .with_path_context("read Gerber directory", source_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .map(|name| GERBER_FILE_RE.is_match(name))
                        .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(FabError::NoGerberFiles {
                path: source_dir.display().to_string(),
            }
            .into());
        }

        if let Some(parent) = zip_path.parent() {
            fs::create_dir_all(parent).with_path_context("create output directory", parent)?;
        }

        let zip_file =
            fs::File::create(zip_path).with_path_context("create Gerber archive", zip_path)?;
        let mut zip = zip::ZipWriter::new(zip_file);
        zip.set_comment(format!(
            "Generated {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o755);

        let progress = tracker.create_file_progress(files.len(), "Archiving Gerber files");

        for file in &files {
            let file_name = file
                .file_name()
                .and_then(|name| name.to_str())
                .context("Invalid Gerber file name")?;

            debug!("Archiving {}", file_name);
            zip.start_file(file_name, options)
                .with_path_context("add to archive", file)?;
            let content = fs::read(file).with_path_context("read Gerber", file)?;
            zip.write_all(&content)
                .with_path_context("write to archive", zip_path)?;

            ProgressTracker::update_progress(&progress, 1, None);
        }

        zip.finish()
            .with_path_context("finish Gerber archive", zip_path)?;
        ProgressTracker::finish_progress(progress, "Gerber archive created");

        info!(
            "Archived {} layer files into {}",
            files.len(),
            zip_path.display()
        );
        Ok(files.len())
    }
}
