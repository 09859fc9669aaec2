//! Raw pick-and-place data parsing
//!
//! The PNP export carries one row per placed component with board-space
//! coordinates in millimeters and rotation in degrees.

use crate::error::{FabError, Result, ResultExt};
use anyhow::Context;
use std::path::Path;
use std::str::FromStr;

/// Board side a component is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Top => "Top",
            Side::Bottom => "Bottom",
        }
    }
}

impl FromStr for Side {
    type Err = FabError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Top" | "TOP" | "top" => Ok(Side::Top),
            "Bottom" | "BOTTOM" | "bottom" => Ok(Side::Bottom),
            other => Err(FabError::UnknownSide {
                side: other.to_string(),
            }),
        }
    }
}

/// One row of the raw PNP export
#[derive(Debug, Clone)]
pub struct PnpRow {
    pub designator: String,
    /// Position in mm
    pub x: f64,
    pub y: f64,
    pub side: Side,
    /// Rotation in degrees
    pub rotation: f64,
}

/// Read the raw PNP CSV
pub fn read_pnp(path: &Path) -> Result<Vec<PnpRow>> {
    let mut reader = csv::Reader::from_path(path).with_path_context("read PNP", path)?;

    let headers = reader
        .headers()
        .with_path_context("read PNP header", path)?
        .clone();
    let column = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            FabError::MissingColumn {
                file: path.display().to_string(),
                column: name.to_string(),
            }
            .into()
        })
    };

    let designator_idx = column("Designator")?;
    let x_idx = column("Mid X")?;
    let y_idx = column("Mid Y")?;
    let side_idx = column("Layer")?;
    let rotation_idx = column("Rotation")?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.with_path_context("parse PNP", path)?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let designator = field(designator_idx).to_string();
        rows.push(PnpRow {
            x: parse_position(field(x_idx))
                .with_context(|| format!("Invalid Mid X for {}", designator))?,
            y: parse_position(field(y_idx))
                .with_context(|| format!("Invalid Mid Y for {}", designator))?,
            side: field(side_idx).parse()?,
            rotation: field(rotation_idx)
                .trim()
                .parse()
                .with_context(|| format!("Invalid Rotation for {}", designator))?,
            designator,
        });
    }
    Ok(rows)
}

/// Parse a position field, tolerating an optional `mm` unit suffix
fn parse_position(value: &str) -> std::result::Result<f64, std::num::ParseFloatError> {
    let value = value.trim();
    value.strip_suffix("mm").unwrap_or(value).trim().parse()
}
