//! JLCPCB part-offset database loading
//!
//! `jlc-data.csv` maps manufacturer part numbers to the JLCPCB order
//! number and the placement offset applied during PNP generation.

use crate::error::{FabError, Result, ResultExt};
use std::collections::HashMap;
use std::path::Path;

/// Placement offset and order number for one part
#[derive(Debug, Clone, PartialEq)]
pub struct PartOffset {
    pub order_no: String,
    /// X offset in mm
    pub x: f64,
    /// Y offset in mm
    pub y: f64,
    /// Rotation offset in degrees
    pub rot: f64,
}

/// Load the part-offset database, keyed by MPN.
/// A non-numeric offset value is a fatal error.
pub fn load_fab_data(path: &Path) -> Result<HashMap<String, PartOffset>> {
    let mut reader = csv::Reader::from_path(path).with_path_context("read fab data", path)?;

    let headers = reader
        .headers()
        .with_path_context("read fab data header", path)?
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

    let mpn_idx = column("MPN")?;
    let order_idx = column("OrderNo")?;
    let x_idx = column("OffsetX")?;
    let y_idx = column("OffsetY")?;
    let rot_idx = column("OffsetRot")?;

    let mut data = HashMap::new();
    for result in reader.records() {
        let record = result.with_path_context("parse fab data", path)?;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let mpn = field(mpn_idx).to_string();
        let offset = PartOffset {
            order_no: field(order_idx).to_string(),
            x: parse_offset(field(x_idx), &mpn, "OffsetX")?,
            y: parse_offset(field(y_idx), &mpn, "OffsetY")?,
            rot: parse_offset(field(rot_idx), &mpn, "OffsetRot")?,
        };
        data.insert(mpn, offset);
    }
    Ok(data)
}

fn parse_offset(value: &str, mpn: &str, column: &str) -> Result<f64> {
    value.trim().parse().map_err(|_| {
        FabError::InvalidOffset {
            mpn: mpn.to_string(),
            column: column.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}
