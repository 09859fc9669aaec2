//! Raw BOM parsing and designator resolution
//!
//! The raw BOM carries one row per part group with a comma-separated
//! designator list. The resolver explodes those groups into a
//! designator → MPN map consulted during PNP adjustment.

use crate::error::{Result, ResultExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// One row of the raw BOM export
#[derive(Debug, Clone, Deserialize)]
pub struct BomRow {
    /// Comma-separated designator group, e.g. "R1, R2"
    #[serde(rename = "Designator")]
    pub designator: String,

    #[serde(rename = "Value")]
    pub value: String,

    #[serde(rename = "Description")]
    pub description: String,

    #[serde(rename = "Package")]
    pub package: String,

    #[serde(rename = "MPN")]
    pub mpn: String,
}

/// Read the raw BOM CSV
pub fn read_bom(path: &Path) -> Result<Vec<BomRow>> {
    let mut reader = csv::Reader::from_path(path).with_path_context("read BOM", path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: BomRow = result.with_path_context("parse BOM", path)?;
        rows.push(row);
    }
    Ok(rows)
}

/// Build the designator → MPN map from the raw BOM rows.
/// Grouped designators are exploded; the last occurrence wins if a
/// designator repeats. Designators are not validated.
pub fn mpn_map(rows: &[BomRow]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for row in rows {
        for designator in row.designator.split(", ") {
            map.insert(designator.to_string(), row.mpn.clone());
        }
    }
    map
}
