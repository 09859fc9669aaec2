//! JLCPCB output generation
//!
//! Filters the raw BOM and PNP data against the part-offset database and
//! writes the fab-house CSV schemas. Rows that cannot be resolved are
//! dropped with a diagnostic; they never abort the run.

use crate::bom::BomRow;
use crate::error::{Result, ResultExt};
use crate::fabdata::PartOffset;
use crate::pnp::PnpRow;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

const BOM_HEADER: [&str; 4] = ["Comment", "Designator", "Footprint", "JLCPCB Part #"];
const PNP_HEADER: [&str; 5] = ["Designator", "Mid X", "Mid Y", "Layer", "Rotation"];

/// Per-generator row counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    pub written: usize,
    pub skipped: usize,
}

/// Write the JLCPCB BOM. Rows whose MPN has no offset record are skipped.
pub fn generate_bom(
    rows: &[BomRow],
    fab_data: &HashMap<String, PartOffset>,
    path: &Path,
) -> Result<GeneratorStats> {
    let mut writer = csv::Writer::from_path(path).with_path_context("write JLC BOM", path)?;
    writer
        .write_record(BOM_HEADER)
        .with_path_context("write JLC BOM", path)?;

    let mut stats = GeneratorStats::default();
    for row in rows {
        let Some(offset) = fab_data.get(&row.mpn) else {
            warn!("BOM: skip {}", row.mpn);
            stats.skipped += 1;
            continue;
        };

        let comment = format!("{} {}", row.value, row.description);
        writer
            .write_record([
                comment.as_str(),
                row.designator.as_str(),
                row.package.as_str(),
                offset.order_no.as_str(),
            ])
            .with_path_context("write JLC BOM", path)?;
        stats.written += 1;
    }

    writer.flush().with_path_context("write JLC BOM", path)?;
    Ok(stats)
}

/// Write the JLCPCB PNP file. Each placement is shifted by the part's
/// static offset; rows whose designator or MPN cannot be resolved are
/// skipped.
pub fn generate_pnp(
    rows: &[PnpRow],
    mpn_map: &HashMap<String, String>,
    fab_data: &HashMap<String, PartOffset>,
    path: &Path,
) -> Result<GeneratorStats> {
    let mut writer = csv::Writer::from_path(path).with_path_context("write JLC PNP", path)?;
    writer
        .write_record(PNP_HEADER)
        .with_path_context("write JLC PNP", path)?;

    let mut stats = GeneratorStats::default();
    for row in rows {
        let Some(mpn) = mpn_map.get(&row.designator) else {
            warn!("PNP: skip {}", row.designator);
            stats.skipped += 1;
            continue;
        };
        let Some(offset) = fab_data.get(mpn) else {
            warn!("PNP: skip {}", row.designator);
            stats.skipped += 1;
            continue;
        };

        // TODO: rotate the XY offset by the part rotation before adding it
        let mid_x = format!("{:.4}mm", row.x + offset.x);
        let mid_y = format!("{:.4}mm", row.y + offset.y);
        let rotation = format!("{:.0}", row.rotation + offset.rot);

        writer
            .write_record([
                row.designator.as_str(),
                mid_x.as_str(),
                mid_y.as_str(),
                row.side.as_str(),
                rotation.as_str(),
            ])
            .with_path_context("write JLC PNP", path)?;
        stats.written += 1;
    }

    writer.flush().with_path_context("write JLC PNP", path)?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pnp::Side;
    use std::fs;
    use tempfile::tempdir;

    fn bom_row(designator: &str, mpn: &str) -> BomRow {
        BomRow {
            designator: designator.to_string(),
            value: "10k".to_string(),
            description: "Resistor".to_string(),
            package: "0402".to_string(),
            mpn: mpn.to_string(),
        }
    }

    fn pnp_row(designator: &str, x: f64, y: f64, rotation: f64) -> PnpRow {
        PnpRow {
            designator: designator.to_string(),
            x,
            y,
            side: Side::Top,
            rotation,
        }
    }

    fn offsets() -> HashMap<String, PartOffset> {
        let mut data = HashMap::new();
        data.insert(
            "C25804".to_string(),
            PartOffset {
                order_no: "C25804".to_string(),
                x: 0.1,
                y: -0.2,
                rot: 90.0,
            },
        );
        data
    }

    #[test]
    fn test_generate_bom_relabels_and_skips() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("bom-jlc.csv");

        let rows = vec![bom_row("R1, R2", "C25804"), bom_row("U1", "UNKNOWN")];
        let stats = generate_bom(&rows, &offsets(), &path).expect("BOM generation should succeed");

        assert_eq!(stats, GeneratorStats { written: 1, skipped: 1 });

        let content = fs::read_to_string(&path).expect("Output should exist");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Comment,Designator,Footprint,JLCPCB Part #");
        assert_eq!(lines[1], "10k Resistor,\"R1, R2\",0402,C25804");
    }

    #[test]
    fn test_generate_pnp_applies_offsets() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("pnp-jlc.csv");

        let mut mpn_map = HashMap::new();
        mpn_map.insert("R1".to_string(), "C25804".to_string());

        let rows = vec![pnp_row("R1", 10.0, 5.0, 0.0)];
        let stats = generate_pnp(&rows, &mpn_map, &offsets(), &path)
            .expect("PNP generation should succeed");

        assert_eq!(stats, GeneratorStats { written: 1, skipped: 0 });

        let content = fs::read_to_string(&path).expect("Output should exist");
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Designator,Mid X,Mid Y,Layer,Rotation");
        assert_eq!(lines[1], "R1,10.1000mm,4.8000mm,Top,90");
    }

    #[test]
    fn test_generate_pnp_skips_unresolved() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("pnp-jlc.csv");

        let mut mpn_map = HashMap::new();
        mpn_map.insert("R1".to_string(), "C25804".to_string());
        mpn_map.insert("U1".to_string(), "UNKNOWN".to_string());

        // R9 has no MPN at all, U1 resolves to an MPN without offset data
        let rows = vec![
            pnp_row("R1", 1.0, 1.0, 0.0),
            pnp_row("R9", 2.0, 2.0, 0.0),
            pnp_row("U1", 3.0, 3.0, 0.0),
        ];
        let stats = generate_pnp(&rows, &mpn_map, &offsets(), &path)
            .expect("PNP generation should succeed");

        assert_eq!(stats, GeneratorStats { written: 1, skipped: 2 });

        let content = fs::read_to_string(&path).expect("Output should exist");
        assert!(!content.contains("R9"));
        assert!(!content.contains("U1"));
    }

    #[test]
    fn test_rotation_sum_is_not_normalized() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("pnp-jlc.csv");

        let mut mpn_map = HashMap::new();
        mpn_map.insert("R1".to_string(), "C25804".to_string());

        let rows = vec![pnp_row("R1", 0.0, 0.0, 315.0)];
        generate_pnp(&rows, &mpn_map, &offsets(), &path)
            .expect("PNP generation should succeed");

        let content = fs::read_to_string(&path).expect("Output should exist");
        // 315 + 90 stays 405, no modulo wraparound
        assert!(content.contains("R1,0.1000mm,-0.2000mm,Top,405"));
    }

    #[test]
    fn test_empty_fab_data_yields_header_only_outputs() {
        let dir = tempdir().expect("Failed to create temp dir");
        let bom_path = dir.path().join("bom-jlc.csv");
        let pnp_path = dir.path().join("pnp-jlc.csv");

        let fab_data = HashMap::new();
        let mut mpn_map = HashMap::new();
        mpn_map.insert("R1".to_string(), "C25804".to_string());

        let bom_stats = generate_bom(&[bom_row("R1", "C25804")], &fab_data, &bom_path)
            .expect("BOM generation should succeed");
        let pnp_stats = generate_pnp(
            &[pnp_row("R1", 1.0, 1.0, 0.0)],
            &mpn_map,
            &fab_data,
            &pnp_path,
        )
        .expect("PNP generation should succeed");

        assert_eq!(bom_stats, GeneratorStats { written: 0, skipped: 1 });
        assert_eq!(pnp_stats, GeneratorStats { written: 0, skipped: 1 });

        let bom = fs::read_to_string(&bom_path).expect("BOM output should exist");
        let pnp = fs::read_to_string(&pnp_path).expect("PNP output should exist");
        assert_eq!(bom.lines().count(), 1);
        assert_eq!(pnp.lines().count(), 1);
    }
}
