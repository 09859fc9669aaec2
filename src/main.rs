//! fabgen - Export manufacturing data for the flexion board
//!
//! A single-pass export tool: schematic PDF, 3D render, Gerber archive,
//! raw BOM/PNP data, and the JLCPCB assembly files derived from them.

use fabgen::{config::Config, error::Result, pipeline::Pipeline};
use tracing::{error, info};

fn main() -> Result<()> {
    // Parse configuration and initialize logging
    let config = Config::from_args().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    info!("Starting export pipeline...");

    let mut pipeline = Pipeline::new(config);

    match pipeline.run() {
        Ok(()) => {
            let stats = pipeline.stats();
            info!("Export completed successfully");

            println!(
                "Export completed: {} Gerber layers, {} BOM rows, {} PNP rows ({} skipped)",
                stats.gerber_files,
                stats.bom.written,
                stats.pnp.written,
                stats.bom.skipped + stats.pnp.skipped
            );
            Ok(())
        }
        Err(e) => {
            error!("Export failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
