//! geo-reader - resolve IP addresses against a MaxMind database
//!
//! This is the composition root: it wires the MaxMind adapter into the
//! locate service and prints one JSON object per address.
//!
//! Addresses come from the command line, or from stdin (one per line) when
//! no arguments are given.

use geo_reader::{load_config, GeoLookup, GeoReader, LocateService};
use std::io::{self, BufRead};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging; stdout carries the results
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();

    let reader: Arc<dyn GeoLookup> = Arc::new(GeoReader::open(&cfg.db_path)?);
    let service = LocateService::new(reader);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut out = io::stdout().lock();

    let report = if args.is_empty() {
        service.run(io::stdin().lock().lines(), &mut out)?
    } else {
        service.run(args.into_iter().map(Ok), &mut out)?
    };

    if report.skipped > 0 {
        tracing::warn!(
            "{} of {} addresses skipped",
            report.skipped,
            report.written + report.skipped
        );
    }
    Ok(())
}
