//! GeoPhoto CLI - locate photos from their EXIF GPS tags
//!
//! Prints the coordinate and map link of each image given on the command
//! line. The web server lives in the `geophoto_server` binary.

use clap::Parser;
use eyre::Result;
use std::path::PathBuf;

use geophoto::inspect::{inspect, Report};
use geophoto::utils::init_logging;
use geophoto::GpsExtractor;

/// Locate photos from their embedded GPS metadata
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Image files to inspect
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// Also print every decoded EXIF tag
    #[arg(short, long, action)]
    dump: bool,
    /// Print one JSON object per image
    #[arg(short, long, action)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging("warn");
    let cli = Cli::parse();
    let extractor = GpsExtractor::default();
    let mut failures = 0usize;

    for path in &cli.paths {
        let report = inspect(&extractor, path, cli.dump);
        if report.error.is_some() {
            failures += 1;
        }

        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_text(&report);
        }
    }

    if failures > 0 {
        eyre::bail!("{} of {} files could not be read", failures, cli.paths.len());
    }
    Ok(())
}

fn print_text(report: &Report) {
    match (&report.error, &report.coordinate, &report.map_url) {
        (Some(error), _, _) => println!("{}\terror: {}", report.path, error),
        (None, Some(coord), Some(url)) => println!("{}\t{}\t{}", report.path, coord, url),
        _ => println!("{}\tno GPS data", report.path),
    }

    if let Some(exif) = &report.exif {
        for (tag, value) in exif {
            println!("    {:<28} {}", tag, value);
        }
    }
}
