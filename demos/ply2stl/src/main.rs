#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
//! Convert a point cloud (.ply) file into a STL mesh

use std::path::PathBuf;

use bpa_rs::io::{load_ply, save_triangles};
use bpa_rs::{EngineConfig, reconstruct};
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Cli {
    #[arg(long = "input", short = 'i', help = "point cloud file")]
    input: PathBuf,
    #[clap(long = "radius", short = 'r')]
    radius: f32,
    #[clap(long="output", help="output mesh file mesh", short='o', default_value=None)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    info!("starting up");

    let args = Cli::parse();
    let output = args.output.clone().unwrap_or_else(|| {
        let mut path = args.input.clone();
        path.set_extension("stl");
        path
    });

    let samples = load_ply(&args.input)?;
    let report = reconstruct(&samples, EngineConfig::new(args.radius))?;
    info!(
        "reconstructed {} triangles, status={:?}",
        report.triangles.len(),
        report.status
    );
    save_triangles(&output, &samples, &report.triangles)?;

    Ok(())
}
