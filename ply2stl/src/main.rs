#![deny(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::complexity)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::perf)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![allow(clippy::many_single_char_names)]
#![doc = include_str!("../../README.md")]

use std::path::PathBuf;

use bpa_rs::io::{load_ply, save_triangles_ascii};
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
    #[clap(long = "output", help = "output mesh file", short = 'o', default_value = None)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Cli::parse();
    info!("input={:?} radius={}", args.input, args.radius);

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
    save_triangles_ascii(&output, &samples, &report.triangles)?;

    Ok(())
}
