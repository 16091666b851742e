//! Offline level compiler.
//!
//! ```bash
//! cargo run --bin lvlgen -- --in castle.obj --out castle.json --scale 64
//! ```

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use wallcast::compiler::pipeline;

/// Generate levels for the software renderer from Wavefront OBJ files.
#[derive(Parser)]
#[command(name = "lvlgen", version)]
struct Args {
    /// OBJ file to read the model from (stdin by default)
    #[arg(long = "in")]
    input: Option<PathBuf>,

    /// File to write the JSON level to (stdout by default)
    #[arg(long = "out")]
    output: Option<PathBuf>,

    /// Scaling factor for the level
    #[arg(long, default_value_t = 64.0)]
    scale: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let input: Box<dyn Read> = match &args.input {
        Some(path) => Box::new(
            File::open(path)
                .with_context(|| format!("failed to open input file {}", path.display()))?,
        ),
        None => Box::new(io::stdin()),
    };
    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    pipeline::run(input, output, args.scale)
}
