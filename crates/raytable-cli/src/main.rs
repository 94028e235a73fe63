use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use raytable_core::{build_xy_table, IntrinsicParameters, XyTable};

/// Generate a per-pixel ray lookup table from a camera calibration.
#[derive(Debug, Parser)]
#[command(author, version, about = "Per-pixel ray lookup table generator")]
struct Args {
    /// Path to a JSON file containing the camera IntrinsicParameters.
    #[arg(long)]
    calib: String,

    /// Optional path for the generated table as JSON.
    #[arg(long)]
    output: Option<String>,
}

fn load_calib(path: &Path) -> Result<IntrinsicParameters> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading calibration file {}", path.display()))?;
    let calib = serde_json::from_str(&data)
        .with_context(|| format!("parsing calibration file {}", path.display()))?;
    Ok(calib)
}

fn build_table_from_file(calib_path: &str) -> Result<XyTable> {
    let calib = load_calib(Path::new(calib_path))?;
    let table = build_xy_table(&calib)?;
    Ok(table)
}

fn run(args: &Args) -> Result<()> {
    let table = build_table_from_file(&args.calib)?;

    println!(
        "built {}x{} ray table ({} entries)",
        table.width,
        table.height,
        table.data.len()
    );

    if let Some(out) = &args.output {
        let json = serde_json::to_string(&table)?;
        fs::write(out, json).with_context(|| format!("writing table to {out}"))?;
    }

    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run(&Args::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
