//! CLI for converting iSAID RGB ground truth to panoptic id maps.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};

use isaid_panoptic::batch::{self, BatchOptions};
use isaid_panoptic::dataset::{self, OutputFormat};
use isaid_panoptic::Palette;

#[derive(Parser, Debug)]
#[command(name = "isaid-panoptic", version)]
#[command(about = "Convert iSAID RGB segmentation ground truth to panoptic id maps")]
struct Args {
    /// Directory containing the iSAID ground-truth images
    #[arg(long, default_value = "images")]
    inputs: PathBuf,

    /// Directory for the converted label maps (created if absent)
    #[arg(long, default_value = "iSAID_id")]
    outputs: PathBuf,

    /// Skip pairs whose ground truth is pure background
    #[arg(long)]
    noempty: bool,

    /// Output file format
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Map semantic colors missing from the palette to this class id
    /// instead of failing the pair
    #[arg(long, value_parser = clap::value_parser!(i32).range(0..=15))]
    unknown_color: Option<i32>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    /// 16-bit grayscale PNG
    Png,
    /// NumPy int32 array
    Npy,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => OutputFormat::Png,
            FormatArg::Npy => OutputFormat::Npy,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    fs::create_dir_all(&args.outputs)
        .with_context(|| format!("creating output directory {:?}", args.outputs))?;

    let pairs = dataset::discover_samples(&args.inputs)
        .with_context(|| format!("listing input directory {:?}", args.inputs))?;
    if pairs.is_empty() {
        warn!("no samples found in {:?}", args.inputs);
        return Ok(());
    }

    let palette = Palette::isaid();
    let options = BatchOptions {
        skip_empty: args.noempty,
        unknown_color_id: args.unknown_color,
        format: args.format.into(),
    };

    info!(
        "converting {} image pairs from {:?} to {:?}",
        pairs.len(),
        args.inputs,
        args.outputs
    );
    let stats = batch::convert_all(&pairs, &palette, &args.outputs, &options);
    info!(
        "done: {} converted, {} skipped, {} failed",
        stats.converted, stats.skipped, stats.failed
    );

    if stats.failed > 0 {
        bail!("{} image pairs failed to convert", stats.failed);
    }
    Ok(())
}
