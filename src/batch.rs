//! Batch conversion with per-pair failure isolation.
//!
//! Each image pair is an independent unit of work: pairs are dispatched
//! across a rayon worker pool, a failing pair is logged and counted but
//! never aborts its siblings, and the final tally is returned to the caller
//! for exit-code handling.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{info, warn};
use rayon::prelude::*;

use crate::dataset::{self, OutputFormat, SamplePair};
use crate::encoder::{self, PanopticEncoder};
use crate::error::ConvertError;
use crate::palette::Palette;

/// Conversion settings shared by every pair in a batch.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Skip pairs whose ground truth is pure background (`--noempty`).
    pub skip_empty: bool,
    /// Lenient palette mode: map unknown semantic colors to this id.
    pub unknown_color_id: Option<i32>,
    /// Output file format.
    pub format: OutputFormat,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            skip_empty: false,
            unknown_color_id: None,
            format: OutputFormat::Png,
        }
    }
}

/// Outcome of converting a single pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    /// The label map was written.
    Converted,
    /// The pair was pure background and `--noempty` skipped it.
    SkippedEmpty,
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Pairs converted and written.
    pub converted: usize,
    /// Pairs skipped by the empty-ground-truth filter.
    pub skipped: usize,
    /// Pairs that failed; their errors were logged.
    pub failed: usize,
}

/// Convert one sample pair end to end.
///
/// Loads both inputs, applies the empty filter if enabled, encodes, and
/// writes the label map into `output_dir`.
pub fn convert_pair(
    pair: &SamplePair,
    palette: &Palette,
    output_dir: &Path,
    options: &BatchOptions,
) -> Result<PairOutcome, ConvertError> {
    let (semantic, instance) = dataset::load_pair(pair)?;

    if options.skip_empty && encoder::is_empty_pair(&semantic, &instance) {
        return Ok(PairOutcome::SkippedEmpty);
    }

    let mut panoptic = PanopticEncoder::new(palette);
    if let Some(id) = options.unknown_color_id {
        panoptic = panoptic.with_unknown_color_id(id);
    }
    let labels = panoptic.encode(&semantic, &instance)?;

    let output_path = output_dir.join(pair.output_file_name(options.format));
    dataset::save_label_map(&labels, &output_path, options.format)?;
    Ok(PairOutcome::Converted)
}

/// Convert all pairs in parallel and return the final tally.
pub fn convert_all(
    pairs: &[SamplePair],
    palette: &Palette,
    output_dir: &Path,
    options: &BatchOptions,
) -> BatchStats {
    let converted = AtomicUsize::new(0);
    let skipped = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    pairs.par_iter().for_each(|pair| {
        match convert_pair(pair, palette, output_dir, options) {
            Ok(PairOutcome::Converted) => {
                converted.fetch_add(1, Ordering::Relaxed);
            }
            Ok(PairOutcome::SkippedEmpty) => {
                info!("ignored {}: ground truth is pure background", pair.name);
                skipped.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                warn!("failed to convert {}: {}", pair.name, err);
                failed.fetch_add(1, Ordering::Relaxed);
            }
        }
    });

    BatchStats {
        converted: converted.into_inner(),
        skipped: skipped.into_inner(),
        failed: failed.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!(
            "isaid-panoptic-batch-{}-{}",
            tag,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Write a sample's three files: image stub, semantic map, instance map.
    fn write_sample(dir: &Path, name: &str, semantic: &RgbImage, instance: &RgbImage) {
        fs::write(dir.join(format!("{name}.png")), b"stub").unwrap();
        semantic
            .save(dir.join(format!("{name}_instance_color_RGB.png")))
            .unwrap();
        instance
            .save(dir.join(format!("{name}_instance_id_RGB.png")))
            .unwrap();
    }

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        RgbImage::from_pixel(width, height, Rgb(color))
    }

    #[test]
    fn test_convert_pair_writes_label_map() {
        let dir = scratch_dir("pair");
        let out_dir = dir.join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let semantic = solid(4, 2, [0, 0, 63]); // ship
        let mut instance = solid(4, 2, [0, 0, 0]);
        instance.put_pixel(0, 0, Rgb([10, 10, 10]));
        write_sample(&dir, "P0001", &semantic, &instance);

        let palette = Palette::isaid();
        let pair = SamplePair::for_sample(&dir, "P0001");
        let outcome =
            convert_pair(&pair, &palette, &out_dir, &BatchOptions::default()).unwrap();
        assert_eq!(outcome, PairOutcome::Converted);

        let written = image::open(out_dir.join("P0001_instance_id_RGB.png"))
            .unwrap()
            .to_luma16();
        assert_eq!(written.get_pixel(0, 0).0[0], 1001);
        assert_eq!(written.get_pixel(1, 0).0[0], 1000);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_empty_pair_is_skipped_without_output() {
        let dir = scratch_dir("empty");
        let out_dir = dir.join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let black = solid(3, 3, [0, 0, 0]);
        write_sample(&dir, "P0001", &black, &black);

        let palette = Palette::isaid();
        let pair = SamplePair::for_sample(&dir, "P0001");
        let options = BatchOptions {
            skip_empty: true,
            ..BatchOptions::default()
        };

        let outcome = convert_pair(&pair, &palette, &out_dir, &options).unwrap();
        assert_eq!(outcome, PairOutcome::SkippedEmpty);
        assert!(!out_dir.join("P0001_instance_id_RGB.png").exists());

        // Without the filter the all-background pair still converts.
        let outcome =
            convert_pair(&pair, &palette, &out_dir, &BatchOptions::default()).unwrap();
        assert_eq!(outcome, PairOutcome::Converted);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_batch_isolates_failing_pairs() {
        let dir = scratch_dir("isolate");
        let out_dir = dir.join("out");
        fs::create_dir_all(&out_dir).unwrap();

        // P0001 is valid; P0002 has mismatched dimensions; P0003 has an
        // unknown semantic color.
        let black = solid(4, 4, [0, 0, 0]);
        write_sample(&dir, "P0001", &solid(4, 4, [0, 0, 63]), &black);
        write_sample(&dir, "P0002", &solid(4, 4, [0, 0, 63]), &solid(4, 5, [0, 0, 0]));
        write_sample(&dir, "P0003", &solid(4, 4, [9, 9, 9]), &black);

        let palette = Palette::isaid();
        let pairs = dataset::discover_samples(&dir).unwrap();
        assert_eq!(pairs.len(), 3);

        let stats = convert_all(&pairs, &palette, &out_dir, &BatchOptions::default());
        assert_eq!(stats.converted, 1);
        assert_eq!(stats.skipped, 0);
        assert_eq!(stats.failed, 2);

        assert!(out_dir.join("P0001_instance_id_RGB.png").exists());
        assert!(!out_dir.join("P0002_instance_id_RGB.png").exists());
        assert!(!out_dir.join("P0003_instance_id_RGB.png").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
