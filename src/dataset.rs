//! Sample discovery and image file I/O.
//!
//! The iSAID ground-truth layout keeps three files per sample in one
//! directory: the aerial image itself (`<sample>.png`), the semantic-color
//! map (`<sample>_instance_color_RGB.png`) and the instance-color map
//! (`<sample>_instance_id_RGB.png`). Despite its name, the
//! `_instance_color_RGB` file carries the *semantic* colors; the naming
//! comes from the upstream dataset and is kept for compatibility.
//!
//! Output files are written atomically (temp file + rename) so that a
//! failed pair never leaves a partial label map behind.

use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, ImageFormat, Luma, RgbImage};
use ndarray::Array2;
use ndarray_npy::WriteNpyExt;

use crate::error::ConvertError;

/// Filename suffix of the semantic-color map.
pub const SEMANTIC_SUFFIX: &str = "_instance_color_RGB.png";

/// Filename suffix of the instance-color map.
pub const INSTANCE_SUFFIX: &str = "_instance_id_RGB.png";

/// File format for the converted label map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// 16-bit grayscale PNG (the upstream toolchain's format).
    Png,
    /// NumPy `.npy` with a 2-D int32 array.
    Npy,
}

impl OutputFormat {
    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Npy => "npy",
        }
    }
}

/// One sample's pair of ground-truth input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    /// Sample name, e.g. "P0003".
    pub name: String,
    /// Path to the semantic-color map.
    pub semantic_path: PathBuf,
    /// Path to the instance-color map.
    pub instance_path: PathBuf,
}

impl SamplePair {
    /// Build the expected file pair for a sample in the given directory.
    pub fn for_sample(input_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            semantic_path: input_dir.join(format!("{name}{SEMANTIC_SUFFIX}")),
            instance_path: input_dir.join(format!("{name}{INSTANCE_SUFFIX}")),
        }
    }

    /// Name of the converted output file.
    ///
    /// Matches the instance map's filename, with the extension swapped to
    /// the output format's.
    pub fn output_file_name(&self, format: OutputFormat) -> String {
        format!(
            "{}_instance_id_RGB.{}",
            self.name,
            format.extension()
        )
    }
}

/// Find all samples in an input directory.
///
/// Every file whose name does not contain `instance` is treated as a sample
/// image; its stem (up to the first dot) names the sample. Results are
/// sorted by name so batch ordering is stable across runs.
pub fn discover_samples(input_dir: &Path) -> Result<Vec<SamplePair>, ConvertError> {
    let mut names = BTreeSet::new();
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };
        if file_name.contains("instance") {
            continue;
        }
        if let Some((stem, _)) = file_name.split_once('.') {
            names.insert(stem.to_string());
        }
    }

    Ok(names
        .into_iter()
        .map(|name| SamplePair::for_sample(input_dir, &name))
        .collect())
}

/// Load both input images of a pair as RGB.
pub fn load_pair(pair: &SamplePair) -> Result<(RgbImage, RgbImage), ConvertError> {
    for path in [&pair.semantic_path, &pair.instance_path] {
        if !path.is_file() {
            return Err(ConvertError::MissingFile { path: path.clone() });
        }
    }
    let semantic = image::open(&pair.semantic_path)?.to_rgb8();
    let instance = image::open(&pair.instance_path)?.to_rgb8();
    Ok((semantic, instance))
}

/// Persist a label grid to disk in the requested format.
///
/// The grid is written to a sibling temp file first and renamed into place,
/// so the destination either holds a complete label map or nothing.
pub fn save_label_map(
    labels: &Array2<i32>,
    path: &Path,
    format: OutputFormat,
) -> Result<(), ConvertError> {
    let temp = temp_path(path);
    let result = match format {
        OutputFormat::Png => write_png(labels, &temp),
        OutputFormat::Npy => write_npy(labels, &temp),
    };
    if let Err(err) = result {
        let _ = fs::remove_file(&temp);
        return Err(err);
    }
    fs::rename(&temp, path)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_png(labels: &Array2<i32>, path: &Path) -> Result<(), ConvertError> {
    let (height, width) = labels.dim();
    let mut out = ImageBuffer::<Luma<u16>, Vec<u16>>::new(width as u32, height as u32);
    for ((y, x), &value) in labels.indexed_iter() {
        let value = u16::try_from(value).map_err(|_| ConvertError::LabelOutOfRange {
            value,
            format: "16-bit PNG",
        })?;
        out.put_pixel(x as u32, y as u32, Luma([value]));
    }
    out.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn write_npy(labels: &Array2<i32>, path: &Path) -> Result<(), ConvertError> {
    let writer = BufWriter::new(File::create(path)?);
    labels.write_npy(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::env;

    /// Create a unique scratch directory for a test.
    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!(
            "isaid-panoptic-test-{}-{}",
            tag,
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_pair_paths() {
        let pair = SamplePair::for_sample(Path::new("images"), "P0042");
        assert_eq!(
            pair.semantic_path,
            Path::new("images/P0042_instance_color_RGB.png")
        );
        assert_eq!(
            pair.instance_path,
            Path::new("images/P0042_instance_id_RGB.png")
        );
    }

    #[test]
    fn test_output_file_name() {
        let pair = SamplePair::for_sample(Path::new("images"), "P0042");
        assert_eq!(
            pair.output_file_name(OutputFormat::Png),
            "P0042_instance_id_RGB.png"
        );
        assert_eq!(
            pair.output_file_name(OutputFormat::Npy),
            "P0042_instance_id_RGB.npy"
        );
    }

    #[test]
    fn test_discover_skips_instance_files() {
        let dir = scratch_dir("discover");
        for name in [
            "P0001.png",
            "P0001_instance_color_RGB.png",
            "P0001_instance_id_RGB.png",
            "P0002.png",
        ] {
            fs::write(dir.join(name), b"stub").unwrap();
        }

        let pairs = discover_samples(&dir).unwrap();
        let names: Vec<_> = pairs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["P0001", "P0002"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_pair_reports_missing_file() {
        let dir = scratch_dir("missing");
        let pair = SamplePair::for_sample(&dir, "P0001");

        match load_pair(&pair) {
            Err(ConvertError::MissingFile { path }) => {
                assert_eq!(path, pair.semantic_path);
            }
            other => panic!("expected MissingFile, got {:?}", other.is_ok()),
        }

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_png_roundtrip() {
        let dir = scratch_dir("png");
        let labels = array![[0, 1000, 1001], [15999, 2003, 0]];
        let path = dir.join("out.png");

        save_label_map(&labels, &path, OutputFormat::Png).unwrap();
        assert!(path.is_file());
        assert!(!temp_path(&path).exists());

        let reloaded = image::open(&path).unwrap().to_luma16();
        assert_eq!(reloaded.dimensions(), (3, 2));
        assert_eq!(reloaded.get_pixel(1, 0).0[0], 1000);
        assert_eq!(reloaded.get_pixel(0, 1).0[0], 15999);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_png_rejects_out_of_range_labels() {
        let dir = scratch_dir("range");
        let labels = array![[-1]];
        let path = dir.join("out.png");

        match save_label_map(&labels, &path, OutputFormat::Png) {
            Err(ConvertError::LabelOutOfRange { value, .. }) => assert_eq!(value, -1),
            other => panic!("expected LabelOutOfRange, got {:?}", other.is_ok()),
        }
        assert!(!path.exists());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_npy_output_is_written() {
        let dir = scratch_dir("npy");
        let labels = array![[1000, 1001], [0, 15999]];
        let path = dir.join("out.npy");

        save_label_map(&labels, &path, OutputFormat::Npy).unwrap();
        assert!(path.is_file());

        // \x93NUMPY magic
        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..6], b"\x93NUMPY");

        fs::remove_dir_all(&dir).unwrap();
    }
}
