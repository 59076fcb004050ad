//! Error types for ground-truth conversion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting one image pair.
///
/// Every variant is fatal for its own pair only; the batch layer logs the
/// error and continues with the remaining pairs.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A semantic-map pixel color has no palette entry
    #[error("semantic color {color:?} at pixel ({x}, {y}) is not in the palette")]
    UnknownColor {
        /// The offending RGB triple
        color: [u8; 3],
        /// Pixel column
        x: u32,
        /// Pixel row
        y: u32,
    },

    /// Semantic and instance maps differ in size
    #[error(
        "dimension mismatch: semantic map is {semantic_width}x{semantic_height}, \
         instance map is {instance_width}x{instance_height}"
    )]
    DimensionMismatch {
        /// Semantic map width in pixels
        semantic_width: u32,
        /// Semantic map height in pixels
        semantic_height: u32,
        /// Instance map width in pixels
        instance_width: u32,
        /// Instance map height in pixels
        instance_height: u32,
    },

    /// One of the two expected input files is absent
    #[error("missing input file: {path:?}")]
    MissingFile {
        /// Path where the file was expected
        path: PathBuf,
    },

    /// More distinct instance colors than the encoding can hold
    #[error("{count} distinct instances exceed the {max} encodable per image")]
    InstanceOverflow {
        /// Number of distinct non-background instance colors found
        count: usize,
        /// Largest instance id the encoding supports
        max: usize,
    },

    /// A label value outside what the chosen output format can store
    #[error("label {value} does not fit in the {format} output format")]
    LabelOutOfRange {
        /// The offending label value
        value: i32,
        /// Name of the output format
        format: &'static str,
    },

    /// Image decode or encode error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// NumPy serialization error
    #[error("npy error: {0}")]
    Npy(#[from] ndarray_npy::WriteNpyError),

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
