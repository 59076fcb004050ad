//! iSAID panoptic ground-truth conversion.
//!
//! Converts the iSAID aerial dataset's RGB-encoded segmentation ground
//! truth (a semantic-color map plus an instance-color map per sample) into
//! single-channel panoptic label maps where each pixel holds
//! `semantic_class_id * 1000 + instance_id`.
//!
//! The crate is split into a pure core and thin plumbing around it:
//!
//! - [`labels`] / [`palette`]: the fixed 16-class iSAID palette and the
//!   color → class id lookup built from it
//! - [`encoder`]: instance id assignment and panoptic combination for one
//!   image pair
//! - [`dataset`]: sample discovery and image file I/O
//! - [`batch`]: parallel dispatch over pairs with per-pair failure isolation

pub mod batch;
pub mod dataset;
pub mod encoder;
pub mod error;
pub mod labels;
pub mod palette;

pub use encoder::PanopticEncoder;
pub use error::ConvertError;
pub use palette::Palette;
