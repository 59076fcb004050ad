//! Panoptic label encoding for one image pair.
//!
//! The encoder turns a semantic-color map and an instance-color map of equal
//! size into a single-channel label grid where each pixel holds
//! `semantic_id * 1000 + instance_id`. It is pure and stateless per call:
//! instance ids are assigned fresh for every image pair and are never shared
//! across pairs, so callers may encode many pairs concurrently.

use std::collections::{BTreeSet, HashMap};

use image::RgbImage;
use ndarray::Array2;

use crate::error::ConvertError;
use crate::labels::pack_rgb;
use crate::palette::Palette;

/// Multiplier separating the semantic id from the instance id in a label.
pub const SEMANTIC_MULTIPLIER: i32 = 1000;

/// Largest instance id that fits below [`SEMANTIC_MULTIPLIER`].
pub const MAX_INSTANCES: usize = (SEMANTIC_MULTIPLIER - 1) as usize;

/// Packed value of the background / no-instance color `(0,0,0)`.
const BACKGROUND: u32 = 0;

/// Encodes one (semantic map, instance map) pair into a panoptic label grid.
#[derive(Debug, Clone)]
pub struct PanopticEncoder<'a> {
    palette: &'a Palette,
    unknown_color_id: Option<i32>,
}

impl<'a> PanopticEncoder<'a> {
    /// Create an encoder over the given palette. Unknown semantic colors
    /// fail the pair with [`ConvertError::UnknownColor`].
    pub fn new(palette: &'a Palette) -> Self {
        Self {
            palette,
            unknown_color_id: None,
        }
    }

    /// Lenient mode: map semantic colors missing from the palette to the
    /// given class id instead of failing.
    pub fn with_unknown_color_id(mut self, id: i32) -> Self {
        self.unknown_color_id = Some(id);
        self
    }

    /// Encode one image pair into a `(height, width)` label grid.
    ///
    /// For every pixel, `label = semantic_id * 1000 + instance_id`, where
    /// the semantic id comes from the palette and the instance id from
    /// [`assign_instance_ids`] over the instance map.
    pub fn encode(
        &self,
        semantic: &RgbImage,
        instance: &RgbImage,
    ) -> Result<Array2<i32>, ConvertError> {
        let (width, height) = semantic.dimensions();
        if instance.dimensions() != (width, height) {
            return Err(ConvertError::DimensionMismatch {
                semantic_width: width,
                semantic_height: height,
                instance_width: instance.width(),
                instance_height: instance.height(),
            });
        }

        let instance_ids = assign_instance_ids(instance)?;

        let mut labels = Array2::<i32>::zeros((height as usize, width as usize));
        for y in 0..height {
            for x in 0..width {
                let semantic_id = self.resolve_semantic(semantic.get_pixel(x, y).0, x, y)?;
                let key = pack_rgb(instance.get_pixel(x, y).0);
                // Every color in the map was seen during assignment.
                let instance_id = instance_ids[&key];
                labels[[y as usize, x as usize]] =
                    semantic_id * SEMANTIC_MULTIPLIER + instance_id;
            }
        }

        Ok(labels)
    }

    fn resolve_semantic(&self, color: [u8; 3], x: u32, y: u32) -> Result<i32, ConvertError> {
        match self.palette.id_of(color) {
            Some(id) => Ok(id),
            None => self
                .unknown_color_id
                .ok_or(ConvertError::UnknownColor { color, x, y }),
        }
    }
}

/// Assign instance ids to the distinct colors of an instance map.
///
/// The background color `(0,0,0)` always gets id 0 (whether or not it
/// occurs in the image); every other distinct color gets ids 1, 2, 3, … in
/// ascending order of its packed 24-bit value, which is the same order as
/// the fixed-width `rrggbb` hex representation. The ordering makes the
/// assignment reproducible regardless of pixel traversal order.
pub fn assign_instance_ids(instance: &RgbImage) -> Result<HashMap<u32, i32>, ConvertError> {
    let mut colors: BTreeSet<u32> = instance.pixels().map(|p| pack_rgb(p.0)).collect();
    colors.remove(&BACKGROUND);

    if colors.len() > MAX_INSTANCES {
        return Err(ConvertError::InstanceOverflow {
            count: colors.len(),
            max: MAX_INSTANCES,
        });
    }

    let mut ids = HashMap::with_capacity(colors.len() + 1);
    ids.insert(BACKGROUND, 0);
    for (index, color) in colors.into_iter().enumerate() {
        ids.insert(color, (index + 1) as i32);
    }
    Ok(ids)
}

/// Whether both maps contain only zero-valued pixels (pure background).
///
/// Used by the `--noempty` filter to skip ground truth with no labeled
/// content before any encoding work happens.
pub fn is_empty_pair(semantic: &RgbImage, instance: &RgbImage) -> bool {
    semantic.as_raw().iter().all(|&byte| byte == 0)
        && instance.as_raw().iter().all(|&byte| byte == 0)
}

/// Split a combined label back into `(semantic_id, instance_id)`.
pub fn split_label(label: i32) -> (i32, i32) {
    (label / SEMANTIC_MULTIPLIER, label % SEMANTIC_MULTIPLIER)
}
