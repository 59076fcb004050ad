//! The iSAID label table.
//!
//! This is the external palette specification for the iSAID aerial-imagery
//! dataset: 16 classes with fixed ids and RGB colors. The ids and names are
//! expected verbatim by the evaluation tooling, so this table must never be
//! reordered or renumbered.

/// A label and its metadata, mirroring the Cityscapes-style label tuple
/// used by the iSAID toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    /// Unique class name, e.g. "ship".
    pub name: &'static str,
    /// Class id as it appears in ground-truth label maps. Fixed by the
    /// evaluation server; do not modify.
    pub id: i32,
    /// Id used when training; may collapse classes, max 255.
    pub train_id: u8,
    /// Name of the category the label belongs to.
    pub category: &'static str,
    /// Id of that category, for category-level ground truth.
    pub category_id: u8,
    /// Whether the label distinguishes individual object instances.
    pub has_instances: bool,
    /// Whether pixels of this class are ignored during evaluation.
    pub ignore_in_eval: bool,
    /// The RGB color encoding this class in semantic-color images.
    pub color: [u8; 3],
}

/// All iSAID labels, in id order.
pub const LABELS: [Label; 16] = [
    Label { name: "background",         id:  0, train_id: 15, category: "void",      category_id: 0, has_instances: false, ignore_in_eval: false, color: [0,   0,   0] },
    Label { name: "ship",               id:  1, train_id:  0, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0,   0,  63] },
    Label { name: "storage_tank",       id:  2, train_id:  1, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0,  63,  63] },
    Label { name: "baseball_diamond",   id:  3, train_id:  2, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0,  63,   0] },
    Label { name: "tennis_court",       id:  4, train_id:  3, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0,  63, 127] },
    Label { name: "basketball_court",   id:  5, train_id:  4, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0,  63, 191] },
    Label { name: "Ground_Track_Field", id:  6, train_id:  5, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0,  63, 255] },
    Label { name: "Bridge",             id:  7, train_id:  6, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0, 127,  63] },
    Label { name: "Large_Vehicle",      id:  8, train_id:  7, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0, 127, 127] },
    Label { name: "Small_Vehicle",      id:  9, train_id:  8, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0,   0, 127] },
    Label { name: "Helicopter",         id: 10, train_id:  9, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0,   0, 191] },
    Label { name: "Swimming_pool",      id: 11, train_id: 10, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0,   0, 255] },
    Label { name: "Roundabout",         id: 12, train_id: 11, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0, 191, 127] },
    Label { name: "Soccer_ball_field",  id: 13, train_id: 12, category: "land",      category_id: 2, has_instances: true,  ignore_in_eval: false, color: [0, 127, 191] },
    Label { name: "plane",              id: 14, train_id: 13, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0, 127, 255] },
    Label { name: "Harbor",             id: 15, train_id: 14, category: "transport", category_id: 1, has_instances: true,  ignore_in_eval: false, color: [0, 100, 155] },
];

/// Pack an RGB triple into a single 24-bit key (`0xRRGGBB`).
///
/// Packed values sort in the same order as the fixed-width `rrggbb` hex
/// string of the color, which is the canonical instance ordering.
pub fn pack_rgb(color: [u8; 3]) -> u32 {
    (u32::from(color[0]) << 16) | (u32::from(color[1]) << 8) | u32::from(color[2])
}

/// Unpack a 24-bit key back into an RGB triple.
pub fn unpack_rgb(key: u32) -> [u8; 3] {
    [(key >> 16) as u8, (key >> 8) as u8, key as u8]
}
