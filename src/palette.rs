//! Color → class id lookup over the fixed iSAID palette.
//!
//! The palette is an immutable table built once at startup and shared by
//! every encoder invocation. Lookup is a `HashMap` keyed by the packed
//! 24-bit RGB value, so resolving a pixel color is a single hash probe.

use std::collections::HashMap;

use crate::labels::{pack_rgb, Label, LABELS};

/// Immutable color → semantic class id table.
#[derive(Debug, Clone)]
pub struct Palette {
    color_to_id: HashMap<u32, i32>,
    labels: &'static [Label],
}

impl Palette {
    /// Build the palette from the iSAID label table.
    pub fn isaid() -> Self {
        Self::from_labels(&LABELS)
    }

    /// Build a palette from an explicit label slice.
    ///
    /// Color collisions are a specification error in the label table, so
    /// they are rejected up front rather than silently shadowed.
    pub fn from_labels(labels: &'static [Label]) -> Self {
        let mut color_to_id = HashMap::with_capacity(labels.len());
        for label in labels {
            let previous = color_to_id.insert(pack_rgb(label.color), label.id);
            assert!(
                previous.is_none(),
                "palette color {:?} is assigned to more than one label",
                label.color
            );
        }
        Self { color_to_id, labels }
    }

    /// Resolve an RGB triple to its class id, or `None` if the color is not
    /// part of the palette.
    pub fn id_of(&self, color: [u8; 3]) -> Option<i32> {
        self.color_to_id.get(&pack_rgb(color)).copied()
    }

    /// Number of entries in the palette.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the palette has no entries.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// The labels this palette was built from, in id order.
    pub fn labels(&self) -> &'static [Label] {
        self.labels
    }
}
