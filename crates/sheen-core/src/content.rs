//! Display items shown by the carousels
//!
//! The motion engine never looks inside an item; it only needs the count.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayItem {
    /// Image reference (path or URL)
    pub image: String,
    pub label: String,
}

impl DisplayItem {
    pub fn new(image: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            label: label.into(),
        }
    }
}

/// Repeat `items` `copies` times so a looping track never shows its seam
pub fn duplicated<T: Clone>(items: &[T], copies: usize) -> Vec<T> {
    let mut track = Vec::with_capacity(items.len() * copies);
    for _ in 0..copies {
        track.extend_from_slice(items);
    }
    track
}

pub(crate) fn default_services() -> Vec<DisplayItem> {
    [
        ("ceramic-coating", "Ceramic Coating"),
        ("paint-correction", "Paint Correction"),
        ("interior-detailing", "Interior Detailing"),
        ("exterior-detailing", "Exterior Detailing"),
        ("wheel-restoration", "Wheel Restoration"),
        ("paint-touchup", "Paint Touchup"),
        ("rock-chip-repair", "Rock Chip Repair"),
        ("paintless-dent-repair", "Paintless Dent Repair"),
    ]
    .into_iter()
    .map(|(id, label)| DisplayItem::new(format!("/services/{}.jpeg", id), label))
    .collect()
}

pub(crate) fn default_gallery() -> Vec<DisplayItem> {
    [
        ("/dent.jpg", "Dent repair before"),
        ("/dentafter.jpg", "Dent repair after"),
        ("/ceramiccoating.jpeg", "Ceramic coating"),
        ("/interior.jpeg", "Interior detail"),
        ("/wheels.jpeg", "Wheel restoration"),
        ("/procleanteam.jpeg", "The team"),
    ]
    .into_iter()
    .map(|(image, label)| DisplayItem::new(image, label))
    .collect()
}

pub(crate) fn default_reviews() -> Vec<DisplayItem> {
    [
        ("R", "Headlights look new again"),
        ("M", "Paint correction was flawless"),
        ("J", "Interior smells factory fresh"),
        ("A", "Booked online, done same day"),
        ("K", "Dent vanished without a trace"),
        ("S", "Ceramic coat still beading"),
    ]
    .into_iter()
    .map(|(initial, label)| DisplayItem::new(initial, label))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicated_repeats_in_order() {
        let track = duplicated(&[1, 2, 3], 2);
        assert_eq!(track, vec![1, 2, 3, 1, 2, 3]);
        assert!(duplicated::<u8>(&[], 3).is_empty());
    }

    #[test]
    fn test_default_lists() {
        assert_eq!(default_services().len(), 8);
        assert_eq!(default_reviews().len(), 6);
    }
}
