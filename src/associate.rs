//! Association Engine.
//!
//! Spatially ties each face to a person box and a helmet-state box. Every
//! selection is "first element of the ordered sequence satisfying the
//! predicate": inputs are scanned in detector-return order and never
//! re-sorted by confidence or area. This ordering policy governs
//! reproducibility of output for identical detector results.

use crate::detect::{FrameDetections, HelmetState};
use crate::geometry::{has_overlap, BoundingBox};

/// Result of associating one face with the frame's person and helmet boxes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Association {
    /// First person box overlapping the face, in list order.
    pub person: Option<BoundingBox>,
    /// First helmet-state box overlapping that person box or the face box,
    /// in list order. `None` whenever `person` is `None`.
    pub helmet: Option<(BoundingBox, HelmetState)>,
}

impl Association {
    pub fn helmet_state(&self) -> Option<HelmetState> {
        self.helmet.map(|(_, state)| state)
    }
}

/// Associate one face box with the frame's detections.
pub fn associate_face(face: &BoundingBox, detections: &FrameDetections) -> Association {
    let Some(person) = detections
        .person_boxes
        .iter()
        .find(|person| has_overlap(face, person))
        .copied()
    else {
        return Association {
            person: None,
            helmet: None,
        };
    };

    let helmet = detections
        .helmet_boxes
        .iter()
        .find(|(helmet, _)| has_overlap(helmet, &person) || has_overlap(helmet, face))
        .copied();

    Association {
        person: Some(person),
        helmet,
    }
}
