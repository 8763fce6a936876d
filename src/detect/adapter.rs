//! Detection Adapter.
//!
//! Normalizes heterogeneous raw detector outputs into one per-frame
//! `FrameDetections` set. All policy filters live here, as explicit steps,
//! not as side effects of iteration:
//!
//! - class index resolution against the fixed table (out-of-range drops the
//!   detection with a warning, the frame continues)
//! - confidence rounded up to hundredths, then filtered at `> 0.5`
//! - non-fusion classes dropped
//! - face identity resolved first-registered-match against the known set
//! - at most one credential token per frame, keep-last across symbols

use crate::detect::classes::{HelmetState, ObjectClass};
use crate::detect::result::{
    CredentialRead, FaceDetection, FaceObservation, FrameDetections, RawObjectDetection,
};
use crate::error::FusionError;
use crate::faces::KnownFaceSet;

/// Minimum confidence for a detection to enter fusion (exclusive).
pub const CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Stateless adapter; carries only the filter policy.
pub struct DetectionAdapter;

impl DetectionAdapter {
    /// Normalize one frame's raw detector outputs.
    pub fn normalize(
        objects: &[RawObjectDetection],
        faces: &[FaceObservation],
        credentials: &[CredentialRead],
        known_faces: &KnownFaceSet,
    ) -> FrameDetections {
        let mut out = FrameDetections::default();

        for raw in objects {
            let class = match ObjectClass::from_index(raw.class_index) {
                Ok(class) => class,
                Err(e) => {
                    log::warn!("dropping detection: {}", e);
                    continue;
                }
            };
            if !class.participates_in_fusion() {
                continue;
            }
            // Legacy rounding: confidence is rounded UP to hundredths before
            // the threshold compare. 0.491..=0.50 stays below, 0.501 passes.
            let confidence = (raw.confidence * 100.0).ceil() / 100.0;
            if confidence <= CONFIDENCE_THRESHOLD {
                continue;
            }
            match class {
                ObjectClass::Person => out.person_boxes.push(raw.bbox),
                ObjectClass::Hardhat => out.helmet_boxes.push((raw.bbox, HelmetState::Hardhat)),
                ObjectClass::NoHardhat => {
                    out.helmet_boxes.push((raw.bbox, HelmetState::NoHardhat))
                }
                _ => unreachable!("participates_in_fusion admits only person/helmet classes"),
            }
        }

        for observation in faces {
            let identity = known_faces
                .resolve(&observation.embedding)
                .map(str::to_string);
            out.faces.push(FaceDetection {
                bbox: observation.bbox,
                identity,
            });
        }

        for read in credentials {
            out.credential_boxes.push(read.bbox);
            match std::str::from_utf8(&read.payload) {
                // Keep-last: a later symbol overwrites an earlier one.
                Ok(token) => out.credential = Some(token.to_string()),
                Err(e) => {
                    let err = FusionError::CredentialDecodeFailure(e.to_string());
                    log::warn!("{}; treating symbol as absent", err);
                }
            }
        }

        out
    }
}
