use crate::detect::classes::HelmetState;
use crate::faces::FaceEmbedding;
use crate::geometry::BoundingBox;

/// One raw object detection as reported by the detector boundary: a box, a
/// class index into the fixed class table, and a confidence in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct RawObjectDetection {
    pub bbox: BoundingBox,
    pub class_index: usize,
    pub confidence: f32,
}

/// One raw face observation: a box plus the recognizer's embedding.
#[derive(Clone, Debug)]
pub struct FaceObservation {
    pub bbox: BoundingBox,
    pub embedding: FaceEmbedding,
}

/// One raw credential symbol: payload bytes plus its box.
/// Only the decoded payload participates in fusion; the box is
/// annotation-only.
#[derive(Clone, Debug)]
pub struct CredentialRead {
    pub bbox: BoundingBox,
    pub payload: Vec<u8>,
}

/// A face with its resolved identity. `identity == None` denotes Unknown.
#[derive(Clone, Debug)]
pub struct FaceDetection {
    pub bbox: BoundingBox,
    pub identity: Option<String>,
}

/// Normalized per-frame detection set produced by the adapter.
///
/// Invariant: every object detection that survived the confidence/class
/// filter sits in exactly one of `person_boxes` or `helmet_boxes`. List
/// order is detector-return order and is semantically load-bearing
/// (first-match association).
#[derive(Clone, Debug, Default)]
pub struct FrameDetections {
    pub person_boxes: Vec<BoundingBox>,
    pub helmet_boxes: Vec<(BoundingBox, HelmetState)>,
    pub faces: Vec<FaceDetection>,
    /// At most one credential token per frame. When several symbols decode,
    /// the last one in reader order wins (kept legacy behavior).
    pub credential: Option<String>,
    /// Credential symbol boxes, kept for annotation.
    pub credential_boxes: Vec<BoundingBox>,
}
