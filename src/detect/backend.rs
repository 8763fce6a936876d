use anyhow::Result;

use crate::detect::result::{CredentialRead, FaceObservation, RawObjectDetection};

/// PPE object detector boundary.
///
/// Implementations wrap an opaque model (ONNX, remote service, scripted
/// stub). They report `(box, class index, confidence)` triples in model
/// output order; the fusion layer relies on that order for first-match
/// association, so implementations must not re-sort results.
pub trait ObjectDetector: Send {
    /// Backend identifier for logs.
    fn name(&self) -> &'static str;

    /// Run detection on one RGB24 frame.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32)
        -> Result<Vec<RawObjectDetection>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Face recognizer boundary. Returns face boxes with embeddings; identity
/// resolution against the known-face set happens in the adapter, not here.
pub trait FaceRecognizer: Send {
    fn name(&self) -> &'static str;

    fn detect_faces(&mut self, pixels: &[u8], width: u32, height: u32)
        -> Result<Vec<FaceObservation>>;
}

/// Credential (QR) reader boundary. Returns zero or more decoded symbols
/// per frame, in reader iteration order.
pub trait CredentialReader: Send {
    fn name(&self) -> &'static str;

    fn read_symbols(&mut self, pixels: &[u8], width: u32, height: u32)
        -> Result<Vec<CredentialRead>>;
}
