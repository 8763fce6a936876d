mod adapter;
mod backend;
mod backends;
mod classes;
mod result;

pub use adapter::{DetectionAdapter, CONFIDENCE_THRESHOLD};
pub use backend::{CredentialReader, FaceRecognizer, ObjectDetector};
pub use backends::{ScriptedCredentialReader, ScriptedFaceRecognizer, ScriptedObjectDetector};
pub use classes::{HelmetState, ObjectClass};
pub use result::{
    CredentialRead, FaceDetection, FaceObservation, FrameDetections, RawObjectDetection,
};
