mod stub;

pub use stub::{ScriptedCredentialReader, ScriptedFaceRecognizer, ScriptedObjectDetector};
