use std::fmt;

/// Failure taxonomy for the fusion pipeline.
///
/// Anything scoped to a single detection, face, or frame is recoverable;
/// only losing the camera ends the stream. Callers that need to branch on
/// a category downcast through `anyhow::Error`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FusionError {
    /// Detector reported a class index outside the fixed class table.
    /// The offending detection is dropped; the frame continues.
    ClassIndexOutOfRange { index: usize, table_len: usize },
    /// Frame source could not produce a frame. Terminal for the pipeline.
    FrameAcquisitionFailure(String),
    /// Annotated frame could not be encoded. The iteration is skipped.
    EncodeFailure(String),
    /// A credential symbol could not be decoded. Treated as no credential.
    CredentialDecodeFailure(String),
    /// Status sink rejected a write. Logged, never aborts the stream.
    SinkWriteFailure(String),
    /// Status sink could not be read. Surfaced as an empty result set
    /// plus an error signal at the query boundary.
    SinkReadFailure(String),
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionError::ClassIndexOutOfRange { index, table_len } => write!(
                f,
                "class index {} out of range (class table has {} entries)",
                index, table_len
            ),
            FusionError::FrameAcquisitionFailure(msg) => {
                write!(f, "frame acquisition failed: {}", msg)
            }
            FusionError::EncodeFailure(msg) => write!(f, "frame encode failed: {}", msg),
            FusionError::CredentialDecodeFailure(msg) => {
                write!(f, "credential decode failed: {}", msg)
            }
            FusionError::SinkWriteFailure(msg) => write!(f, "status sink write failed: {}", msg),
            FusionError::SinkReadFailure(msg) => write!(f, "status sink read failed: {}", msg),
        }
    }
}

impl std::error::Error for FusionError {}
