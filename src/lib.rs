//! sitewatch — helmet-policy compliance watcher.
//!
//! Ingests a live video stream, runs three independent detectors (PPE object
//! detector, face recognizer, optional QR credential reader), fuses their
//! outputs geometrically, and classifies every visible face against the
//! site's safety-helmet policy. Each verdict is persisted as a timestamped
//! status record.
//!
//! # Architecture
//!
//! Data flows leaf-first through the crate:
//!
//! 1. `ingest`: frame sources produce RGB24 frames
//! 2. `detect`: detector boundary traits + the adapter that normalizes raw
//!    outputs into one per-frame detection set
//! 3. `associate`: spatial face -> person -> helmet-box association
//!    (first-match in list order, any positive overlap counts)
//! 4. `classify`: the pure compliance decision table
//! 5. `sink`: append-only status log (SQLite), one record per face per frame
//! 6. `pipeline`: the blocking per-frame driver tying it together
//! 7. `api`: concurrent read-only query surface over the status log

pub mod annotate;
pub mod api;
pub mod associate;
pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod faces;
pub mod geometry;
pub mod ingest;
pub mod pipeline;
pub mod sink;

pub use associate::{associate_face, Association};
pub use classify::{classify, now_timestamp, ComplianceVerdict, Severity};
pub use config::SitewatchConfig;
pub use detect::{
    CredentialRead, CredentialReader, DetectionAdapter, FaceDetection, FaceObservation,
    FaceRecognizer, FrameDetections, HelmetState, ObjectClass, ObjectDetector,
    RawObjectDetection, ScriptedCredentialReader, ScriptedFaceRecognizer, ScriptedObjectDetector,
    CONFIDENCE_THRESHOLD,
};
pub use error::FusionError;
pub use faces::{FaceEmbedding, KnownFaceSet, DEFAULT_MATCH_TOLERANCE};
pub use geometry::{has_overlap, overlap_area, BoundingBox};
pub use ingest::{CameraConfig, CameraSource, Frame, FrameSource};
pub use pipeline::{encode_jpeg, FramePipeline, PipelineContext, PipelineState};
pub use sink::{InMemoryStatusSink, SqliteStatusSink, StatusRecord, StatusSink};
