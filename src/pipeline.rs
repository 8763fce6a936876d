//! Frame Pipeline Driver.
//!
//! One logical pipeline: acquire frame, run detectors, adapt, associate,
//! classify, log, annotate, encode, emit — all for one frame at a time.
//! The driver is a blocking iterator; each `next()` performs one full cycle
//! and yields one encoded JPEG, or ends the stream when acquisition fails.
//!
//! All detector and sink handles live in an explicit `PipelineContext`
//! constructed once and owned by the driver — no process-wide singletons.

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::annotate;
use crate::classify::{classify, ComplianceVerdict, Severity};
use crate::detect::{
    CredentialReader, DetectionAdapter, FaceRecognizer, FrameDetections, ObjectDetector,
};
use crate::error::FusionError;
use crate::faces::KnownFaceSet;
use crate::geometry::BoundingBox;
use crate::ingest::{Frame, FrameSource};
use crate::sink::StatusSink;

const JPEG_QUALITY: u8 = 80;

/// Everything the driver needs, owned in one place.
pub struct PipelineContext {
    pub source: Box<dyn FrameSource>,
    pub objects: Box<dyn ObjectDetector>,
    pub faces: Box<dyn FaceRecognizer>,
    pub credentials: Box<dyn CredentialReader>,
    pub known_faces: KnownFaceSet,
    pub sink: Box<dyn StatusSink>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Running,
    Stopped,
}

pub struct FramePipeline {
    ctx: PipelineContext,
    state: PipelineState,
    shutdown: Option<Arc<AtomicBool>>,
    frames_processed: u64,
    frames_emitted: u64,
    verdicts_logged: u64,
}

impl FramePipeline {
    pub fn new(ctx: PipelineContext) -> Self {
        Self {
            ctx,
            state: PipelineState::Running,
            shutdown: None,
            frames_processed: 0,
            frames_emitted: 0,
            verdicts_logged: 0,
        }
    }

    /// Attach an external shutdown flag (ctrl-c handler). When set, the next
    /// iteration transitions to `Stopped` before acquiring a frame.
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown = Some(flag);
        self
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }

    pub fn verdicts_logged(&self) -> u64 {
        self.verdicts_logged
    }

    pub fn sink(&self) -> &dyn StatusSink {
        self.ctx.sink.as_ref()
    }

    pub fn source(&self) -> &dyn FrameSource {
        self.ctx.source.as_ref()
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    /// Run detectors on one frame and normalize their outputs.
    fn detect(&mut self, frame: &Frame) -> Result<FrameDetections> {
        let objects = self
            .ctx
            .objects
            .detect(&frame.pixels, frame.width, frame.height)?;
        let faces = self
            .ctx
            .faces
            .detect_faces(&frame.pixels, frame.width, frame.height)?;
        let credentials = self
            .ctx
            .credentials
            .read_symbols(&frame.pixels, frame.width, frame.height)?;
        Ok(DetectionAdapter::normalize(
            &objects,
            &faces,
            &credentials,
            &self.ctx.known_faces,
        ))
    }

    /// Classify every visible face and append each verdict to the sink.
    /// Returns `(face box, severity)` pairs for annotation. A sink write
    /// failure drops that record with a warning and never aborts the frame.
    fn classify_and_log(&mut self, detections: &FrameDetections) -> Vec<(BoundingBox, Severity)> {
        let mut annotated = Vec::with_capacity(detections.faces.len());
        for face in &detections.faces {
            let association = crate::associate::associate_face(&face.bbox, detections);
            let (severity, message) = classify(
                face.identity.as_deref(),
                association.helmet_state(),
                detections.credential.as_deref(),
            );
            let verdict = ComplianceVerdict::new(face.identity.as_deref(), severity, message);
            if let Err(e) = self.ctx.sink.append(&verdict.timestamp, verdict.message) {
                log::warn!("compliance record dropped: {}", e);
            } else {
                self.verdicts_logged += 1;
            }
            annotated.push((face.bbox, severity));
        }
        annotated
    }

    /// One full fuse-classify-log-annotate-encode cycle.
    fn process_frame(&mut self, mut frame: Frame) -> Result<Vec<u8>> {
        let detections = self.detect(&frame)?;
        let face_verdicts = self.classify_and_log(&detections);

        annotate::annotate_detections(&mut frame, &detections);
        for (bbox, severity) in &face_verdicts {
            annotate::annotate_face(&mut frame, bbox, *severity);
        }

        encode_jpeg(&frame)
    }
}

impl Iterator for FramePipeline {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        loop {
            if self.state == PipelineState::Stopped {
                return None;
            }
            if self.shutdown_requested() {
                log::info!("shutdown requested; stopping pipeline");
                self.state = PipelineState::Stopped;
                return None;
            }

            // Acquisition failure is end-of-stream, not retried.
            let frame = match self.ctx.source.next_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    log::info!("stream ended: {}", e);
                    self.state = PipelineState::Stopped;
                    return None;
                }
            };
            self.frames_processed += 1;

            match self.process_frame(frame) {
                Ok(encoded) => {
                    self.frames_emitted += 1;
                    return Some(encoded);
                }
                // Encode or detector trouble skips this iteration; the
                // stream continues with the next frame.
                Err(e) => {
                    log::warn!("frame skipped: {}", e);
                    continue;
                }
            }
        }
    }
}

/// Encode an RGB24 frame as JPEG.
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder
        .encode(
            &frame.pixels,
            frame.width,
            frame.height,
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| FusionError::EncodeFailure(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{
        FaceObservation, RawObjectDetection, ScriptedCredentialReader, ScriptedFaceRecognizer,
        ScriptedObjectDetector,
    };
    use crate::faces::{FaceEmbedding, DEFAULT_MATCH_TOLERANCE};
    use crate::ingest::{CameraConfig, CameraSource};
    use crate::sink::InMemoryStatusSink;

    fn bx(x1: i32, y1: i32, x2: i32, y2: i32) -> BoundingBox {
        BoundingBox::new(x1, y1, x2, y2)
    }

    fn context_with(
        frame_limit: u64,
        objects: ScriptedObjectDetector,
        faces: ScriptedFaceRecognizer,
        credentials: ScriptedCredentialReader,
        known_faces: KnownFaceSet,
    ) -> PipelineContext {
        let config = CameraConfig {
            width: 320,
            height: 240,
            frame_limit: Some(frame_limit),
            ..Default::default()
        };
        PipelineContext {
            source: Box::new(CameraSource::new(config).unwrap()),
            objects: Box::new(objects),
            faces: Box::new(faces),
            credentials: Box::new(credentials),
            known_faces,
            sink: Box::new(InMemoryStatusSink::new()),
        }
    }

    #[test]
    fn every_visible_face_produces_one_sink_record() {
        let objects = ScriptedObjectDetector::new(vec![vec![
            RawObjectDetection {
                bbox: bx(0, 0, 200, 239),
                class_index: 5,
                confidence: 0.9,
            },
            RawObjectDetection {
                bbox: bx(10, 0, 120, 60),
                class_index: 0,
                confidence: 0.9,
            },
        ]]);
        let faces = ScriptedFaceRecognizer::new(vec![vec![
            FaceObservation {
                bbox: bx(20, 20, 80, 80),
                embedding: FaceEmbedding(vec![0.0]),
            },
            FaceObservation {
                bbox: bx(120, 20, 180, 80),
                embedding: FaceEmbedding(vec![0.0]),
            },
        ]]);
        let ctx = context_with(
            1,
            objects,
            faces,
            ScriptedCredentialReader::empty(),
            KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE),
        );
        let mut pipeline = FramePipeline::new(ctx);

        let encoded = pipeline.next().expect("one frame");
        assert!(!encoded.is_empty());
        // Two faces, two appends, before the frame was yielded.
        assert_eq!(pipeline.verdicts_logged(), 2);
        assert_eq!(pipeline.sink().query_all().unwrap().len(), 2);

        // Budget exhausted: stream ends.
        assert!(pipeline.next().is_none());
        assert_eq!(pipeline.state(), PipelineState::Stopped);
    }

    #[test]
    fn neutral_verdicts_are_logged_too() {
        // A face with no person box at all still writes one (empty) record.
        let faces = ScriptedFaceRecognizer::new(vec![vec![FaceObservation {
            bbox: bx(20, 20, 80, 80),
            embedding: FaceEmbedding(vec![0.0]),
        }]]);
        let ctx = context_with(
            1,
            ScriptedObjectDetector::empty(),
            faces,
            ScriptedCredentialReader::empty(),
            KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE),
        );
        let mut pipeline = FramePipeline::new(ctx);
        pipeline.next().expect("one frame");

        let records = pipeline.sink().query_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status_text, "");
    }

    #[test]
    fn shutdown_flag_stops_before_acquisition() {
        let ctx = context_with(
            100,
            ScriptedObjectDetector::empty(),
            ScriptedFaceRecognizer::empty(),
            ScriptedCredentialReader::empty(),
            KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE),
        );
        let flag = Arc::new(AtomicBool::new(true));
        let mut pipeline = FramePipeline::new(ctx).with_shutdown_flag(flag);
        assert!(pipeline.next().is_none());
        assert_eq!(pipeline.frames_processed(), 0);
    }

    #[test]
    fn camera_health_is_visible_through_the_driver() {
        let ctx = context_with(
            1,
            ScriptedObjectDetector::empty(),
            ScriptedFaceRecognizer::empty(),
            ScriptedCredentialReader::empty(),
            KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE),
        );
        let pipeline = FramePipeline::new(ctx);
        assert!(pipeline.source().is_healthy());
    }

    #[test]
    fn encode_produces_a_jpeg_header() {
        let frame = Frame::new(vec![128u8; 32 * 32 * 3], 32, 32);
        let encoded = encode_jpeg(&frame).unwrap();
        assert_eq!(&encoded[..2], &[0xff, 0xd8]);
    }
}
