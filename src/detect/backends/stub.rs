//! Scripted stub backends.
//!
//! Each stub replays a pre-loaded script of per-frame outputs, one entry per
//! `detect` call, then returns empty results. Used by tests and by
//! `sitewatchd` when no real model backend is wired in.

use anyhow::Result;
use std::collections::VecDeque;

use crate::detect::backend::{CredentialReader, FaceRecognizer, ObjectDetector};
use crate::detect::result::{CredentialRead, FaceObservation, RawObjectDetection};

pub struct ScriptedObjectDetector {
    script: VecDeque<Vec<RawObjectDetection>>,
}

impl ScriptedObjectDetector {
    pub fn new(frames: Vec<Vec<RawObjectDetection>>) -> Self {
        Self {
            script: frames.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl ObjectDetector for ScriptedObjectDetector {
    fn name(&self) -> &'static str {
        "scripted-object"
    }

    fn detect(
        &mut self,
        _pixels: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<RawObjectDetection>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

pub struct ScriptedFaceRecognizer {
    script: VecDeque<Vec<FaceObservation>>,
}

impl ScriptedFaceRecognizer {
    pub fn new(frames: Vec<Vec<FaceObservation>>) -> Self {
        Self {
            script: frames.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl FaceRecognizer for ScriptedFaceRecognizer {
    fn name(&self) -> &'static str {
        "scripted-face"
    }

    fn detect_faces(
        &mut self,
        _pixels: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<FaceObservation>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}

pub struct ScriptedCredentialReader {
    script: VecDeque<Vec<CredentialRead>>,
}

impl ScriptedCredentialReader {
    pub fn new(frames: Vec<Vec<CredentialRead>>) -> Self {
        Self {
            script: frames.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

impl CredentialReader for ScriptedCredentialReader {
    fn name(&self) -> &'static str {
        "scripted-credential"
    }

    fn read_symbols(
        &mut self,
        _pixels: &[u8],
        _width: u32,
        _height: u32,
    ) -> Result<Vec<CredentialRead>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }
}
