//! Camera frame source.
//!
//! `stub://` URLs select a deterministic synthetic backend used by tests and
//! demo runs. Any other scheme is rejected up front: wiring a real camera
//! means implementing `FrameSource` against the vendor stack and handing it
//! to the pipeline.

use anyhow::{anyhow, Result};

use crate::error::FusionError;
use crate::ingest::{Frame, FrameSource};

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Source URL (e.g., "stub://site_gate").
    pub source: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
    /// Stop after this many frames; `None` streams until shutdown.
    /// Synthetic-backend only, used to script end-of-stream in tests.
    pub frame_limit: Option<u64>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: "stub://site_gate".to_string(),
            target_fps: 10,
            width: 640,
            height: 480,
            frame_limit: None,
        }
    }
}

pub struct CameraSource {
    config: CameraConfig,
    frame_count: u64,
    scene_state: u8,
}

impl CameraSource {
    pub fn new(config: CameraConfig) -> Result<Self> {
        if !config.source.starts_with("stub://") {
            return Err(anyhow!(
                "unsupported camera source '{}': only stub:// ships in-tree; \
                 implement FrameSource for real hardware",
                config.source
            ));
        }
        if config.width == 0 || config.height == 0 {
            return Err(anyhow!("camera dimensions must be nonzero"));
        }
        Ok(Self {
            config,
            frame_count: 0,
            scene_state: 0,
        })
    }

    pub fn connect(&mut self) -> Result<()> {
        log::info!("camera connected to {} (synthetic)", self.config.source);
        Ok(())
    }

    fn generate_synthetic_pixels(&mut self) -> Vec<u8> {
        let pixel_count = (self.config.width * self.config.height * 3) as usize;
        if self.frame_count % 50 == 0 {
            self.scene_state = self.scene_state.wrapping_add(1);
        }
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 + self.frame_count + self.scene_state as u64) % 256) as u8;
        }
        pixels
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Frame> {
        if let Some(limit) = self.config.frame_limit {
            if self.frame_count >= limit {
                return Err(FusionError::FrameAcquisitionFailure(format!(
                    "{}: frame budget of {} exhausted",
                    self.config.source, limit
                ))
                .into());
            }
        }
        self.frame_count += 1;
        let pixels = self.generate_synthetic_pixels();
        Ok(Frame::new(pixels, self.config.width, self.config.height))
    }

    fn is_healthy(&self) -> bool {
        true
    }
}
