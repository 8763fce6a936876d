//! Frame ingestion.
//!
//! Sources produce RGB24 `Frame`s one at a time; the pipeline pulls them.
//! Only the synthetic `stub://` camera backend ships in-tree — real camera
//! I/O (RTSP, V4L2, vendor SDKs) lives outside this crate and plugs in
//! through the `FrameSource` trait.

mod camera;

pub use camera::{CameraConfig, CameraSource};

/// One captured RGB24 frame. `pixels.len() == width * height * 3`.
#[derive(Clone, Debug)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(pixels: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(pixels.len(), (width * height * 3) as usize);
        Self {
            pixels,
            width,
            height,
        }
    }
}

/// Blocking frame source. An `Err` from `next_frame` is end-of-stream for
/// the pipeline (`FrameAcquisitionFailure`), never retried.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> anyhow::Result<Frame>;

    fn is_healthy(&self) -> bool;
}
