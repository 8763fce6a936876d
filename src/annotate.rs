//! Raster annotation of fusion results onto RGB24 frames.
//!
//! Draws rectangle outlines and label bars directly into the pixel buffer.
//! All coordinates are clamped to the frame; a box partially outside the
//! frame is drawn where it lands, never an error.

use crate::classify::Severity;
use crate::detect::{FrameDetections, HelmetState};
use crate::geometry::BoundingBox;
use crate::ingest::Frame;

/// Legacy object palette, RGB: person blue, hardhat green, bare head red,
/// credential symbol magenta.
pub const PERSON_COLOR: [u8; 3] = [0, 0, 255];
pub const HARDHAT_COLOR: [u8; 3] = [0, 255, 0];
pub const NO_HARDHAT_COLOR: [u8; 3] = [255, 0, 0];
pub const CREDENTIAL_COLOR: [u8; 3] = [255, 0, 255];

const BOX_THICKNESS: i32 = 2;
const LABEL_BAR_HEIGHT: i32 = 8;

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width as i32 || y >= frame.height as i32 {
        return;
    }
    let idx = ((y as u32 * frame.width + x as u32) * 3) as usize;
    frame.pixels[idx..idx + 3].copy_from_slice(&color);
}

/// Rectangle outline, `BOX_THICKNESS` px, clamped to the frame.
pub fn draw_rect(frame: &mut Frame, bbox: &BoundingBox, color: [u8; 3]) {
    for t in 0..BOX_THICKNESS {
        for x in bbox.x1..=bbox.x2 {
            put_pixel(frame, x, bbox.y1 + t, color);
            put_pixel(frame, x, bbox.y2 - t, color);
        }
        for y in bbox.y1..=bbox.y2 {
            put_pixel(frame, bbox.x1 + t, y, color);
            put_pixel(frame, bbox.x2 - t, y, color);
        }
    }
}

/// Filled bar just above a box; stands in for the legacy text label (glyph
/// rendering is a transport-side concern, the color/position semantics are
/// what's kept).
pub fn draw_label_bar(frame: &mut Frame, bbox: &BoundingBox, color: [u8; 3]) {
    let top = bbox.y1 - LABEL_BAR_HEIGHT - 2;
    for y in top..bbox.y1 - 2 {
        for x in bbox.x1..=bbox.x2 {
            put_pixel(frame, x, y, color);
        }
    }
}

/// Draw the frame's object and credential boxes in class colors.
pub fn annotate_detections(frame: &mut Frame, detections: &FrameDetections) {
    for person in &detections.person_boxes {
        draw_rect(frame, person, PERSON_COLOR);
    }
    for (bbox, state) in &detections.helmet_boxes {
        let color = match state {
            HelmetState::Hardhat => HARDHAT_COLOR,
            HelmetState::NoHardhat => NO_HARDHAT_COLOR,
        };
        draw_rect(frame, bbox, color);
    }
    for bbox in &detections.credential_boxes {
        draw_rect(frame, bbox, CREDENTIAL_COLOR);
    }
}

/// Draw one face box in its verdict's severity color, with a label bar.
pub fn annotate_face(frame: &mut Frame, bbox: &BoundingBox, severity: Severity) {
    let color = severity.color();
    draw_rect(frame, bbox, color);
    draw_label_bar(frame, bbox, color);
}
