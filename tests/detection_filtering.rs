//! Adapter filtering behavior over a mixed raw detection set.

use sitewatch::{
    BoundingBox, CredentialRead, DetectionAdapter, FaceEmbedding, FaceObservation, HelmetState,
    KnownFaceSet, RawObjectDetection, DEFAULT_MATCH_TOLERANCE,
};

fn bx(x1: i32, y1: i32, x2: i32, y2: i32) -> BoundingBox {
    BoundingBox::new(x1, y1, x2, y2)
}

fn raw(bbox: BoundingBox, class_index: usize, confidence: f32) -> RawObjectDetection {
    RawObjectDetection {
        bbox,
        class_index,
        confidence,
    }
}

#[test]
fn mixed_detector_output_reduces_to_the_fusion_set() {
    let mut known = KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE);
    known
        .register("ALICE", FaceEmbedding(vec![1.0, 0.0]))
        .unwrap();

    let objects = vec![
        // Survives: person above threshold.
        raw(bx(0, 0, 200, 300), 5, 0.91),
        // Survives: hardhat above threshold.
        raw(bx(10, 0, 120, 60), 0, 0.77),
        // Dropped: below threshold even after ceil rounding.
        raw(bx(210, 0, 400, 300), 5, 0.42),
        // Dropped: rounds up to exactly 0.50, threshold is strict.
        raw(bx(210, 0, 400, 300), 2, 0.493),
        // Dropped: vehicle never fuses, regardless of confidence.
        raw(bx(0, 0, 639, 479), 9, 0.99),
        // Dropped: index beyond the class table.
        raw(bx(50, 50, 90, 90), 11, 0.99),
        // Survives: bare head above threshold.
        raw(bx(220, 0, 320, 60), 2, 0.83),
    ];
    let faces = vec![FaceObservation {
        bbox: bx(20, 20, 80, 80),
        embedding: FaceEmbedding(vec![1.0, 0.0]),
    }];
    let credentials = vec![CredentialRead {
        bbox: bx(150, 100, 170, 120),
        payload: b"ALICE".to_vec(),
    }];

    let out = DetectionAdapter::normalize(&objects, &faces, &credentials, &known);

    assert_eq!(out.person_boxes, vec![bx(0, 0, 200, 300)]);
    assert_eq!(
        out.helmet_boxes,
        vec![
            (bx(10, 0, 120, 60), HelmetState::Hardhat),
            (bx(220, 0, 320, 60), HelmetState::NoHardhat),
        ]
    );
    assert_eq!(out.faces.len(), 1);
    assert_eq!(out.faces[0].identity.as_deref(), Some("ALICE"));
    assert_eq!(out.credential.as_deref(), Some("ALICE"));
    assert_eq!(out.credential_boxes, vec![bx(150, 100, 170, 120)]);
}

#[test]
fn empty_detector_output_yields_an_empty_set() {
    let known = KnownFaceSet::new(DEFAULT_MATCH_TOLERANCE);
    let out = DetectionAdapter::normalize(&[], &[], &[], &known);
    assert!(out.person_boxes.is_empty());
    assert!(out.helmet_boxes.is_empty());
    assert!(out.faces.is_empty());
    assert!(out.credential.is_none());
}
