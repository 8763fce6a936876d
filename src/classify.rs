//! Compliance Classifier.
//!
//! A pure decision table: the verdict for one face in one frame is a
//! function of (identity known?, associated helmet state, credential
//! present?, credential matches identity?) and nothing else. No state
//! carries across frames or faces.

use chrono::Local;
use serde::Serialize;

use crate::detect::HelmetState;

/// Classified compliance outcome for one face in one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    Compliant,
    SelfHelmetMismatch,
    NoHelmet,
    GuestAlert,
    UnknownAlert,
    Neutral,
}

impl Severity {
    /// Legacy annotation palette, RGB.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Severity::Compliant => [0, 255, 0],
            Severity::SelfHelmetMismatch => [255, 165, 0],
            Severity::NoHelmet => [255, 255, 0],
            Severity::GuestAlert => [255, 105, 180],
            Severity::UnknownAlert => [255, 0, 0],
            Severity::Neutral => [255, 0, 0],
        }
    }
}

/// One verdict per visible face per frame. Write-once; the status sink
/// assigns the persistent record identity on append.
#[derive(Clone, Debug, Serialize)]
pub struct ComplianceVerdict {
    pub identity: Option<String>,
    pub severity: Severity,
    pub message: &'static str,
    /// Wall-clock time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

impl ComplianceVerdict {
    pub fn new(identity: Option<&str>, severity: Severity, message: &'static str) -> Self {
        Self {
            identity: identity.map(str::to_string),
            severity,
            message,
            timestamp: now_timestamp(),
        }
    }
}

/// Sink timestamp format.
pub fn now_timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Map one face's fused inputs to a verdict.
///
/// `helmet = None` means association found no helmet-state box for this face
/// (or no enclosing person at all): the face still gets a verdict, but a
/// Neutral one with empty status text.
pub fn classify(
    identity: Option<&str>,
    helmet: Option<HelmetState>,
    credential: Option<&str>,
) -> (Severity, &'static str) {
    match (identity, helmet) {
        (_, None) => (Severity::Neutral, ""),
        (Some(name), Some(HelmetState::Hardhat)) => match credential {
            Some(token) if token == name => (Severity::Compliant, "All Good!"),
            // Mismatched or absent credential reads the same to a site
            // marshal: the helmet is on, but not verifiably this person's.
            _ => (Severity::SelfHelmetMismatch, "Wear Your Own Helmet!!"),
        },
        (Some(_), Some(HelmetState::NoHardhat)) => {
            (Severity::NoHelmet, "Please Wear Your Helmet")
        }
        (None, Some(HelmetState::Hardhat)) => match credential {
            Some(_) => (Severity::GuestAlert, "Guest User Alert!"),
            None => (Severity::UnknownAlert, "Unknown User Alert!!"),
        },
        (None, Some(HelmetState::NoHardhat)) => (Severity::Neutral, ""),
    }
}
