//! Fixed ordered object-class table for the PPE detector.
//!
//! The table order IS the wire format: detectors report a class index, and
//! the index is resolved against this table. Reordering entries changes the
//! meaning of every detector output, so the table is append-only.

use anyhow::Result;

use crate::error::FusionError;

/// Object classes the PPE detector can report, in class-index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObjectClass {
    Hardhat,
    Mask,
    NoHardhat,
    NoMask,
    NoSafetyVest,
    Person,
    SafetyCone,
    SafetyVest,
    Machinery,
    Vehicle,
}

const CLASS_TABLE: [ObjectClass; 10] = [
    ObjectClass::Hardhat,
    ObjectClass::Mask,
    ObjectClass::NoHardhat,
    ObjectClass::NoMask,
    ObjectClass::NoSafetyVest,
    ObjectClass::Person,
    ObjectClass::SafetyCone,
    ObjectClass::SafetyVest,
    ObjectClass::Machinery,
    ObjectClass::Vehicle,
];

impl ObjectClass {
    /// Resolve a detector class index. An out-of-range index is a hard
    /// error (`ClassIndexOutOfRange`), never silently clamped or skipped.
    pub fn from_index(index: usize) -> Result<Self> {
        CLASS_TABLE.get(index).copied().ok_or_else(|| {
            FusionError::ClassIndexOutOfRange {
                index,
                table_len: CLASS_TABLE.len(),
            }
            .into()
        })
    }

    /// Detector-facing class label.
    pub fn label(&self) -> &'static str {
        match self {
            ObjectClass::Hardhat => "Hardhat",
            ObjectClass::Mask => "Mask",
            ObjectClass::NoHardhat => "NO-Hardhat",
            ObjectClass::NoMask => "NO-Mask",
            ObjectClass::NoSafetyVest => "NO-Safety Vest",
            ObjectClass::Person => "Person",
            ObjectClass::SafetyCone => "Safety Cone",
            ObjectClass::SafetyVest => "Safety Vest",
            ObjectClass::Machinery => "machinery",
            ObjectClass::Vehicle => "vehicle",
        }
    }

    /// Only helmet-state and person boxes participate in fusion. The rest of
    /// the table is recognized but deliberately dropped: the system
    /// adjudicates helmet compliance, nothing else.
    pub fn participates_in_fusion(&self) -> bool {
        matches!(
            self,
            ObjectClass::Hardhat | ObjectClass::NoHardhat | ObjectClass::Person
        )
    }
}

/// Helmet state carried by a fused helmet box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelmetState {
    Hardhat,
    NoHardhat,
}
