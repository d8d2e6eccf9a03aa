//! Type definitions for AI Shoujo / Honey Select 2 cards

use crate::chara::{CardFormat, Sex};
use crate::segments::SegmentSet;

/// Record marker shared by AI Shoujo and Honey Select 2
pub const AIS_CHARA_MARKER: &str = "【AIS_Chara】";

/// Scene marker written by StudioNEOV2
pub const NEO_V2_SCENE_MARKER: &str = "【StudioNEOV2】";

/// Segment write order
pub const AIS_KEY_ORDER: [&str; 7] = [
    "Custom",
    "Coordinate",
    "Parameter",
    "GameInfo",
    "Status",
    "Parameter2",
    "GameInfo2",
];

/// Segments only Honey Select 2 writes
pub const HS2_SEGMENTS: [&str; 2] = ["Parameter2", "GameInfo2"];

/// Which game produced the card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AisFlavor {
    AiShoujo,
    HoneySelect2,
}

impl AisFlavor {
    /// Honey Select 2 when every HS2-only segment is present
    pub fn detect(segments: &SegmentSet) -> Self {
        if HS2_SEGMENTS.iter().all(|name| segments.contains(name)) {
            AisFlavor::HoneySelect2
        } else {
            AisFlavor::AiShoujo
        }
    }

    /// File name prefix
    pub fn prefix(self) -> &'static str {
        match self {
            AisFlavor::AiShoujo => "AIS",
            AisFlavor::HoneySelect2 => "HS2",
        }
    }

    pub fn format(self) -> CardFormat {
        match self {
            AisFlavor::AiShoujo => CardFormat::AiShoujo,
            AisFlavor::HoneySelect2 => CardFormat::HoneySelect2,
        }
    }
}

/// Decoded AI Shoujo / Honey Select 2 card
#[derive(Debug, Clone, PartialEq)]
pub struct AisCard {
    pub product_no: i32,
    pub marker: String,
    pub version: String,
    pub language: i32,
    pub user_id: String,
    pub data_id: String,
    pub sex: Sex,
    pub full_name: String,
    pub flavor: AisFlavor,
    pub segments: SegmentSet,
}
