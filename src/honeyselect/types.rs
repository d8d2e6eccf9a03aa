//! Type definitions for Honey Select cards

use crate::chara::Sex;
use crate::segments::SegmentSet;

pub const HS_MALE_MARKER: &str = "【HoneySelectCharaMale】";
pub const HS_FEMALE_MARKER: &str = "【HoneySelectCharaFemale】";
pub const HS_MARKERS: [&str; 2] = [HS_MALE_MARKER, HS_FEMALE_MARKER];

/// Scene marker written by Honey Studio
pub const HONEY_SCENE_MARKER: &str = "【honey】";
/// Scene marker written by StudioNEO
pub const NEO_SCENE_MARKER: &str = "【-neo-】";

/// Highest supported card version
pub const MAX_HS_VERSION: i32 = 2;

/// Segment holding the display name
pub const PREVIEW_SEGMENT: &str = "プレビュー情報";

/// Trailing block length for cards below version 2
pub const SIGNATURE_LEN: usize = 16;
/// Trailing block length for version 2 cards (adds a 32-byte HMAC)
pub const SIGNATURE_LEN_V2: usize = 48;

pub fn signature_len(version: i32) -> usize {
    if version == 2 {
        SIGNATURE_LEN_V2
    } else {
        SIGNATURE_LEN
    }
}

/// Decoded Honey Select card
#[derive(Debug, Clone, PartialEq)]
pub struct HoneySelectCard {
    pub marker: String,
    pub sex: Sex,
    pub version: i32,
    pub segments: SegmentSet,
    /// Trailing bytes after the segments, if they could be read
    pub signature: Option<Vec<u8>>,
    pub name: String,
}
