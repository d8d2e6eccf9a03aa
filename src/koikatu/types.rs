//! Type definitions for Koikatu cards

use crate::chara::Sex;
use crate::segments::SegmentSet;

pub const KK_CHARA_MARKER: &str = "【KoiKatuChara】";
pub const KK_CHARA_S_MARKER: &str = "【KoiKatuCharaS】";
pub const KK_CHARA_SP_MARKER: &str = "【KoiKatuCharaSP】";

/// Every record marker a Koikatu card may carry
pub const KK_MARKERS: [&str; 3] = [KK_CHARA_MARKER, KK_CHARA_S_MARKER, KK_CHARA_SP_MARKER];

/// Scene marker written by KoikatuStudio
pub const KSTUDIO_SCENE_MARKER: &str = "【KStudio】";

/// Segment write order
pub const KK_KEY_ORDER: [&str; 4] = ["Custom", "Coordinate", "Parameter", "Status"];

/// Decoded Koikatu card
#[derive(Debug, Clone, PartialEq)]
pub struct KoikatuCard {
    pub product_no: i32,
    pub marker: String,
    pub version: String,
    /// Face thumbnail, itself a PNG
    pub face: Vec<u8>,
    pub sex: Sex,
    pub last_name: String,
    pub first_name: String,
    pub nick_name: String,
    pub segments: SegmentSet,
}

impl KoikatuCard {
    /// "last first", skipping empty parts
    pub fn full_name(&self) -> String {
        [self.last_name.as_str(), self.first_name.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}
