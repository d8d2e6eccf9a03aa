//! Honey Select character cards
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Marker "【HoneySelectCharaMale】" / "...Female】"            │
//! │ Version (i32, <= 2)                                          │
//! │ Count (i32)                                                  │
//! │ Fixed table: count x [tag 128][ver i32][pos i64][size i64]   │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Segment bytes (positions relative to end of table)           │
//! ├──────────────────────────────────────────────────────────────┤
//! │ v2: HMAC-SHA256(preview, key = marker) (32 bytes)            │
//! │ Image end offset (i64) + data start offset (i64)             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The marker alone decides the sex; there is no product number, so the
//! record starts one byte (the marker length prefix) before the marker.

mod types;
mod parser;
mod writer;

pub use types::{
    signature_len, HoneySelectCard, HONEY_SCENE_MARKER, HS_FEMALE_MARKER, HS_MALE_MARKER,
    HS_MARKERS, NEO_SCENE_MARKER, PREVIEW_SEGMENT,
};

use crate::chara::CardCodec;
use crate::error::Result;

/// Bytes from record start to the marker text
const HS_MARKER_LEAD: u64 = 1;

/// Codec for Honey Select records
#[derive(Debug, Clone, Copy, Default)]
pub struct HoneySelectCodec;

impl CardCodec for HoneySelectCodec {
    type Card = HoneySelectCard;
    const FORMAT: &'static str = parser::FORMAT;

    fn markers(&self) -> &'static [&'static str] {
        &HS_MARKERS
    }

    fn marker_lead(&self) -> u64 {
        HS_MARKER_LEAD
    }

    fn decode_one(&self, data: &[u8], offset: u64) -> Result<HoneySelectCard> {
        parser::decode_card(data, offset)
    }

    fn encode_one(&self, card: &HoneySelectCard) -> Result<Vec<u8>> {
        writer::encode_card(card)
    }
}
