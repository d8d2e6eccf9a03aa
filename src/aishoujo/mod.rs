//! AI Shoujo / Honey Select 2 character cards
//!
//! Both games share one record layout and one marker; Honey Select 2 adds
//! the `Parameter2` and `GameInfo2` segments.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Product No (i32, <= 100)                                     │
//! │ Marker "【AIS_Chara】" (varint string)                       │
//! │ Version (varint string)                                      │
//! │ Language (i32)                                               │
//! │ User ID, Data ID (varint strings)                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Header length (i32) + lstInfo table (MessagePack)            │
//! │ Data length (i64)                                            │
//! │ Segment bytes (Custom, Coordinate, Parameter, ...)           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod types;
mod parser;
mod writer;

pub use types::{AisCard, AisFlavor, AIS_CHARA_MARKER, AIS_KEY_ORDER, NEO_V2_SCENE_MARKER};

use crate::chara::table::TABLE_MARKER_LEAD;
use crate::chara::CardCodec;
use crate::error::Result;

/// Codec for `【AIS_Chara】` records
#[derive(Debug, Clone, Copy, Default)]
pub struct AisCodec;

impl CardCodec for AisCodec {
    type Card = AisCard;
    const FORMAT: &'static str = parser::FORMAT;

    fn markers(&self) -> &'static [&'static str] {
        &[AIS_CHARA_MARKER]
    }

    fn marker_lead(&self) -> u64 {
        TABLE_MARKER_LEAD
    }

    fn decode_one(&self, data: &[u8], offset: u64) -> Result<AisCard> {
        parser::decode_card(data, offset)
    }

    fn encode_one(&self, card: &AisCard) -> Result<Vec<u8>> {
        writer::encode_card(card)
    }
}
