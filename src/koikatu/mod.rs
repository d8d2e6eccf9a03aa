//! Koikatu character cards
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Product No (i32, <= 100)                                     │
//! │ Marker "【KoiKatuChara】" / "...S】" / "...SP】"             │
//! │ Version (varint string)                                      │
//! │ Face length (i32) + face PNG                                 │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Header length (i32) + lstInfo table (MessagePack)            │
//! │ Data length (i64)                                            │
//! │ Segment bytes (Custom, Coordinate, Parameter, Status, KKEx)  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod types;
mod parser;
mod writer;

pub use types::{KoikatuCard, KK_KEY_ORDER, KK_MARKERS, KSTUDIO_SCENE_MARKER};

use crate::chara::table::TABLE_MARKER_LEAD;
use crate::chara::CardCodec;
use crate::error::Result;

/// Codec for Koikatu records (all three marker variants)
#[derive(Debug, Clone, Copy, Default)]
pub struct KoikatuCodec;

impl CardCodec for KoikatuCodec {
    type Card = KoikatuCard;
    const FORMAT: &'static str = parser::FORMAT;

    fn markers(&self) -> &'static [&'static str] {
        &KK_MARKERS
    }

    fn marker_lead(&self) -> u64 {
        TABLE_MARKER_LEAD
    }

    fn decode_one(&self, data: &[u8], offset: u64) -> Result<KoikatuCard> {
        parser::decode_card(data, offset)
    }

    fn encode_one(&self, card: &KoikatuCard) -> Result<Vec<u8>> {
        writer::encode_card(card)
    }
}
