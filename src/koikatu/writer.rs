//! Koikatu card encoder

use super::types::*;
use crate::chara::table::write_table_body;
use crate::common::binary::ByteWriter;
use crate::common::preview::card_preview;
use crate::error::Result;

pub(crate) fn encode_card(card: &KoikatuCard) -> Result<Vec<u8>> {
    let preview = card_preview(card.sex)?;
    let mut w = ByteWriter::with_capacity(
        preview.len() + card.face.len() + card.segments.total_size() as usize + 512,
    );

    w.write_bytes(&preview);
    w.write_i32(card.product_no);
    w.write_var_string(&card.marker)?;
    w.write_var_string(&card.version)?;
    w.write_count(card.face.len())?;
    w.write_bytes(&card.face);
    write_table_body(&mut w, &card.segments, &KK_KEY_ORDER)?;

    Ok(w.into_inner())
}
