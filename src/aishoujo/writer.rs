//! AI Shoujo card encoder

use super::types::*;
use crate::chara::table::write_table_body;
use crate::common::binary::ByteWriter;
use crate::common::preview::card_preview;
use crate::error::Result;

/// Standalone card file: preview PNG followed by the record.
pub(crate) fn encode_card(card: &AisCard) -> Result<Vec<u8>> {
    let preview = card_preview(card.sex)?;
    let mut w = ByteWriter::with_capacity(preview.len() + card.segments.total_size() as usize + 512);

    w.write_bytes(&preview);
    w.write_i32(card.product_no);
    w.write_var_string(&card.marker)?;
    w.write_var_string(&card.version)?;
    w.write_i32(card.language);
    w.write_var_string(&card.user_id)?;
    w.write_var_string(&card.data_id)?;
    write_table_body(&mut w, &card.segments, &AIS_KEY_ORDER)?;

    Ok(w.into_inner())
}
