//! Honey Select card encoder

use super::types::*;
use crate::common::binary::ByteWriter;
use crate::common::hash::keyed_checksum;
use crate::common::preview::card_preview;
use crate::error::Result;
use crate::segments::write_fixed_table;

/// Standalone card: preview, record, then the trailing block.
///
/// The segments are followed by an HMAC-SHA256 of the preview keyed by the
/// marker, the image-end offset and the data-start offset.
pub(crate) fn encode_card(card: &HoneySelectCard) -> Result<Vec<u8>> {
    let preview = card_preview(card.sex)?;
    let image_end = preview.len() as i64;
    let mut w = ByteWriter::with_capacity(preview.len() + card.segments.total_size() as usize + 4096);

    w.write_bytes(&preview);
    w.write_var_string(&card.marker)?;
    w.write_i32(card.version);
    w.write_count(card.segments.len())?;
    write_fixed_table(&mut w, &card.segments.sequential_table())?;

    let data_start = w.len() as i64;
    w.write_bytes(&card.segments.concat());

    w.write_bytes(&keyed_checksum(card.marker.as_bytes(), &preview)?);
    w.write_i64(image_end);
    w.write_i64(data_start);

    Ok(w.into_inner())
}
