//! Standalone PlayHome card encoder

use super::custom::write_custom_parameter;
use super::types::*;
use crate::chara::Sex;
use crate::common::binary::ByteWriter;
use crate::common::preview::card_preview;
use crate::error::Result;

/// Preview, marker, then the normalized custom parameter.
///
/// Preview and marker follow the block layout, so an unknown native tag is
/// written as a male card throughout.
pub(crate) fn encode_card(card: &PlayHomeCard) -> Result<Vec<u8>> {
    let (preview_sex, marker) = if card.custom.female_layout() {
        (Sex::Female, PH_FEMALE_MARKER)
    } else {
        (Sex::Male, PH_MALE_MARKER)
    };
    let preview = card_preview(preview_sex)?;

    let blocks = card.custom.hair.len()
        + card.custom.head.len()
        + card.custom.body.len()
        + card.custom.wear.len()
        + card.custom.accessory.len();
    let mut w = ByteWriter::with_capacity(preview.len() + blocks + 64);
    w.write_bytes(&preview);
    w.write_var_string(marker)?;
    write_custom_parameter(&card.custom, &mut w);
    Ok(w.into_inner())
}
