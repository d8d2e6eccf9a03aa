//! Standalone PlayHome card decoder

use super::custom::read_custom_parameter;
use super::types::*;
use crate::chara::table::read_marker;
use crate::common::binary::ByteCursor;
use crate::error::Result;

pub(crate) const FORMAT: &str = "PlayHome";

/// Decode a standalone card whose marker length prefix sits at `offset`.
///
/// Standalone cards carry no scene object, so `scene_sex` is absent and the
/// name is empty.
pub(crate) fn decode_card(data: &[u8], offset: u64) -> Result<PlayHomeCard> {
    let mut cursor = ByteCursor::at(data, offset);
    read_marker(&mut cursor, FORMAT, &PH_MARKERS)?;
    let custom = read_custom_parameter(&mut cursor)?;
    Ok(PlayHomeCard {
        custom,
        scene_sex: None,
        name: String::new(),
    })
}
