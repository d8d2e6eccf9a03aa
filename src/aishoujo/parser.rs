//! AI Shoujo card decoder

use tracing::trace;

use super::types::*;
use crate::chara::table::{param_sex, read_marker, read_parameters, read_product_no, read_table_body};
use crate::common::binary::ByteCursor;
use crate::error::Result;

pub(crate) const FORMAT: &str = "AIS";

/// Decode one card whose product number starts at `offset`.
pub(crate) fn decode_card(data: &[u8], offset: u64) -> Result<AisCard> {
    let mut cursor = ByteCursor::at(data, offset);

    let product_no = read_product_no(&mut cursor, FORMAT)?;
    let marker = read_marker(&mut cursor, FORMAT, &[AIS_CHARA_MARKER])?;
    let version = cursor.read_var_string()?;
    let language = cursor.read_i32()?;
    let user_id = cursor.read_var_string()?;
    let data_id = cursor.read_var_string()?;
    trace!(product_no, %version, language, "AIS card header");

    let segments = read_table_body(&mut cursor)?;
    let params = read_parameters(&segments)?;
    let sex = param_sex(&params)?;
    let full_name = params.get_string("fullname")?;
    let flavor = AisFlavor::detect(&segments);

    Ok(AisCard {
        product_no,
        marker,
        version,
        language,
        user_id,
        data_id,
        sex,
        full_name,
        flavor,
        segments,
    })
}
