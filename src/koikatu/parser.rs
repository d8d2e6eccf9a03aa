//! Koikatu card decoder

use tracing::trace;

use super::types::*;
use crate::chara::table::{param_sex, read_marker, read_parameters, read_product_no, read_table_body};
use crate::common::binary::ByteCursor;
use crate::error::Result;

pub(crate) const FORMAT: &str = "Koikatu";

pub(crate) fn decode_card(data: &[u8], offset: u64) -> Result<KoikatuCard> {
    let mut cursor = ByteCursor::at(data, offset);

    let product_no = read_product_no(&mut cursor, FORMAT)?;
    let marker = read_marker(&mut cursor, FORMAT, &KK_MARKERS)?;
    let version = cursor.read_var_string()?;
    let face_len = cursor.read_count()?;
    let face = cursor.read_bytes(face_len)?.to_vec();
    trace!(product_no, %marker, %version, face_len, "Koikatu card header");

    let segments = read_table_body(&mut cursor)?;
    let params = read_parameters(&segments)?;

    Ok(KoikatuCard {
        product_no,
        marker,
        version,
        face,
        sex: param_sex(&params)?,
        last_name: params.get_string("lastname")?,
        first_name: params.get_string("firstname")?,
        nick_name: params.get_string("nickname")?,
        segments,
    })
}
