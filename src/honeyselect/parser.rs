//! Honey Select card decoder

use std::io::SeekFrom;
use tracing::{debug, trace, warn};

use super::types::*;
use crate::chara::table::read_marker;
use crate::chara::Sex;
use crate::common::binary::ByteCursor;
use crate::common::hash::checksum_hex;
use crate::error::{CardError, Result};
use crate::segments::{read_fixed_table, read_segments, SegmentSet};

pub(crate) const FORMAT: &str = "HoneySelect";

/// Decode one card whose marker length prefix sits at `offset`.
pub(crate) fn decode_card(data: &[u8], offset: u64) -> Result<HoneySelectCard> {
    let mut cursor = ByteCursor::at(data, offset);

    let marker = read_marker(&mut cursor, FORMAT, &HS_MARKERS)?;
    let sex = if marker == HS_MALE_MARKER { Sex::Male } else { Sex::Female };

    let version = cursor.read_i32()?;
    if !(0..=MAX_HS_VERSION).contains(&version) {
        return Err(CardError::UnsupportedVersion {
            format: FORMAT,
            version: i64::from(version),
        });
    }

    let count = cursor.read_count()?;
    let table = read_fixed_table(&mut cursor, count)?;
    let base = cursor.position();
    let data_len: u64 = table.iter().map(|d| d.size).sum();
    let segments = read_segments(&mut cursor, base, &table, data_len)?;

    let signature = read_signature(&mut cursor, base + data_len, version);
    let name = match preview_name(&segments) {
        Ok(name) => name,
        Err(e) => {
            debug!(error = %e, "Could not read Honey Select display name");
            String::new()
        }
    };

    Ok(HoneySelectCard {
        marker,
        sex,
        version,
        segments,
        signature,
        name,
    })
}

/// Trailing signature. A short read is tolerated and logged.
fn read_signature(cursor: &mut ByteCursor<'_>, at: u64, version: i32) -> Option<Vec<u8>> {
    let len = signature_len(version);
    let read = cursor
        .seek(SeekFrom::Start(at))
        .and_then(|_| cursor.read_bytes(len));
    match read {
        Ok(bytes) => {
            trace!(offset = at, signature = %checksum_hex(bytes), "Honey Select signature");
            Some(bytes.to_vec())
        }
        Err(e) => {
            warn!(offset = at, expected = len, error = %e, "Honey Select signature missing");
            None
        }
    }
}

/// Display name from the preview segment.
fn preview_name(segments: &SegmentSet) -> Result<String> {
    let Some(segment) = segments.get(PREVIEW_SEGMENT) else {
        return Ok(String::new());
    };
    let version = segment.version.as_i64().unwrap_or(0);
    let mut cursor = ByteCursor::new(&segment.data);

    if version >= 4 {
        cursor.skip(4)?; // product no
    }
    cursor.skip(4)?; // sex
    if version < 2 {
        return Ok(String::new());
    }
    cursor.skip(8)?; // personality + name length
    cursor.read_var_string()
}
