// Layout shared by the MessagePack-table cards (Koikatu, AI Shoujo)
//
// [product no i32][marker str][version str][format fields...]
// [header len i32][lstInfo msgpack][data len i64][segment bytes...]

use crate::common::binary::{ByteCursor, ByteWriter};
use crate::error::{CardError, Result};
use super::types::Sex;
use crate::segments::{decode_table, encode_table, ordered_layout, read_segments, ParamMap, SegmentSet};

/// Highest product number either game writes
pub const MAX_PRODUCT_NO: i32 = 100;

/// Segment stored after the well-known ones by modding tools
pub const EXTRA_SEGMENT: &str = "KKEx";

/// Bytes from record start to the marker text: product no + length prefix
pub const TABLE_MARKER_LEAD: u64 = 5;

pub fn read_product_no(cursor: &mut ByteCursor<'_>, format: &'static str) -> Result<i32> {
    let product_no = cursor.read_i32()?;
    if product_no > MAX_PRODUCT_NO {
        return Err(CardError::UnsupportedVersion {
            format,
            version: i64::from(product_no),
        });
    }
    Ok(product_no)
}

/// Read the marker string and check it is one of `allowed`.
pub fn read_marker(cursor: &mut ByteCursor<'_>, format: &'static str, allowed: &[&str]) -> Result<String> {
    let marker = cursor.read_var_string()?;
    if !allowed.contains(&marker.as_str()) {
        return Err(CardError::MarkerMismatch { format, found: marker });
    }
    Ok(marker)
}

/// Decoded `Parameter` segment
pub fn read_parameters(segments: &SegmentSet) -> Result<ParamMap> {
    ParamMap::decode(segments.require("Parameter")?)
}

/// `sex` field of a parameter map
pub fn param_sex(params: &ParamMap) -> Result<Sex> {
    let tag = params
        .get_i64("sex")?
        .ok_or_else(|| CardError::InvalidData("Parameter has no 'sex' field".to_string()))?;
    let tag = i32::try_from(tag)
        .map_err(|_| CardError::InvalidData(format!("sex tag {tag} out of range")))?;
    Ok(Sex::from_tag(tag))
}

/// Read the header table, the data length and every segment.
pub fn read_table_body(cursor: &mut ByteCursor<'_>) -> Result<SegmentSet> {
    let header_len = cursor.read_count()?;
    let header = cursor.read_bytes(header_len)?;
    let table = decode_table(header)?;

    let data_len = cursor.read_i64()?;
    let data_len = u64::try_from(data_len)
        .map_err(|_| CardError::InvalidData(format!("negative data length {data_len}")))?;
    let base = cursor.position();
    read_segments(cursor, base, &table, data_len)
}

/// Write the header table, the data length and the segment bytes.
pub fn write_table_body(
    w: &mut ByteWriter,
    segments: &SegmentSet,
    key_order: &[&str],
) -> Result<()> {
    let layout = ordered_layout(segments, key_order, Some(EXTRA_SEGMENT));
    let header = encode_table(&layout.table)?;
    w.write_count(header.len())?;
    w.write_bytes(&header);
    w.write_i64(layout.data.len() as i64);
    w.write_bytes(&layout.data);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::{Segment, SegmentVersion};

    #[test]
    fn test_table_body_round_trip() {
        let mut set = SegmentSet::new();
        for (name, data) in [("KKEx", &b"ex"[..]), ("Custom", &b"cust"[..]), ("Status", &b"st"[..])] {
            set.push(Segment::new(name, SegmentVersion::Text("0.0.0".into()), data.to_vec()))
                .unwrap();
        }
        let mut w = ByteWriter::new();
        write_table_body(&mut w, &set, &["Custom", "Status"]).unwrap();
        let bytes = w.into_inner();

        let mut cursor = ByteCursor::new(&bytes);
        let decoded = read_table_body(&mut cursor).unwrap();
        assert_eq!(decoded.require("Custom").unwrap(), b"cust");
        assert_eq!(decoded.require("Status").unwrap(), b"st");
        assert_eq!(decoded.require("KKEx").unwrap(), b"ex");
        assert_eq!(decoded.names(), vec!["KKEx", "Custom", "Status"]);
        assert_eq!(cursor.position(), bytes.len() as u64);
    }

    #[test]
    fn test_product_no_limit() {
        let data = 101i32.to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            read_product_no(&mut cursor, "test"),
            Err(CardError::UnsupportedVersion { version: 101, .. })
        ));
    }

    #[test]
    fn test_marker_mismatch() {
        let mut w = ByteWriter::new();
        w.write_var_string("【Other】").unwrap();
        let bytes = w.into_inner();
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            read_marker(&mut cursor, "test", &["【KoiKatuChara】"]),
            Err(CardError::MarkerMismatch { .. })
        ));
    }
}
