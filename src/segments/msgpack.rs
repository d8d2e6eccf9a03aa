//! MessagePack segment tables (`{"lstInfo": [{name, version, pos, size}, ...]}`)
//! and the loosely typed parameter maps stored inside segments.
//!
//! Numbers in these tables come from several writers and are not always
//! stored as integers, so every numeric field goes through an explicit
//! coercion that either yields a value or fails loudly.

use std::io::SeekFrom;

use rmpv::Value;
use tracing::{debug, warn};

use super::types::{Segment, SegmentDescriptor, SegmentSet, SegmentVersion};
use crate::common::binary::ByteCursor;
use crate::error::{CardError, Result};

const TABLE_KEY: &str = "lstInfo";

// =============================================================================
// Coercion
// =============================================================================

/// Coerce a table number to u64.
///
/// Accepts non-negative integers of any width, integral non-negative floats
/// and decimal or `0x` hex strings.
pub fn coerce_u64(value: &Value, field: &str) -> Result<u64> {
    let bad = || CardError::SegmentTable(format!("field '{field}' is not a non-negative integer: {value}"));
    match value {
        Value::Integer(i) => i.as_u64().ok_or_else(bad),
        Value::F32(f) => float_to_u64(f64::from(*f)).ok_or_else(bad),
        Value::F64(f) => float_to_u64(*f).ok_or_else(bad),
        Value::String(s) => s.as_str().and_then(parse_number_text).ok_or_else(bad),
        _ => Err(bad()),
    }
}

/// Coerce a parameter number to i64. Same rules as [`coerce_u64`] but signed.
pub fn coerce_i64(value: &Value, field: &str) -> Result<i64> {
    let bad = || CardError::SegmentTable(format!("field '{field}' is not an integer: {value}"));
    match value {
        Value::Integer(i) => i.as_i64().ok_or_else(bad),
        Value::F32(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
        Value::F64(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
        Value::String(s) => s
            .as_str()
            .and_then(|t| t.trim().parse::<i64>().ok())
            .ok_or_else(bad),
        _ => Err(bad()),
    }
}

fn float_to_u64(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
}

fn parse_number_text(text: &str) -> Option<u64> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

fn coerce_version(value: &Value) -> Result<SegmentVersion> {
    match value {
        Value::String(s) => s
            .as_str()
            .map(|t| SegmentVersion::Text(t.to_string()))
            .ok_or_else(|| CardError::SegmentTable("version is not valid UTF-8".to_string())),
        Value::Integer(i) => i
            .as_i64()
            .map(SegmentVersion::Number)
            .ok_or_else(|| CardError::SegmentTable(format!("version out of range: {i}"))),
        other => Err(CardError::SegmentTable(format!("unsupported version value: {other}"))),
    }
}

// =============================================================================
// Maps
// =============================================================================

/// Decoded MessagePack map with string keys looked up linearly.
#[derive(Debug, Clone)]
pub struct ParamMap {
    entries: Vec<(Value, Value)>,
}

impl ParamMap {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = bytes;
        let value = rmpv::decode::read_value(&mut reader)
            .map_err(|e| CardError::SegmentTable(format!("msgpack decode: {e}")))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Map(entries) => Ok(Self { entries }),
            other => Err(CardError::SegmentTable(format!("expected a map, found {other}"))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Integer field, `None` when absent
    pub fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.get(key).map(|v| coerce_i64(v, key)).transpose()
    }

    /// String field; absent or nil yields an empty string
    pub fn get_string(&self, key: &str) -> Result<String> {
        match self.get(key) {
            None | Some(Value::Nil) => Ok(String::new()),
            Some(Value::String(s)) => s
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| CardError::SegmentTable(format!("field '{key}' is not valid UTF-8"))),
            Some(other) => Err(CardError::SegmentTable(format!(
                "field '{key}' is not a string: {other}"
            ))),
        }
    }
}

// =============================================================================
// Table Codec
// =============================================================================

/// Decode a `lstInfo` table.
pub fn decode_table(bytes: &[u8]) -> Result<Vec<SegmentDescriptor>> {
    let map = ParamMap::decode(bytes)?;
    let list = match map.get(TABLE_KEY) {
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(CardError::SegmentTable(format!("'{TABLE_KEY}' is not an array: {other}")))
        }
        None => return Err(CardError::SegmentTable(format!("missing '{TABLE_KEY}'"))),
    };

    list.iter()
        .map(|item| {
            let entry = ParamMap::from_value(item.clone())?;
            let name = match entry.get("name") {
                Some(Value::String(s)) => s
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| CardError::SegmentTable("segment name is not valid UTF-8".into()))?,
                _ => return Err(CardError::SegmentTable("segment without a name".into())),
            };
            Ok(SegmentDescriptor {
                version: coerce_version(required(&entry, &name, "version")?)?,
                pos: coerce_u64(required(&entry, &name, "pos")?, "pos")?,
                size: coerce_u64(required(&entry, &name, "size")?, "size")?,
                name,
            })
        })
        .collect()
}

fn required<'m>(entry: &'m ParamMap, name: &str, key: &str) -> Result<&'m Value> {
    entry
        .get(key)
        .ok_or_else(|| CardError::SegmentTable(format!("segment '{name}' missing '{key}'")))
}

/// Encode descriptors as a `lstInfo` table.
pub fn encode_table(table: &[SegmentDescriptor]) -> Result<Vec<u8>> {
    let rows = table
        .iter()
        .map(|d| {
            let version = match &d.version {
                SegmentVersion::Text(s) => Value::from(s.as_str()),
                SegmentVersion::Number(n) => Value::from(*n),
            };
            Value::Map(vec![
                (Value::from("name"), Value::from(d.name.as_str())),
                (Value::from("version"), version),
                (Value::from("pos"), Value::from(d.pos)),
                (Value::from("size"), Value::from(d.size)),
            ])
        })
        .collect();
    let root = Value::Map(vec![(Value::from(TABLE_KEY), Value::Array(rows))]);

    let mut out = Vec::new();
    rmpv::encode::write_value(&mut out, &root)
        .map_err(|e| CardError::SegmentTable(format!("msgpack encode: {e}")))?;
    Ok(out)
}

/// Segment table and data laid out for writing.
#[derive(Debug, Clone)]
pub struct TableLayout {
    pub table: Vec<SegmentDescriptor>,
    pub data: Vec<u8>,
}

/// Lay out segments in `key_order`, with `extra` listed first but stored last.
///
/// Positions are recomputed from 0. Segments that are neither in the key
/// order nor the extra key are left out.
pub fn ordered_layout(set: &SegmentSet, key_order: &[&str], extra: Option<&str>) -> TableLayout {
    let mut table = Vec::with_capacity(set.len());
    let mut data = Vec::with_capacity(set.total_size() as usize);

    let mut place = |segment: &Segment| {
        let desc = SegmentDescriptor {
            name: segment.name.clone(),
            version: segment.version.clone(),
            pos: data.len() as u64,
            size: segment.data.len() as u64,
        };
        data.extend_from_slice(&segment.data);
        desc
    };

    for key in key_order {
        if let Some(segment) = set.get(key) {
            let desc = place(segment);
            table.push(desc);
        }
    }

    if let Some(segment) = extra.and_then(|key| set.get(key)) {
        let desc = place(segment);
        table.insert(0, desc);
    }

    for segment in set.iter() {
        let known = key_order.contains(&segment.name.as_str()) || extra == Some(segment.name.as_str());
        if !known {
            debug!(name = %segment.name, "Dropping segment outside the known layout");
        }
    }

    TableLayout { table, data }
}

/// Fetch every described segment from `base + pos`.
///
/// `declared_size` is the record's data length; a mismatch with the table is
/// logged but tolerated. The cursor is left at `base + declared_size`.
pub fn read_segments(
    cursor: &mut ByteCursor<'_>,
    base: u64,
    table: &[SegmentDescriptor],
    declared_size: u64,
) -> Result<SegmentSet> {
    let mut set = SegmentSet::new();
    for desc in table {
        let start = base
            .checked_add(desc.pos)
            .ok_or_else(|| CardError::SegmentTable(format!("segment '{}' offset overflows", desc.name)))?;
        let size = usize::try_from(desc.size)
            .map_err(|_| CardError::SegmentTable(format!("segment '{}' is too large", desc.name)))?;
        cursor.seek(SeekFrom::Start(start))?;
        let bytes = cursor.read_bytes(size)?;
        set.push(Segment::new(desc.name.clone(), desc.version.clone(), bytes.to_vec()))?;
    }

    let table_size: u64 = table.iter().map(|d| d.size).sum();
    if table_size != declared_size {
        warn!(table_size, declared_size, "Segment sizes disagree with declared data length");
    }

    cursor.seek(SeekFrom::Start(base.saturating_add(declared_size)))?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(v: &str) -> SegmentVersion {
        SegmentVersion::Text(v.to_string())
    }

    fn set_of(names: &[(&str, &[u8])]) -> SegmentSet {
        let mut set = SegmentSet::new();
        for (name, data) in names {
            set.push(Segment::new(*name, text("0.0.0"), data.to_vec())).unwrap();
        }
        set
    }

    #[test]
    fn test_table_round_trip_renumbers_positions() {
        let set = set_of(&[("Custom", &b"aaaa"[..]), ("Parameter", &b"bb"[..])]);
        let layout = ordered_layout(&set, &["Custom", "Coordinate", "Parameter"], None);
        let bytes = encode_table(&layout.table).unwrap();
        let table = decode_table(&bytes).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].name, "Custom");
        assert_eq!((table[0].pos, table[0].size), (0, 4));
        assert_eq!(table[1].name, "Parameter");
        assert_eq!((table[1].pos, table[1].size), (4, 2));
        assert_eq!(layout.data, b"aaaabb");
    }

    #[test]
    fn test_extra_segment_listed_first_stored_last() {
        let set = set_of(&[("KKEx", &b"zz"[..]), ("Custom", &b"c"[..]), ("Status", &b"ss"[..])]);
        let layout = ordered_layout(&set, &["Custom", "Status"], Some("KKEx"));
        assert_eq!(layout.table[0].name, "KKEx");
        assert_eq!(layout.table[0].pos, 3);
        assert_eq!(layout.table[1].name, "Custom");
        assert_eq!(layout.data, b"csszz");
    }

    #[test]
    fn test_unknown_segments_dropped() {
        let set = set_of(&[("Custom", &b"c"[..]), ("Mystery", &b"m"[..])]);
        let layout = ordered_layout(&set, &["Custom"], None);
        assert_eq!(layout.table.len(), 1);
        assert_eq!(layout.data, b"c");
    }

    #[test]
    fn test_coerce_u64_accepts_closed_set() {
        assert_eq!(coerce_u64(&Value::from(42u8), "pos").unwrap(), 42);
        assert_eq!(coerce_u64(&Value::from(7.0f64), "pos").unwrap(), 7);
        assert_eq!(coerce_u64(&Value::from("0x10"), "pos").unwrap(), 16);
        assert_eq!(coerce_u64(&Value::from(" 12 "), "pos").unwrap(), 12);
    }

    #[test]
    fn test_coerce_u64_rejects_everything_else() {
        assert!(coerce_u64(&Value::from(-1i32), "pos").is_err());
        assert!(coerce_u64(&Value::from(1.5f64), "pos").is_err());
        assert!(coerce_u64(&Value::from("abc"), "pos").is_err());
        assert!(coerce_u64(&Value::Boolean(true), "pos").is_err());
        assert!(coerce_u64(&Value::Nil, "pos").is_err());
    }

    #[test]
    fn test_decode_table_missing_list() {
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &Value::Map(vec![])).unwrap();
        assert!(matches!(decode_table(&bytes), Err(CardError::SegmentTable(_))));
    }

    #[test]
    fn test_read_segments_from_base() {
        let data = b"HEADERxxyyy";
        let table = vec![
            SegmentDescriptor { name: "A".into(), version: text("1"), pos: 0, size: 2 },
            SegmentDescriptor { name: "B".into(), version: text("1"), pos: 2, size: 3 },
        ];
        let mut cursor = ByteCursor::new(data);
        let set = read_segments(&mut cursor, 6, &table, 5).unwrap();
        assert_eq!(set.require("A").unwrap(), b"xx");
        assert_eq!(set.require("B").unwrap(), b"yyy");
        assert_eq!(cursor.position(), 11);
    }

    #[test]
    fn test_read_segments_rejects_duplicates() {
        let data = b"abcd";
        let row = SegmentDescriptor { name: "A".into(), version: text("1"), pos: 0, size: 1 };
        let mut cursor = ByteCursor::new(data);
        let result = read_segments(&mut cursor, 0, &[row.clone(), row], 2);
        assert!(matches!(result, Err(CardError::SegmentTable(_))));
    }

    #[test]
    fn test_param_map_fields() {
        let value = Value::Map(vec![
            (Value::from("sex"), Value::from(1)),
            (Value::from("fullname"), Value::from("Yui")),
        ]);
        let mut bytes = Vec::new();
        rmpv::encode::write_value(&mut bytes, &value).unwrap();
        let map = ParamMap::decode(&bytes).unwrap();
        assert_eq!(map.get_i64("sex").unwrap(), Some(1));
        assert_eq!(map.get_string("fullname").unwrap(), "Yui");
        assert_eq!(map.get_string("nickname").unwrap(), "");
        assert!(map.get_string("sex").is_err());
    }
}
