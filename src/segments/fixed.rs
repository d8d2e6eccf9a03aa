//! Fixed-width segment table used by Honey Select cards.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ Tag (128 bytes, NUL padded UTF-8)            │
//! │ Version (i32)                                │
//! │ Pos (i64, relative to end of table)          │
//! │ Size (i64)                                   │
//! └──────────────────────────────────────────────┘  x count
//! ```

use super::types::{SegmentDescriptor, SegmentVersion};
use crate::common::binary::{ByteCursor, ByteWriter};
use crate::error::{CardError, Result};

/// Width of the NUL-padded tag field
pub const TAG_LEN: usize = 128;

/// Bytes per table entry
pub const ENTRY_LEN: usize = TAG_LEN + 4 + 8 + 8;

fn non_negative(value: i64, what: &str, tag: &str) -> Result<u64> {
    u64::try_from(value)
        .map_err(|_| CardError::SegmentTable(format!("segment '{tag}' has negative {what} {value}")))
}

/// Read `count` fixed-width entries.
pub fn read_fixed_table(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Vec<SegmentDescriptor>> {
    let mut table = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let name = cursor.read_fixed_string(TAG_LEN, true)?;
        let version = cursor.read_i32()?;
        let pos = cursor.read_i64()?;
        let size = cursor.read_i64()?;
        table.push(SegmentDescriptor {
            pos: non_negative(pos, "position", &name)?,
            size: non_negative(size, "size", &name)?,
            version: SegmentVersion::Number(i64::from(version)),
            name,
        });
    }
    Ok(table)
}

/// Write entries in the fixed-width layout.
pub fn write_fixed_table(w: &mut ByteWriter, table: &[SegmentDescriptor]) -> Result<()> {
    for desc in table {
        let version = desc
            .version
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .ok_or_else(|| {
                CardError::SegmentTable(format!(
                    "segment '{}' version '{}' is not a 32-bit integer",
                    desc.name, desc.version
                ))
            })?;
        let pos = i64::try_from(desc.pos)
            .map_err(|_| CardError::SegmentTable(format!("segment '{}' position too large", desc.name)))?;
        let size = i64::try_from(desc.size)
            .map_err(|_| CardError::SegmentTable(format!("segment '{}' size too large", desc.name)))?;

        w.write_fixed_string(&desc.name, TAG_LEN)?;
        w.write_i32(version);
        w.write_i64(pos);
        w.write_i64(size);
    }
    Ok(())
}
