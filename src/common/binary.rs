// Shared binary reading and writing utilities for card codecs
//
// All card formats are little-endian and length-prefix their strings with a
// 7-bit varint, so the cursor and writer below cover every codec.

use std::io::SeekFrom;

use crate::error::{CardError, Result};

/// Longest varint length prefix accepted (enough for a u32)
const MAX_VARINT_BYTES: usize = 5;

// =============================================================================
// Pattern Search
// =============================================================================

/// Find every non-overlapping occurrence of `pattern` in `haystack`.
///
/// Offsets are returned in ascending order. After a match the search resumes
/// right past the matched bytes.
pub fn find_all(haystack: &[u8], pattern: &[u8]) -> Vec<u64> {
    let mut offsets = Vec::new();
    if pattern.is_empty() || pattern.len() > haystack.len() {
        return offsets;
    }

    let mut i = 0;
    while i + pattern.len() <= haystack.len() {
        if &haystack[i..i + pattern.len()] == pattern {
            offsets.push(i as u64);
            i += pattern.len();
        } else {
            i += 1;
        }
    }
    offsets
}

/// First occurrence of `pattern` at or after `start`
pub fn find_from(haystack: &[u8], pattern: &[u8], start: usize) -> Option<usize> {
    if pattern.is_empty() || start >= haystack.len() {
        return None;
    }
    haystack[start..]
        .windows(pattern.len())
        .position(|w| w == pattern)
        .map(|p| p + start)
}

// =============================================================================
// ByteCursor
// =============================================================================

/// Sequential, seekable reader over an in-memory buffer.
///
/// Reads advance the position. A read that runs past the end fails with
/// [`CardError::Truncated`] and leaves the cursor at the end of the data.
/// Seeking past the end is allowed; the next read then fails.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: u64,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Cursor positioned at `pos`
    pub fn at(data: &'a [u8], pos: u64) -> Self {
        Self { data, pos }
    }

    #[inline]
    pub fn position(&self) -> u64 {
        self.pos
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.data.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes left between the position and the end of the buffer
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos as usize)
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move the cursor. Returns the new absolute position.
    pub fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        let (base, delta) = match target {
            SeekFrom::Start(offset) => {
                self.pos = offset;
                return Ok(offset);
            }
            SeekFrom::Current(delta) => (to_signed(self.pos)?, delta),
            SeekFrom::End(delta) => (to_signed(self.data.len() as u64)?, delta),
        };
        let new_pos = base
            .checked_add(delta)
            .ok_or(CardError::OutOfRange(delta))?;
        if new_pos < 0 {
            return Err(CardError::OutOfRange(new_pos));
        }
        self.pos = new_pos as u64;
        Ok(self.pos)
    }

    /// Skip `n` bytes that must exist in the buffer.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if n > available {
            let offset = self.pos;
            self.pos = self.pos.max(self.data.len() as u64);
            return Err(CardError::Truncated {
                offset,
                needed: n,
                available,
            });
        }
        let start = self.pos as usize;
        self.pos += n as u64;
        Ok(&self.data[start..start + n])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_bytes(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    /// Read an i32 element count. Negative counts are rejected.
    pub fn read_count(&mut self) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        usize::try_from(count)
            .map_err(|_| CardError::InvalidData(format!("negative count {count} at offset {offset}")))
    }

    /// Read a 7-bit varint (high bit = continuation), at most five bytes.
    pub fn read_varint(&mut self) -> Result<u32> {
        let start = self.pos;
        let mut value: u64 = 0;
        for i in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7F) << (7 * i);
            if byte & 0x80 == 0 {
                return u32::try_from(value).map_err(|_| CardError::MalformedVarint(start));
            }
        }
        Err(CardError::MalformedVarint(start))
    }

    /// Varint length prefix followed by that many UTF-8 bytes.
    pub fn read_var_string(&mut self) -> Result<String> {
        let len = self.read_varint()? as usize;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CardError::InvalidString(offset))
    }

    /// Fixed-width string, optionally trimming trailing NUL padding.
    pub fn read_fixed_string(&mut self, n: usize, trim_trailing_zero: bool) -> Result<String> {
        let offset = self.pos;
        let mut bytes = self.read_bytes(n)?;
        if trim_trailing_zero {
            let end = bytes.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
            bytes = &bytes[..end];
        }
        String::from_utf8(bytes.to_vec()).map_err(|_| CardError::InvalidString(offset))
    }
}

fn to_signed(pos: u64) -> Result<i64> {
    i64::try_from(pos).map_err(|_| CardError::OutOfRange(i64::MAX))
}

// =============================================================================
// ByteWriter
// =============================================================================

/// Growable little-endian writer mirroring [`ByteCursor`].
#[derive(Debug, Default, Clone)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_i32(&mut self, v: i32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_f32(&mut self, v: f32) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Write a collection length as an i32 count.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let count = i32::try_from(count)
            .map_err(|_| CardError::InvalidData(format!("count {count} does not fit in i32")))?;
        self.write_i32(count);
        Ok(())
    }

    pub fn write_varint(&mut self, mut v: u32) {
        while v >= 0x80 {
            self.buf.push((v as u8) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
    }

    /// Varint length prefix followed by the UTF-8 bytes.
    pub fn write_var_string(&mut self, s: &str) -> Result<()> {
        let len = u32::try_from(s.len())
            .map_err(|_| CardError::InvalidData(format!("string of {} bytes is too long", s.len())))?;
        self.write_varint(len);
        self.write_bytes(s.as_bytes());
        Ok(())
    }

    /// Write `s` into exactly `n` bytes, NUL-padded.
    pub fn write_fixed_string(&mut self, s: &str, n: usize) -> Result<()> {
        if s.len() > n {
            return Err(CardError::InvalidData(format!(
                "'{s}' does not fit in a {n}-byte field"
            )));
        }
        self.write_bytes(s.as_bytes());
        self.buf.resize(self.buf.len() + (n - s.len()), 0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_all_non_overlapping() {
        assert_eq!(find_all(b"aaaa", b"aa"), vec![0, 2]);
        assert_eq!(find_all(b"xabxxab", b"ab"), vec![1, 5]);
        assert!(find_all(b"abc", b"").is_empty());
        assert!(find_all(b"ab", b"abc").is_empty());
    }

    #[test]
    fn test_find_from() {
        assert_eq!(find_from(b"abcabc", b"abc", 1), Some(3));
        assert_eq!(find_from(b"abcabc", b"abc", 6), None);
    }

    #[test]
    fn test_read_little_endian() {
        let data = [0x01, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x34, 0x12];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_i32().unwrap(), 1);
        assert_eq!(cursor.read_i32().unwrap(), -1);
        assert_eq!(cursor.read_u8().unwrap(), 0x34);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_truncated_read_moves_to_end() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        cursor.read_u8().unwrap();
        let err = cursor.read_i32().unwrap_err();
        assert!(matches!(err, CardError::Truncated { offset: 1, needed: 4, available: 2 }));
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_seek_before_start_fails() {
        let data = [0u8; 4];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(cursor.seek(SeekFrom::Current(-1)), Err(CardError::OutOfRange(-1))));
        assert_eq!(cursor.seek(SeekFrom::End(-1)).unwrap(), 3);
        // Past the end is fine until the next read
        assert_eq!(cursor.seek(SeekFrom::Start(10)).unwrap(), 10);
        assert!(cursor.read_u8().is_err());
    }

    #[test]
    fn test_relative_seek_from_huge_position_fails() {
        let data = [0u8; 4];
        let mut cursor = ByteCursor::new(&data);
        cursor.seek(SeekFrom::Start(u64::MAX)).unwrap();
        assert!(matches!(cursor.seek(SeekFrom::Current(-1)), Err(CardError::OutOfRange(_))));
        assert_eq!(cursor.position(), u64::MAX);
    }

    #[test]
    fn test_varint_round_trip() {
        for value in [0u32, 1, 0x7F, 0x80, 0x3FFF, 0x4000, 0x1F_FFFF, 0x0FFF_FFFF, u32::MAX] {
            let mut w = ByteWriter::new();
            w.write_varint(value);
            let bytes = w.into_inner();
            let mut cursor = ByteCursor::new(&bytes);
            assert_eq!(cursor.read_varint().unwrap(), value);
            assert_eq!(cursor.remaining(), 0);
        }
    }

    #[test]
    fn test_varint_rejects_six_bytes() {
        let data = [0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(cursor.read_varint(), Err(CardError::MalformedVarint(0))));
    }

    #[test]
    fn test_var_string() {
        let mut w = ByteWriter::new();
        w.write_var_string("【KStudio】").unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes[0] as usize, "【KStudio】".len());
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_var_string().unwrap(), "【KStudio】");
    }

    #[test]
    fn test_var_string_invalid_utf8() {
        let data = [0x02, 0xFF, 0xFE];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(cursor.read_var_string(), Err(CardError::InvalidString(1))));
    }

    #[test]
    fn test_fixed_string_trim() {
        let mut w = ByteWriter::new();
        w.write_fixed_string("tag", 8).unwrap();
        assert_eq!(w.len(), 8);
        let bytes = w.into_inner();
        let mut cursor = ByteCursor::new(&bytes);
        assert_eq!(cursor.read_fixed_string(8, true).unwrap(), "tag");
        assert!(ByteWriter::new().write_fixed_string("toolong", 3).is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let data = (-1i32).to_le_bytes();
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(cursor.read_count(), Err(CardError::InvalidData(_))));
    }
}
