//! Type definitions for segment tables

use serde::Serialize;
use std::fmt;

use crate::error::{CardError, Result};

/// Segment version as stored in the table.
///
/// MessagePack tables carry dotted version strings; the fixed-array table
/// carries a plain integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SegmentVersion {
    Text(String),
    Number(i64),
}

impl SegmentVersion {
    /// Integer view, parsing text versions when they are plain numbers
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SegmentVersion::Number(n) => Some(*n),
            SegmentVersion::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for SegmentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentVersion::Text(s) => f.write_str(s),
            SegmentVersion::Number(n) => write!(f, "{n}"),
        }
    }
}

/// One row of a segment table: a named byte range relative to the record's
/// data base offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentDescriptor {
    pub name: String,
    pub version: SegmentVersion,
    pub pos: u64,
    pub size: u64,
}

/// A decoded segment: descriptor metadata plus its bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub name: String,
    pub version: SegmentVersion,
    pub data: Vec<u8>,
}

impl Segment {
    pub fn new(name: impl Into<String>, version: SegmentVersion, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            version,
            data,
        }
    }
}

/// Ordered segments with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
}

impl SegmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment. Duplicate names are rejected.
    pub fn push(&mut self, segment: Segment) -> Result<()> {
        if self.contains(&segment.name) {
            return Err(CardError::SegmentTable(format!(
                "duplicate segment '{}'",
                segment.name
            )));
        }
        self.segments.push(segment);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// Bytes of a named segment, or an error naming what is missing
    pub fn require(&self, name: &str) -> Result<&[u8]> {
        self.get(name)
            .map(|s| s.data.as_slice())
            .ok_or_else(|| CardError::SegmentTable(format!("missing segment '{name}'")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.name.clone()).collect()
    }

    /// Sum of all segment sizes
    pub fn total_size(&self) -> u64 {
        self.segments.iter().map(|s| s.data.len() as u64).sum()
    }

    /// Table with positions recomputed as a running offset in set order
    pub fn sequential_table(&self) -> Vec<SegmentDescriptor> {
        let mut pos = 0u64;
        self.segments
            .iter()
            .map(|s| {
                let size = s.data.len() as u64;
                let desc = SegmentDescriptor {
                    name: s.name.clone(),
                    version: s.version.clone(),
                    pos,
                    size,
                };
                pos += size;
                desc
            })
            .collect()
    }

    /// Concatenated segment bytes in set order
    pub fn concat(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_size() as usize);
        for segment in &self.segments {
            out.extend_from_slice(&segment.data);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(name: &str, data: &[u8]) -> Segment {
        Segment::new(name, SegmentVersion::Text("0.0.0".into()), data.to_vec())
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut set = SegmentSet::new();
        set.push(seg("Custom", b"a")).unwrap();
        assert!(matches!(set.push(seg("Custom", b"b")), Err(CardError::SegmentTable(_))));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_sequential_table_positions() {
        let mut set = SegmentSet::new();
        set.push(seg("A", b"12")).unwrap();
        set.push(seg("B", b"345")).unwrap();
        let table = set.sequential_table();
        assert_eq!((table[0].pos, table[0].size), (0, 2));
        assert_eq!((table[1].pos, table[1].size), (2, 3));
        assert_eq!(set.concat(), b"12345");
        assert_eq!(set.total_size(), 5);
    }

    #[test]
    fn test_version_display() {
        assert_eq!(SegmentVersion::Text("0.0.1".into()).to_string(), "0.0.1");
        assert_eq!(SegmentVersion::Number(4).as_i64(), Some(4));
        assert_eq!(SegmentVersion::Text("7".into()).as_i64(), Some(7));
    }
}
