// In-memory scene file with its payload boundary

use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

use super::binary::{find_all, find_from};
use super::magic::{is_png, payload_offset};
use crate::error::{CardError, Result};

/// Immutable bytes of one input file plus the cached payload offset.
///
/// Built once when a file is loaded and shared read-only by every codec.
#[derive(Debug, Clone)]
pub struct SceneBuffer {
    data: Vec<u8>,
    payload_offset: u64,
}

impl SceneBuffer {
    /// Read a scene file from disk.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        debug!(size = data.len(), "Loaded scene file");
        Self::from_bytes(data)
    }

    /// Wrap bytes already in memory. Fails if they are not a PNG with a
    /// detectable end-of-image.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if !is_png(&data) {
            return Err(CardError::NotAnImageFile);
        }
        let payload_offset = payload_offset(&data)?;
        Ok(Self {
            data,
            payload_offset,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Offset of the first byte after the host image
    pub fn payload_offset(&self) -> u64 {
        self.payload_offset
    }

    /// Bytes after the host image
    pub fn payload(&self) -> &[u8] {
        &self.data[self.payload_offset as usize..]
    }

    /// Occurrences of `marker` at or after the payload offset
    pub fn find_marker(&self, marker: &str) -> Vec<u64> {
        find_all(&self.data, marker.as_bytes())
            .into_iter()
            .filter(|&offset| offset >= self.payload_offset)
            .collect()
    }

    /// True if `marker` appears anywhere in the payload
    pub fn contains_marker(&self, marker: &str) -> bool {
        !self.find_marker(marker).is_empty()
    }

    /// True if a scene marker occurs past the first byte of the file.
    ///
    /// Studio writes its scene tag wherever the game put it, so unlike
    /// record markers this check covers the host image too.
    pub fn has_scene_marker(&self, marker: &str) -> bool {
        find_from(&self.data, marker.as_bytes(), 1).is_some()
    }
}
