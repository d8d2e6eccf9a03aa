//! PNG host image detection and payload boundary search
//!
//! Scene and card files are ordinary PNG images with a binary payload glued
//! after the image data:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ PNG Signature: 89 50 4E 47 0D 0A 1A 0A                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Chunks: [len u32 BE][type 4][data len][crc u32 BE] ...       │
//! │  - IHDR, IDAT..., IEND                                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │ Appended payload (scene data, embedded card records)         │  <- payload offset
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The payload may itself contain complete PNG images (face previews), so
//! the boundary is the end of the *first* IEND chunk, never the last.

use tracing::{debug, trace};

use super::binary::find_from;
use crate::error::{CardError, Result};

// =============================================================================
// Signatures
// =============================================================================

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// `IEND` chunk type plus its fixed CRC
pub const IEND_TRAILER: [u8; 8] = [0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82];

const IEND_TYPE: &[u8; 4] = b"IEND";

/// Chunk length + type + CRC
const CHUNK_OVERHEAD: usize = 12;

/// True if `data` starts with the PNG signature
#[inline]
pub fn is_png(data: &[u8]) -> bool {
    data.len() >= PNG_SIGNATURE.len() && data[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
}

// =============================================================================
// Boundary Detection
// =============================================================================

/// Offset of the first byte after the host image.
///
/// Walks the chunk list with CRC validation. If the walk hits a corrupt
/// chunk, falls back to scanning for the first IEND trailer.
pub fn payload_offset(data: &[u8]) -> Result<u64> {
    if !is_png(data) {
        return Err(CardError::NotAnImageFile);
    }

    if let Some(end) = walk_chunks(data) {
        debug!(offset = end, "Payload boundary found by chunk walk");
        return Ok(end as u64);
    }

    match find_from(data, &IEND_TRAILER, PNG_SIGNATURE.len()) {
        Some(pos) => {
            let end = pos + IEND_TRAILER.len();
            debug!(offset = end, "Payload boundary found by trailer scan");
            Ok(end as u64)
        }
        None => Err(CardError::TrailerNotFound),
    }
}

/// Follow chunk lengths to the end of IEND. `None` on any inconsistency.
fn walk_chunks(data: &[u8]) -> Option<usize> {
    let mut pos = PNG_SIGNATURE.len();
    loop {
        let header = data.get(pos..pos + 8)?;
        let length = u32::from_be_bytes([header[0], header[1], header[2], header[3]]) as usize;
        let chunk_type = &header[4..8];
        let body_end = pos.checked_add(8)?.checked_add(length)?;
        let body = data.get(pos + 4..body_end)?;
        let crc_bytes = data.get(body_end..body_end + 4)?;
        let stored = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

        if crc32fast::hash(body) != stored {
            trace!(offset = pos, "PNG chunk CRC mismatch");
            return None;
        }
        pos += length + CHUNK_OVERHEAD;
        if chunk_type == IEND_TYPE {
            return Some(pos);
        }
    }
}
