// Keyed checksums for card trailers
//
// Honey Select v2 cards end with an HMAC-SHA256 over the preview image keyed
// by the card marker.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{CardError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Size of an HMAC-SHA256 digest
pub const KEYED_CHECKSUM_LEN: usize = 32;

/// HMAC-SHA256 of `data` keyed by `key`
pub fn keyed_checksum(key: &[u8], data: &[u8]) -> Result<[u8; KEYED_CHECKSUM_LEN]> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|_| CardError::InvalidData("invalid HMAC key length".to_string()))?;
    mac.update(data);
    let mut out = [0u8; KEYED_CHECKSUM_LEN];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Hex rendering of a checksum, for logs and listings
pub fn checksum_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
