// Common utilities shared across card codecs

pub mod binary;
pub mod buffer;
pub mod hash;
pub mod magic;
pub mod path_security;
pub mod preview;

// Re-exports for convenience
pub use binary::{find_all, ByteCursor, ByteWriter};
pub use buffer::SceneBuffer;
pub use hash::keyed_checksum;
pub use magic::{is_png, payload_offset, IEND_TRAILER, PNG_SIGNATURE};
pub use preview::{card_preview, make_preview_image};
