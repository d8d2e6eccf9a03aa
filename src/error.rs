//! Error types for card decoding, encoding and scene extraction.

use thiserror::Error;

/// Every failure the codecs and the extraction pipeline can report.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A read needed more bytes than remain in the buffer.
    #[error("Truncated data at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// A seek would land before the start of the buffer.
    #[error("Seek out of range: {0}")]
    OutOfRange(i64),

    /// A 7-bit length prefix ran past five bytes.
    #[error("Malformed length prefix at offset {0}")]
    MalformedVarint(u64),

    #[error("Invalid UTF-8 string at offset {0}")]
    InvalidString(u64),

    #[error("Unsupported {format} version: {version}")]
    UnsupportedVersion { format: &'static str, version: i64 },

    /// The marker read from the stream is not one the codec accepts.
    #[error("Unexpected marker '{found}' for {format} card")]
    MarkerMismatch { format: &'static str, found: String },

    #[error("PNG end-of-image trailer not found")]
    TrailerNotFound,

    #[error("Not a PNG image file")]
    NotAnImageFile,

    #[error("Segment table error: {0}")]
    SegmentTable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Scene object nesting exceeded the decoder's limit.
    #[error("Scene tree nested deeper than {0} levels")]
    DepthLimit(usize),

    #[error("Preview image encoding failed: {0}")]
    Preview(String),
}

impl From<png::EncodingError> for CardError {
    fn from(err: png::EncodingError) -> Self {
        CardError::Preview(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CardError>;
