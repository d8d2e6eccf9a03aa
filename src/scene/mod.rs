//! Scene extraction pipeline
//!
//! Ties the codecs together: detect what kind of scene a file is, scan it
//! with the matching codecs, filter by sex, and write each character as a
//! standalone card next to the others without overwriting anything.

mod detection;
mod naming;
mod operations;
mod types;

pub use detection::{detect_scene, SceneKind};
pub use naming::{file_stem, timestamp};
pub use operations::{extract_from_bytes, extract_scene, scan_scene, ScannedRecord};
pub use types::{ExtractOptions, ExtractSummary, RecordInfo, RecordOutcome, SexFilter};
