//! Segment tables
//!
//! Table-style cards (Koikatu, AI Shoujo) and fixed-array cards (Honey
//! Select) both describe their body as named byte ranges relative to one
//! base offset. The MessagePack table and the fixed-width table share the
//! same descriptor and segment types.

mod types;
pub mod fixed;
pub mod msgpack;

pub use types::{Segment, SegmentDescriptor, SegmentSet, SegmentVersion};
pub use msgpack::{decode_table, encode_table, ordered_layout, read_segments, ParamMap, TableLayout};
pub use fixed::{read_fixed_table, write_fixed_table};
