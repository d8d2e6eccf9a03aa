//! Format-independent card plumbing: the codec trait, the decoded record
//! union and the msgpack table layout shared by the table-style games.

pub mod codec;
pub mod record;
pub mod table;
mod types;

pub use codec::{CardCodec, Located, ScanFailure, ScanReport};
pub use record::Record;
pub use types::{CardFormat, Sex};
