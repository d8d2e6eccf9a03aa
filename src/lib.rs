//! Extract character cards from game Studio scene files.
//!
//! A scene is a PNG with the scene data appended after the image. The data
//! embeds the characters placed in the scene; this crate finds them, decodes
//! them, and re-encodes each as a standalone card the game can load.
//!
//! Supported games: AI Shoujo, Honey Select 2, Koikatu, Honey Select and
//! PlayHome.

pub mod aishoujo;
pub mod chara;
pub mod common;
pub mod error;
pub mod honeyselect;
pub mod koikatu;
pub mod logging;
pub mod playhome;
pub mod scene;
pub mod segments;

pub use chara::{CardCodec, CardFormat, Record, Sex};
pub use error::{CardError, Result};
pub use scene::{extract_from_bytes, extract_scene, ExtractOptions, ExtractSummary, SexFilter};
