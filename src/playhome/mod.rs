//! PlayHome Studio scenes
//!
//! PlayHome stores no segment table. The payload is the scene graph itself,
//! serialized depth-first, and characters are harvested while walking it:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Scene version ("1.0.0", read as hex digits)                  │
//! │ Object count (i32)                                           │
//! │ { key (i32), type (i32), object }*                           │
//! │   0 Character: header, sex, custom parameter, status,        │
//! │                bones, IK, child groups, animation tail       │
//! │   1 Item:      header, bones, child list                     │
//! │   2 Light:     header                                        │
//! │   3 Folder:    header, name, child list                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Extracted characters are written as standalone cards: preview, marker,
//! and the custom parameter normalized to version 10.

mod color;
mod custom;
mod parser;
mod tree;
mod types;
mod writer;

pub use color::ColorKind;
pub use custom::{read_custom_parameter, write_custom_parameter, NATIVE_FEMALE, NORMALIZED_VERSION};
pub use tree::{decode_scene, parse_scene_version, SceneWalker, MAX_DEPTH};
pub use types::{
    CustomParameter, ObjectNode, PlayHomeCard, PlayHomeScene, PH_FEMALE_MARKER, PH_MALE_MARKER,
    PH_MARKERS, PH_STUDIO_MARKER,
};

use tracing::{debug, warn};

use crate::chara::{CardCodec, ScanFailure, ScanReport};
use crate::common::SceneBuffer;
use crate::error::Result;

const PH_MARKER_LEAD: u64 = 1;

/// Codec for PlayHome characters
///
/// Scanning walks the scene tree; decoding a single record reads the
/// standalone card layout the encoder produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayHomeCodec;

impl CardCodec for PlayHomeCodec {
    type Card = PlayHomeCard;
    const FORMAT: &'static str = parser::FORMAT;

    fn markers(&self) -> &'static [&'static str] {
        &PH_MARKERS
    }

    fn marker_lead(&self) -> u64 {
        PH_MARKER_LEAD
    }

    fn decode_one(&self, data: &[u8], offset: u64) -> Result<PlayHomeCard> {
        parser::decode_card(data, offset)
    }

    fn encode_one(&self, card: &PlayHomeCard) -> Result<Vec<u8>> {
        writer::encode_card(card)
    }

    fn applies_to(&self, buffer: &SceneBuffer) -> bool {
        buffer.has_scene_marker(PH_STUDIO_MARKER)
    }

    /// Walk the scene tree from the payload offset.
    ///
    /// A walk that breaks off keeps the characters read before the break
    /// and records one failure at the scene start.
    fn scan(&self, buffer: &SceneBuffer) -> ScanReport<PlayHomeCard> {
        let start = buffer.payload_offset();
        let mut walker = SceneWalker::new();
        let outcome = walker.walk(buffer.data(), start);

        let mut report = ScanReport {
            cards: walker.characters,
            failures: Vec::new(),
        };
        match outcome {
            Ok((version, roots)) => {
                debug!(%version, objects = roots.len(), characters = report.cards.len(), "PlayHome scene walked");
            }
            Err(error) => {
                warn!(offset = start, kept = report.cards.len(), error = %error, "PlayHome scene walk stopped");
                report.failures.push(ScanFailure { offset: start, error });
            }
        }
        report
    }
}

/// Builders for synthetic PlayHome custom parameters and scenes
#[cfg(test)]
pub(crate) mod test_support {
    use super::tree::parse_scene_version;
    use super::types::*;
    use crate::common::binary::ByteWriter;

    fn zeros(w: &mut ByteWriter, n: usize) {
        w.write_bytes(&vec![0u8; n]);
    }

    /// Version 10 parameter with every flagged colour set to "use defaults"
    pub fn custom_v10(female: bool) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.write_i32(10);
        w.write_i32(if female { 0 } else { 1 });

        // hair: one part, colour always stored
        w.write_i32(1);
        w.write_i32(7);
        w.write_i32(1);
        zeros(&mut w, 56);
        w.write_i32(0);

        // head
        zeros(&mut w, 20);
        w.write_i32(0);
        for _ in 0..2 {
            zeros(&mut w, 40);
            w.write_f32(0.5);
        }
        zeros(&mut w, 20);
        w.write_i32(2);
        w.write_f32(0.25);
        w.write_f32(0.75);
        if female {
            w.write_i32(3);
            w.write_i32(0);
            zeros(&mut w, 80);
            w.write_i32(4);
            w.write_i32(0);
        } else {
            zeros(&mut w, 20);
            w.write_i32(0);
        }

        // body
        w.write_i32(1);
        w.write_i32(0);
        zeros(&mut w, 12);
        w.write_i32(0);
        zeros(&mut w, 20);
        w.write_i32(0);
        if female {
            w.write_i32(2);
            w.write_i32(0);
            zeros(&mut w, 20);
            w.write_i32(0);
            w.write_i32(0);
            zeros(&mut w, 12);
        }

        // wear
        for _ in 0..11 {
            zeros(&mut w, 8);
            w.write_i32(0);
        }
        if female {
            zeros(&mut w, 3);
        }

        // accessory
        for _ in 0..10 {
            zeros(&mut w, 48);
            w.write_i32(0);
        }
        w.into_inner()
    }

    /// Version 3 parameter: every colour is a bare 16-byte RGBA
    pub fn custom_v3(female: bool) -> Vec<u8> {
        let color = |w: &mut ByteWriter| {
            for v in [0.5f32, 0.25, 0.125, 1.0] {
                w.write_f32(v);
            }
        };
        let mut w = ByteWriter::new();
        w.write_i32(3);
        w.write_i32(if female { 0 } else { 1 });

        w.write_i32(1);
        w.write_i32(7);
        color(&mut w);
        color(&mut w);

        zeros(&mut w, 20);
        color(&mut w);
        color(&mut w); // shared sclera
        for _ in 0..2 {
            w.write_i32(5);
            color(&mut w);
        }
        zeros(&mut w, 20);
        w.write_i32(0);
        if female {
            zeros(&mut w, 4);
            color(&mut w);
            zeros(&mut w, 80);
            zeros(&mut w, 4);
            color(&mut w);
        } else {
            zeros(&mut w, 20);
            color(&mut w);
        }

        zeros(&mut w, 4);
        color(&mut w);
        zeros(&mut w, 12);
        color(&mut w);
        zeros(&mut w, 20);
        w.write_i32(0);
        if female {
            zeros(&mut w, 4);
            color(&mut w);
            zeros(&mut w, 20);
            color(&mut w);
            zeros(&mut w, 12);
        }

        for _ in 0..11 {
            zeros(&mut w, 8);
            color(&mut w);
        }
        if female {
            zeros(&mut w, 3);
        }
        for _ in 0..10 {
            zeros(&mut w, 48);
            color(&mut w);
        }
        w.into_inner()
    }

    /// Scene object for [`scene_payload`]
    pub enum Node {
        Character {
            scene_sex: i32,
            female: bool,
            name: &'static str,
            children: Vec<Node>,
        },
        Item(Vec<Node>),
        Light,
        Folder(&'static str, Vec<Node>),
    }

    fn object_info(w: &mut ByteWriter, with_state: bool) {
        w.write_i32(0);
        for _ in 0..3 {
            w.write_var_string("").unwrap();
        }
        if with_state {
            zeros(w, 5);
        }
    }

    fn child_list(w: &mut ByteWriter, version: i64, children: &[Node]) {
        w.write_count(children.len()).unwrap();
        for child in children {
            node(w, version, child);
        }
    }

    fn node(w: &mut ByteWriter, version: i64, node_ref: &Node) {
        match node_ref {
            Node::Character { scene_sex, female, name, children } => {
                w.write_i32(NODE_CHARACTER);
                object_info(w, true);
                w.write_i32(*scene_sex);
                w.write_bytes(&custom_v10(*female));

                zeros(w, 4);
                w.write_i32(0);
                zeros(w, 67);
                w.write_i32(0);
                w.write_i32(0);
                zeros(w, 17);
                if version >= 14 {
                    w.write_var_string(name).unwrap();
                }

                w.write_i32(0); // bones
                w.write_i32(0); // IK
                if children.is_empty() {
                    w.write_i32(0);
                } else {
                    w.write_i32(1);
                    w.write_i32(0);
                    child_list(w, version, children);
                }

                zeros(w, 37);
                if version >= 12 {
                    zeros(w, 4);
                }
                zeros(w, 5);
                object_info(w, false);
                zeros(w, 22);
                zeros(w, if version < 12 { 4 } else { 8 });
                zeros(w, 2);
                w.write_i32(0); // voices
                zeros(w, 4);
                if *scene_sex == 0 {
                    zeros(w, 1);
                    w.write_var_string("").unwrap();
                    zeros(w, 9);
                }
                w.write_i32(0);
                w.write_i32(0);
                zeros(w, 4);
                w.write_i32(0);
                w.write_i32(0);
            }
            Node::Item(children) => {
                w.write_i32(NODE_ITEM);
                object_info(w, true);
                zeros(w, 157);
                w.write_i32(0);
                zeros(w, 4);
                child_list(w, version, children);
            }
            Node::Light => {
                w.write_i32(NODE_LIGHT);
                object_info(w, true);
                zeros(w, 35);
            }
            Node::Folder(name, children) => {
                w.write_i32(NODE_FOLDER);
                object_info(w, true);
                w.write_var_string(name).unwrap();
                child_list(w, version, children);
            }
        }
    }

    /// Serialized scene: version string, object count, keyed objects
    pub fn scene_payload(version_text: &str, roots: &[Node]) -> Vec<u8> {
        let version = parse_scene_version(version_text).unwrap();
        let mut w = ByteWriter::new();
        w.write_var_string(version_text).unwrap();
        w.write_count(roots.len()).unwrap();
        for (key, root) in roots.iter().enumerate() {
            w.write_i32(key as i32);
            node(&mut w, version, root);
        }
        w.into_inner()
    }
}
