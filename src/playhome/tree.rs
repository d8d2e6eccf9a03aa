//! PlayHome Studio scene tree walker
//!
//! The scene is a recursive list of typed objects with no length prefixes,
//! so every field must be consumed exactly; an unknown object type makes
//! the rest of the stream unreadable.
//!
//! ```text
//! scene     := version(str) count(i32) { key(i32) type(i32) node }*
//! node      := character | item | light | folder
//! childList := count(i32) { type(i32) node }*
//! ```

use tracing::{debug, instrument, trace};

use super::custom::read_custom_parameter;
use super::types::*;
use crate::chara::Located;
use crate::common::binary::ByteCursor;
use crate::error::{CardError, Result};

/// Deepest object nesting accepted
pub const MAX_DEPTH: usize = 128;

/// Scene version the character name was added in
const NAME_VERSION: i64 = 14;
/// Scene version that added face options and a second anime pattern
const FACE_OPTION_VERSION: i64 = 12;

/// Parse a dotted version ("1.0.1") as the hex number of its digits.
pub fn parse_scene_version(text: &str) -> Result<i64> {
    let digits: String = text.chars().filter(|c| *c != '.').collect();
    i64::from_str_radix(&digits, 16)
        .map_err(|_| CardError::InvalidData(format!("unparseable scene version '{text}'")))
}

/// Walks one scene, collecting characters as it goes.
///
/// Characters decoded before a failure stay in `characters`.
#[derive(Debug, Default)]
pub struct SceneWalker {
    version: i64,
    pub characters: Vec<Located<PlayHomeCard>>,
}

impl SceneWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the scene starting at `offset`.
    #[instrument(skip_all, fields(offset = offset))]
    pub fn walk(&mut self, data: &[u8], offset: u64) -> Result<(String, Vec<ObjectNode>)> {
        let mut c = ByteCursor::at(data, offset);
        let version_text = c.read_var_string()?;
        self.version = parse_scene_version(&version_text)?;
        let count = c.read_count()?;
        debug!(version = %version_text, objects = count, "Walking PlayHome scene");

        let mut roots = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            c.skip(4)?; // dictionary key
            let kind = c.read_i32()?;
            roots.push(self.read_node(&mut c, kind, 0)?);
        }
        Ok((version_text, roots))
    }

    fn read_node(&mut self, c: &mut ByteCursor<'_>, kind: i32, depth: usize) -> Result<ObjectNode> {
        if depth >= MAX_DEPTH {
            return Err(CardError::DepthLimit(MAX_DEPTH));
        }
        match kind {
            NODE_CHARACTER => self.read_character(c, depth),
            NODE_ITEM => self.read_item(c, depth),
            NODE_LIGHT => read_light(c),
            NODE_FOLDER => self.read_folder(c, depth),
            other => Err(CardError::InvalidData(format!(
                "unknown scene object type {other} at offset {}",
                c.position().saturating_sub(4)
            ))),
        }
    }

    fn read_child_list(&mut self, c: &mut ByteCursor<'_>, depth: usize) -> Result<Vec<ObjectNode>> {
        let count = c.read_count()?;
        let mut children = Vec::with_capacity(count.min(256));
        for _ in 0..count {
            let kind = c.read_i32()?;
            children.push(self.read_node(c, kind, depth + 1)?);
        }
        Ok(children)
    }

    fn read_character(&mut self, c: &mut ByteCursor<'_>, depth: usize) -> Result<ObjectNode> {
        let start = c.position();
        read_object_info(c, true)?;
        let scene_sex = c.read_i32()?;
        let custom = read_custom_parameter(c)?;
        let name = read_file_status(c, self.version)?;
        trace!(offset = start, scene_sex, %name, "Scene character");

        let card = self.characters.len();
        self.characters.push(Located {
            offset: start,
            card: PlayHomeCard {
                custom,
                scene_sex: Some(scene_sex),
                name,
            },
        });

        // bones, then IK targets
        for _ in 0..2 {
            let count = c.read_count()?;
            for _ in 0..count {
                c.skip(4)?;
                read_object_info(c, false)?;
            }
        }

        let mut children = Vec::new();
        let groups = c.read_count()?;
        for _ in 0..groups {
            c.skip(4)?; // attach point key
            children.extend(self.read_child_list(c, depth)?);
        }

        // kinematic mode, anime info, hand patterns, skin rates
        c.skip(37)?;
        if self.version >= FACE_OPTION_VERSION {
            c.skip(4)?; // face option
        }
        c.skip(5)?; // mouth open, lip sync
        read_object_info(c, false)?; // look-at target
        c.skip(22)?; // IK/FK flags, expression, anime speed
        c.skip(if self.version < FACE_OPTION_VERSION { 4 } else { 8 })?; // anime pattern(s)
        c.skip(2)?; // anime option visible, force loop

        skip_counted(c, 12)?; // voice list
        c.skip(4)?; // voice repeat

        if scene_sex == 0 {
            c.skip(1)?; // simple visible
            c.read_var_string()?; // simple colour
            c.skip(9)?; // son visible, anime option params
        }

        skip_counted(c, 1)?; // neck state
        skip_counted(c, 1)?; // eyes state
        c.skip(4)?; // anime normalized time
        skip_counted(c, 8)?; // access group states
        skip_counted(c, 8)?; // access number states

        Ok(ObjectNode::Character { card, children })
    }

    fn read_item(&mut self, c: &mut ByteCursor<'_>, depth: usize) -> Result<ObjectNode> {
        read_object_info(c, true)?;
        c.skip(157)?; // number, anime speed, colours, FK flag
        let bones = c.read_count()?;
        for _ in 0..bones {
            c.read_var_string()?;
            read_object_info(c, false)?;
        }
        c.skip(4)?; // anime normalized time
        let children = self.read_child_list(c, depth)?;
        Ok(ObjectNode::Item { children })
    }

    fn read_folder(&mut self, c: &mut ByteCursor<'_>, depth: usize) -> Result<ObjectNode> {
        read_object_info(c, true)?;
        let name = c.read_var_string()?;
        let children = self.read_child_list(c, depth)?;
        Ok(ObjectNode::Folder { name, children })
    }
}

fn read_light(c: &mut ByteCursor<'_>) -> Result<ObjectNode> {
    read_object_info(c, true)?;
    c.skip(35)?; // number, colour, intensity, range, spot angle, flags
    Ok(ObjectNode::Light)
}

/// Key, position/rotation/scale strings, and for top-level objects the
/// tree state and visibility flags.
fn read_object_info(c: &mut ByteCursor<'_>, with_state: bool) -> Result<()> {
    c.skip(4)?;
    for _ in 0..3 {
        c.read_var_string()?;
    }
    if with_state {
        c.skip(5)?;
    }
    Ok(())
}

/// Character status block; returns the name when the scene stores one.
fn read_file_status(c: &mut ByteCursor<'_>, version: i64) -> Result<String> {
    c.skip(4)?; // coordinate type
    skip_counted(c, 1)?; // accessory visibility
    c.skip(67)?; // eyes, mouth, tongue, look and blink state
    skip_counted(c, 1)?; // clothes state
    skip_counted(c, 1)?; // siru levels
    c.skip(17)?; // nipple, blush, tears, shape and highlight flags
    if version >= NAME_VERSION {
        c.read_var_string()
    } else {
        Ok(String::new())
    }
}

/// i32 count followed by `count * elem` bytes
fn skip_counted(c: &mut ByteCursor<'_>, elem: usize) -> Result<()> {
    let count = c.read_count()?;
    let len = count
        .checked_mul(elem)
        .ok_or_else(|| CardError::InvalidData(format!("element count {count} too large")))?;
    c.skip(len)
}

/// Decode a whole scene. Fails on the first unreadable object.
pub fn decode_scene(data: &[u8], offset: u64) -> Result<PlayHomeScene> {
    let mut walker = SceneWalker::new();
    let (version_text, roots) = walker.walk(data, offset)?;
    Ok(PlayHomeScene {
        version: walker.version,
        version_text,
        roots,
        characters: walker.characters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playhome::test_support::{scene_payload, Node};

    #[test]
    fn test_parse_scene_version() {
        assert_eq!(parse_scene_version("1.0.0").unwrap(), 0x100);
        assert_eq!(parse_scene_version("0.1.4").unwrap(), 0x14);
        assert!(parse_scene_version("x.y").is_err());
    }

    #[test]
    fn test_characters_in_pre_order() {
        let scene = scene_payload(
            "1.0.0",
            &[
                Node::Character {
                    scene_sex: 1,
                    female: true,
                    name: "Outer",
                    children: vec![Node::Folder(
                        "inner",
                        vec![Node::Character {
                            scene_sex: 0,
                            female: false,
                            name: "Inner",
                            children: vec![],
                        }],
                    )],
                },
                Node::Light,
                Node::Item(vec![Node::Character {
                    scene_sex: 1,
                    female: true,
                    name: "Held",
                    children: vec![],
                }]),
            ],
        );
        let decoded = decode_scene(&scene, 0).unwrap();
        let names: Vec<_> = decoded.characters.iter().map(|c| c.card.name.as_str()).collect();
        assert_eq!(names, ["Outer", "Inner", "Held"]);
        assert_eq!(decoded.roots.len(), 3);
        assert_eq!(decoded.roots[1], ObjectNode::Light);
        assert_eq!(decoded.characters[1].card.scene_sex, Some(0));
        assert_eq!(decoded.characters[1].card.sex(), crate::chara::Sex::Male);
        match &decoded.roots[0] {
            ObjectNode::Character { card: 0, children } => {
                assert!(matches!(&children[0], ObjectNode::Folder { name, .. } if name == "inner"));
            }
            other => panic!("unexpected root {other:?}"),
        }
    }

    #[test]
    fn test_old_scene_has_no_names() {
        let scene = scene_payload(
            "0.0.9",
            &[Node::Character { scene_sex: 0, female: false, name: "", children: vec![] }],
        );
        let decoded = decode_scene(&scene, 0).unwrap();
        assert_eq!(decoded.version, 9);
        assert_eq!(decoded.characters.len(), 1);
        assert_eq!(decoded.characters[0].card.name, "");
    }

    #[test]
    fn test_unknown_type_keeps_earlier_characters() {
        let mut scene = scene_payload(
            "1.0.0",
            &[Node::Character { scene_sex: 1, female: true, name: "First", children: vec![] }],
        );
        // Bump the object count and append an entry with a bogus type
        let count_at = 1 + "1.0.0".len();
        scene[count_at..count_at + 4].copy_from_slice(&2i32.to_le_bytes());
        scene.extend_from_slice(&0i32.to_le_bytes());
        scene.extend_from_slice(&9i32.to_le_bytes());

        let mut walker = SceneWalker::new();
        let err = walker.walk(&scene, 0).unwrap_err();
        assert!(matches!(err, CardError::InvalidData(_)));
        assert_eq!(walker.characters.len(), 1);
        assert_eq!(walker.characters[0].card.name, "First");
    }

    #[test]
    fn test_depth_limit() {
        let mut node = Node::Folder("leaf", vec![]);
        for _ in 0..MAX_DEPTH {
            node = Node::Folder("f", vec![node]);
        }
        let scene = scene_payload("1.0.0", &[node]);
        assert!(matches!(decode_scene(&scene, 0), Err(CardError::DepthLimit(MAX_DEPTH))));
    }
}
