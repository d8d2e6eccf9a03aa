//! Type definitions for PlayHome scenes and cards

use super::custom::NATIVE_FEMALE;
use crate::chara::{Located, Sex};

/// Scene marker written by PlayHome Studio
pub const PH_STUDIO_MARKER: &str = "【PHStudio】";
pub const PH_MALE_MARKER: &str = "【PlayHome_Male】";
pub const PH_FEMALE_MARKER: &str = "【PlayHome_Female】";
pub const PH_MARKERS: [&str; 2] = [PH_MALE_MARKER, PH_FEMALE_MARKER];

/// Scene object type tags
pub const NODE_CHARACTER: i32 = 0;
pub const NODE_ITEM: i32 = 1;
pub const NODE_LIGHT: i32 = 2;
pub const NODE_FOLDER: i32 = 3;

/// Appearance data of one character, normalized to the version 10 layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomParameter {
    /// Version the blocks were read with
    pub version: i32,
    /// 0 = female, 1 = male
    pub native_sex: i32,
    pub hair: Vec<u8>,
    pub head: Vec<u8>,
    pub body: Vec<u8>,
    pub wear: Vec<u8>,
    pub accessory: Vec<u8>,
}

impl CustomParameter {
    /// Whether the blocks use the female layout. Any tag other than the
    /// female one is laid out as male.
    pub fn female_layout(&self) -> bool {
        self.native_sex == NATIVE_FEMALE
    }
}

/// A character harvested from a scene (or a standalone card)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayHomeCard {
    pub custom: CustomParameter,
    /// Sex tag of the scene object (0 = male); absent for standalone cards
    pub scene_sex: Option<i32>,
    /// Display name, stored by scene version 14 and later
    pub name: String,
}

impl PlayHomeCard {
    /// Canonical sex from the native tag
    pub fn sex(&self) -> Sex {
        match self.custom.native_sex {
            0 => Sex::Female,
            1 => Sex::Male,
            other => Sex::Unknown(other),
        }
    }
}

/// One object in the scene tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectNode {
    /// `card` indexes [`PlayHomeScene::characters`]
    Character { card: usize, children: Vec<ObjectNode> },
    Item { children: Vec<ObjectNode> },
    Light,
    Folder { name: String, children: Vec<ObjectNode> },
}

/// Decoded scene: object tree plus characters in pre-order
#[derive(Debug, Clone)]
pub struct PlayHomeScene {
    pub version_text: String,
    pub version: i64,
    pub roots: Vec<ObjectNode>,
    pub characters: Vec<Located<PlayHomeCard>>,
}
