//! Shared character card types

use serde::Serialize;
use std::fmt;

/// Canonical sex of a character card.
///
/// Tag 0 is male and tag 1 is female; any other tag is kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    Male,
    Female,
    Unknown(i32),
}

impl Sex {
    pub fn from_tag(tag: i32) -> Self {
        match tag {
            0 => Sex::Male,
            1 => Sex::Female,
            other => Sex::Unknown(other),
        }
    }

    pub fn tag(self) -> i32 {
        match self {
            Sex::Male => 0,
            Sex::Female => 1,
            Sex::Unknown(tag) => tag,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => f.write_str("male"),
            Sex::Female => f.write_str("female"),
            Sex::Unknown(tag) => write!(f, "unknown({tag})"),
        }
    }
}

/// Game a card belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CardFormat {
    AiShoujo,
    HoneySelect2,
    Koikatu,
    HoneySelect,
    PlayHome,
}

impl CardFormat {
    pub fn label(self) -> &'static str {
        match self {
            CardFormat::AiShoujo => "AI Shoujo",
            CardFormat::HoneySelect2 => "Honey Select 2",
            CardFormat::Koikatu => "Koikatu",
            CardFormat::HoneySelect => "Honey Select",
            CardFormat::PlayHome => "PlayHome",
        }
    }
}

impl fmt::Display for CardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
