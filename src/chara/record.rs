//! Decoded record of any supported game

use crate::aishoujo::{AisCard, AisCodec};
use crate::chara::{CardCodec, CardFormat, Sex};
use crate::error::Result;
use crate::honeyselect::{HoneySelectCard, HoneySelectCodec};
use crate::koikatu::{KoikatuCard, KoikatuCodec};
use crate::playhome::{PlayHomeCard, PlayHomeCodec};

/// One decoded character card, tagged by game
#[derive(Debug, Clone)]
pub enum Record {
    Ais(AisCard),
    Koikatu(KoikatuCard),
    HoneySelect(HoneySelectCard),
    PlayHome(PlayHomeCard),
}

impl Record {
    pub fn format(&self) -> CardFormat {
        match self {
            Record::Ais(card) => card.flavor.format(),
            Record::Koikatu(_) => CardFormat::Koikatu,
            Record::HoneySelect(_) => CardFormat::HoneySelect,
            Record::PlayHome(_) => CardFormat::PlayHome,
        }
    }

    /// Canonical sex
    pub fn sex(&self) -> Sex {
        match self {
            Record::Ais(card) => card.sex,
            Record::Koikatu(card) => card.sex,
            Record::HoneySelect(card) => card.sex,
            Record::PlayHome(card) => card.sex(),
        }
    }

    /// Display name; empty when the record stores none
    pub fn name(&self) -> String {
        match self {
            Record::Ais(card) => card.full_name.clone(),
            Record::Koikatu(card) => card.full_name(),
            Record::HoneySelect(card) => card.name.clone(),
            Record::PlayHome(card) => card.name.clone(),
        }
    }

    /// Standalone card file bytes, encoded by the record's own codec.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Record::Ais(card) => AisCodec.encode_one(card),
            Record::Koikatu(card) => KoikatuCodec.encode_one(card),
            Record::HoneySelect(card) => HoneySelectCodec.encode_one(card),
            Record::PlayHome(card) => PlayHomeCodec.encode_one(card),
        }
    }
}

impl From<AisCard> for Record {
    fn from(card: AisCard) -> Self {
        Record::Ais(card)
    }
}

impl From<KoikatuCard> for Record {
    fn from(card: KoikatuCard) -> Self {
        Record::Koikatu(card)
    }
}

impl From<HoneySelectCard> for Record {
    fn from(card: HoneySelectCard) -> Self {
        Record::HoneySelect(card)
    }
}

impl From<PlayHomeCard> for Record {
    fn from(card: PlayHomeCard) -> Self {
        Record::PlayHome(card)
    }
}
