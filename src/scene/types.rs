//! Type definitions for scene extraction
//!
//! Options passed into the extractor and the summary it hands back.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::chara::{CardFormat, Sex};

/// Which characters to write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SexFilter {
    #[default]
    All,
    MaleOnly,
    FemaleOnly,
}

impl SexFilter {
    /// Map the external flag: 0 = all, 1 = male only, 2 = female only.
    pub fn from_flag(flag: u8) -> Option<Self> {
        match flag {
            0 => Some(SexFilter::All),
            1 => Some(SexFilter::MaleOnly),
            2 => Some(SexFilter::FemaleOnly),
            _ => None,
        }
    }

    /// Unknown sex only passes [`SexFilter::All`].
    pub fn allows(self, sex: Sex) -> bool {
        match self {
            SexFilter::All => true,
            SexFilter::MaleOnly => sex == Sex::Male,
            SexFilter::FemaleOnly => sex == Sex::Female,
        }
    }
}

/// Extraction settings, passed explicitly to every call.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub sex_filter: SexFilter,
    /// Also handle Koikatu, Honey Select and PlayHome scenes; when off only
    /// Studio NEO / NEO V2 scenes are processed
    pub full: bool,
    /// Directory extracted cards are written to
    pub output_dir: PathBuf,
    /// Log record failures with their full error chain
    pub verbose_errors: bool,
    /// Decode and report, but write nothing
    pub dry_run: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sex_filter: SexFilter::All,
            full: true,
            output_dir: PathBuf::from("."),
            verbose_errors: false,
            dry_run: false,
        }
    }
}

/// What happened to one located record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordOutcome {
    Written,
    /// Decoded, kept out by the sex filter
    Filtered,
    /// Decoded, not written because of a dry run
    Listed,
    /// Could not be decoded or written
    Failed,
}

/// Report line for one located record
#[derive(Debug, Clone, Serialize)]
pub struct RecordInfo {
    /// Absolute offset of the record in the scene file
    pub offset: u64,
    /// `None` when the record could not be decoded
    pub format: Option<CardFormat>,
    pub sex: Option<Sex>,
    pub name: String,
    pub outcome: RecordOutcome,
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

/// Totals for one scene file
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractSummary {
    /// Records located, decoded or not
    pub found: usize,
    /// Card files written
    pub written: usize,
    pub records: Vec<RecordInfo>,
    /// Decoded records per game
    pub per_format: BTreeMap<String, usize>,
}

impl ExtractSummary {
    pub fn failed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == RecordOutcome::Failed)
            .count()
    }

    pub(crate) fn push(&mut self, info: RecordInfo) {
        self.found += 1;
        if info.outcome == RecordOutcome::Written {
            self.written += 1;
        }
        if let Some(format) = info.format {
            *self.per_format.entry(format.label().to_string()).or_default() += 1;
        }
        self.records.push(info);
    }
}
