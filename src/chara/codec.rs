//! Codec trait shared by every card format, plus the marker scan loop.

use tracing::{debug, trace};

use crate::common::SceneBuffer;
use crate::error::{CardError, Result};

/// A decoded card together with where it was found
#[derive(Debug, Clone)]
pub struct Located<C> {
    /// Absolute offset the record was decoded from
    pub offset: u64,
    pub card: C,
}

/// A record that was located but could not be decoded
#[derive(Debug)]
pub struct ScanFailure {
    pub offset: u64,
    pub error: CardError,
}

/// Outcome of scanning one buffer with one codec.
#[derive(Debug)]
pub struct ScanReport<C> {
    pub cards: Vec<Located<C>>,
    pub failures: Vec<ScanFailure>,
}

impl<C> Default for ScanReport<C> {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<C> ScanReport<C> {
    /// Located records, decoded or not
    pub fn found(&self) -> usize {
        self.cards.len() + self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found() == 0
    }
}

/// Decode and re-encode one card format.
///
/// Implementors describe where records start relative to their marker; the
/// default [`scan`](CardCodec::scan) does the rest.
pub trait CardCodec {
    type Card;

    /// Short name used in logs
    const FORMAT: &'static str;

    /// Record markers this codec looks for
    fn markers(&self) -> &'static [&'static str];

    /// Bytes between the record start and its marker
    fn marker_lead(&self) -> u64;

    /// Decode a record starting at `offset`.
    fn decode_one(&self, data: &[u8], offset: u64) -> Result<Self::Card>;

    /// Encode a card as a standalone file: preview PNG plus payload.
    fn encode_one(&self, card: &Self::Card) -> Result<Vec<u8>>;

    /// True if any record marker occurs in the payload
    fn applies_to(&self, buffer: &SceneBuffer) -> bool {
        self.markers().iter().any(|m| buffer.contains_marker(m))
    }

    /// Decode every marker occurrence after the payload offset.
    ///
    /// Failures are collected, not propagated; one bad record never stops
    /// the rest of the scan.
    fn scan(&self, buffer: &SceneBuffer) -> ScanReport<Self::Card> {
        let mut offsets: Vec<u64> = self
            .markers()
            .iter()
            .flat_map(|m| buffer.find_marker(m))
            .collect();
        offsets.sort_unstable();
        offsets.dedup();

        let mut report = ScanReport::default();
        for marker_offset in offsets {
            let Some(start) = marker_offset.checked_sub(self.marker_lead()) else {
                report.failures.push(ScanFailure {
                    offset: marker_offset,
                    error: CardError::OutOfRange(-(self.marker_lead() as i64)),
                });
                continue;
            };

            match self.decode_one(buffer.data(), start) {
                Ok(card) => {
                    debug!(format = Self::FORMAT, offset = start, "Decoded card");
                    report.cards.push(Located { offset: start, card });
                }
                Err(error) => {
                    let end = (start as usize + 32).min(buffer.len());
                    trace!(
                        format = Self::FORMAT,
                        offset = start,
                        bytes = %hex::encode(&buffer.data()[start as usize..end]),
                        "Record bytes"
                    );
                    report.failures.push(ScanFailure { offset: start, error });
                }
            }
        }
        report
    }
}
