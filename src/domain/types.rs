//! Core domain types

use serde::{Deserialize, Serialize};

/// Real-valued baseband sample
pub type Sample = f32;

/// One hard bit decision, stored in the LSB of a byte
pub type Bit = u8;

/// Correlator output: data bit
pub const TAG_DATA: u8 = 0x01;
/// Correlator output: access code matched (either polarity)
pub const TAG_MATCH: u8 = 0x02;
/// Correlator output: match was against the inverted code
pub const TAG_INVERTED: u8 = 0x04;

/// Item counts for a single-output processing call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkReport {
    /// Input items consumed
    pub consumed: usize,
    /// Output items produced
    pub produced: usize,
}

/// Assumed polarity of an incoming bitstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    #[default]
    Normal,
    Inverted,
}

/// A decoded correlator output byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedBit {
    pub bit: Bit,
    pub matched: bool,
    pub inverted: bool,
}

impl TaggedBit {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            bit: byte & TAG_DATA,
            matched: byte & TAG_MATCH != 0,
            inverted: byte & TAG_INVERTED != 0,
        }
    }

    pub fn to_byte(self) -> u8 {
        let mut byte = self.bit & TAG_DATA;
        if self.matched {
            byte |= TAG_MATCH;
        }
        if self.inverted {
            byte |= TAG_INVERTED;
        }
        byte
    }
}

/// Diagnostics raised by the access-code correlator while it runs.
///
/// `offset` is the absolute index of the input bit being processed when the
/// event fired (bits consumed before it since construction or reset).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrelatorEvent {
    /// The window matched the code in the given polarity
    CodeMatched {
        offset: u64,
        hamming_distance: u32,
        polarity: Polarity,
    },
    /// Normal and inverted code both matched the same window; polarity left alone
    BothPolaritiesMatched { offset: u64 },
    /// The assumed stream polarity changed
    PolaritySwitched { offset: u64, polarity: Polarity },
}

impl CorrelatorEvent {
    pub fn offset(&self) -> u64 {
        match *self {
            CorrelatorEvent::CodeMatched { offset, .. }
            | CorrelatorEvent::BothPolaritiesMatched { offset }
            | CorrelatorEvent::PolaritySwitched { offset, .. } => offset,
        }
    }
}
