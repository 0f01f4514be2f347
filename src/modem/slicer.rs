//! Binary slicer
//!
//! Hard bit decisions from recovered symbols: the bridge a host puts between
//! the timing loop and the access-code correlator. Uses the same sign
//! convention as the timing error detector, so zero slices to 1.

use crate::domain::{Bit, Sample, WorkReport};

/// Sign slicer, one bit per symbol
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySlicer;

impl BinarySlicer {
    pub fn new() -> Self {
        Self
    }

    /// Decide a single symbol
    pub fn decide(&self, symbol: Sample) -> Bit {
        if symbol < 0.0 {
            0
        } else {
            1
        }
    }

    /// Slice as many symbols as both buffers allow
    pub fn slice(&self, symbols: &[Sample], bits: &mut [Bit]) -> WorkReport {
        let n = symbols.len().min(bits.len());
        for (bit, &symbol) in bits[..n].iter_mut().zip(&symbols[..n]) {
            *bit = self.decide(symbol);
        }
        WorkReport {
            consumed: n,
            produced: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_decisions() {
        let slicer = BinarySlicer::new();
        assert_eq!(slicer.decide(0.7), 1);
        assert_eq!(slicer.decide(-0.01), 0);
        assert_eq!(slicer.decide(0.0), 1);
    }

    #[test]
    fn test_slice_stops_at_shorter_buffer() {
        let slicer = BinarySlicer::new();
        let symbols = [1.0, -1.0, 0.5, -0.5];
        let mut bits = [9u8; 3];
        let report = slicer.slice(&symbols, &mut bits);
        assert_eq!(report, WorkReport { consumed: 3, produced: 3 });
        assert_eq!(bits, [1, 0, 1]);
    }
}
