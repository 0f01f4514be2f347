//! Access-code correlator
//!
//! Slides a 64-bit window over a stream of hard bit decisions and tags the
//! stream wherever the window holds the access code, allowing up to
//! `threshold` bit errors. With inversion detection enabled it also hunts for
//! the complemented code and, when it finds it, complements everything that
//! follows until the true code shows up again.
//!
//! ## Register layout
//!
//! New bits enter `data_reg` at bit 0 and leave at bit 63. The code occupies
//! the top `len` bits (`mask`), so a match is scored against the oldest `len`
//! bits of the window. Each input produces one output byte built from bit 63
//! of the three registers:
//!
//! ```text
//! bit 0: data bit    bit 1: match flag    bit 2: inverted-match flag
//! ```
//!
//! Flags are OR-ed in at `1 << (64 - len)`, the position just behind the
//! code, so they leave the window together with the first bit after the code.
//! The tagged stream therefore trails the input by exactly 64 bits.

use crate::domain::{
    Bit, CorrelatorConfig, CorrelatorEvent, Polarity, SyncError, SyncResult, WorkReport,
};
use crate::ports::{EventSink, Forecast};

/// Longest access code the 64-bit window can hold
pub const MAX_ACCESS_CODE_LEN: usize = 64;

/// Output delay of the tagged stream, in bits
pub const WINDOW_BITS: usize = 64;

/// Patterns derived from an access-code string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CodePatterns {
    len: usize,
    code: u64,
    inverted: u64,
    mask: u64,
    flag_bit: u64,
}

impl CodePatterns {
    /// Build the left-aligned pattern pair. Only the LSB of each character
    /// counts, so '0'/'1' map to 0/1.
    fn parse(access_code: &str) -> SyncResult<Self> {
        let bytes = access_code.as_bytes();
        let len = bytes.len();
        if len > MAX_ACCESS_CODE_LEN {
            return Err(SyncError::InvalidParameter(format!(
                "access code is {len} bits, at most {MAX_ACCESS_CODE_LEN} fit the window"
            )));
        }
        if len == 0 {
            return Err(SyncError::InvalidParameter(
                "access code must not be empty".to_string(),
            ));
        }

        let shift = (MAX_ACCESS_CODE_LEN - len) as u32;
        let mask = (u64::MAX >> shift) << shift;

        let mut code = 0u64;
        for &c in bytes {
            code = (code << 1) | u64::from(c & 1);
        }
        let code = code << shift;

        Ok(Self {
            len,
            code,
            inverted: !code & mask,
            mask,
            flag_bit: 1u64 << shift,
        })
    }
}

/// Sliding-window access-code correlator with polarity tracking
#[derive(Debug, Clone)]
pub struct AccessCodeCorrelator {
    data_reg: u64,
    flag_reg: u64,
    invert_reg: u64,
    patterns: CodePatterns,
    threshold: u32,
    invert: bool,
    detect_inversion: bool,
    bits_read: u64,
}

impl AccessCodeCorrelator {
    /// Create a new correlator
    ///
    /// - `access_code`: up to 64 characters, LSB of each significant ('0'/'1')
    /// - `threshold`: maximum Hamming distance still counted as a match
    /// - `detect_inversion`: also match the complemented code
    pub fn new(access_code: &str, threshold: u32, detect_inversion: bool) -> SyncResult<Self> {
        let patterns = CodePatterns::parse(access_code)?;
        log_patterns(&patterns, detect_inversion);

        Ok(Self {
            data_reg: 0,
            flag_reg: 0,
            invert_reg: 0,
            patterns,
            threshold,
            invert: false,
            detect_inversion,
            bits_read: 0,
        })
    }

    pub fn from_config(config: &CorrelatorConfig) -> SyncResult<Self> {
        Self::new(&config.access_code, config.threshold, config.detect_inversion)
    }

    /// Replace the access code. On error the previous code stays in effect.
    pub fn set_access_code(&mut self, access_code: &str) -> SyncResult<()> {
        let patterns = CodePatterns::parse(access_code)?;
        log_patterns(&patterns, self.detect_inversion);
        self.patterns = patterns;
        Ok(())
    }

    /// Correlate one input bit and return the tagged output byte
    pub fn process_bit<S>(&mut self, bit: Bit, sink: &mut S) -> u8
    where
        S: EventSink + ?Sized,
    {
        let out = ((self.data_reg >> 63) & 1) as u8
            | (((self.flag_reg >> 63) & 1) as u8) << 1
            | (((self.invert_reg >> 63) & 1) as u8) << 2;

        let p = &self.patterns;
        let (active, complementary) = if self.invert {
            (p.inverted, p.code)
        } else {
            (p.code, p.inverted)
        };
        let nwrong = ((self.data_reg ^ active) & p.mask).count_ones();
        let nwrong_inverted = ((self.data_reg ^ complementary) & p.mask).count_ones();
        let flag_bit = p.flag_bit;

        let new_flag = nwrong <= self.threshold;
        let new_inverted = self.detect_inversion && nwrong_inverted <= self.threshold;
        let offset = self.bits_read;

        if new_flag {
            sink.emit(CorrelatorEvent::CodeMatched {
                offset,
                hamming_distance: nwrong,
                polarity: Polarity::Normal,
            });
        }
        if new_inverted {
            sink.emit(CorrelatorEvent::CodeMatched {
                offset,
                hamming_distance: nwrong_inverted,
                polarity: Polarity::Inverted,
            });
        }

        if new_flag && new_inverted {
            sink.emit(CorrelatorEvent::BothPolaritiesMatched { offset });
        } else if new_flag && self.invert {
            self.invert = false;
            sink.emit(CorrelatorEvent::PolaritySwitched {
                offset,
                polarity: Polarity::Normal,
            });
        } else if new_inverted && !self.invert {
            self.invert = true;
            sink.emit(CorrelatorEvent::PolaritySwitched {
                offset,
                polarity: Polarity::Inverted,
            });
        }

        let corrected = if self.invert { !bit } else { bit };
        self.data_reg = (self.data_reg << 1) | u64::from(corrected & 1);
        self.flag_reg <<= 1;
        self.invert_reg <<= 1;
        if new_flag || new_inverted {
            self.flag_reg |= flag_bit;
        }
        if new_inverted {
            self.invert_reg |= flag_bit;
        }

        self.bits_read += 1;
        out
    }

    /// Correlate `input` into `output`, one tagged byte per bit. Processes
    /// as many bits as the shorter buffer holds.
    pub fn process<S>(&mut self, input: &[Bit], output: &mut [u8], sink: &mut S) -> WorkReport
    where
        S: EventSink + ?Sized,
    {
        let n = input.len().min(output.len());
        for (out, &bit) in output[..n].iter_mut().zip(&input[..n]) {
            *out = self.process_bit(bit, sink);
        }
        WorkReport {
            consumed: n,
            produced: n,
        }
    }

    /// Access code as a left-aligned 64-bit pattern
    pub fn access_code(&self) -> u64 {
        self.patterns.code
    }

    /// Complement of the access code within the mask
    pub fn inverted_access_code(&self) -> u64 {
        self.patterns.inverted
    }

    /// Top `len` bits set
    pub fn mask(&self) -> u64 {
        self.patterns.mask
    }

    /// Access code length in bits
    pub fn code_len(&self) -> usize {
        self.patterns.len
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold;
    }

    pub fn detect_inversion(&self) -> bool {
        self.detect_inversion
    }

    pub fn set_detect_inversion(&mut self, detect_inversion: bool) {
        self.detect_inversion = detect_inversion;
    }

    /// Polarity currently applied to incoming bits
    pub fn polarity(&self) -> Polarity {
        if self.invert {
            Polarity::Inverted
        } else {
            Polarity::Normal
        }
    }

    /// The last 64 polarity-corrected input bits, newest in bit 0
    pub fn data_register(&self) -> u64 {
        self.data_reg
    }

    /// Total input bits processed since construction or reset
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Clear the window, flags and polarity. The code and settings stay.
    pub fn reset(&mut self) {
        self.data_reg = 0;
        self.flag_reg = 0;
        self.invert_reg = 0;
        self.invert = false;
        self.bits_read = 0;
    }
}

impl Forecast for AccessCodeCorrelator {
    fn forecast(&self, noutput_items: usize) -> usize {
        noutput_items
    }
}

fn log_patterns(patterns: &CodePatterns, detect_inversion: bool) {
    log::debug!("access code: {:#018x} ({} bits)", patterns.code, patterns.len);
    if detect_inversion {
        log::debug!("inverted:    {:#018x}", patterns.inverted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaggedBit;
    use crate::ports::NullSink;

    fn bits_from_str(s: &str) -> Vec<Bit> {
        s.bytes().map(|c| c & 1).collect()
    }

    fn random_bits(count: usize, mut state: u32) -> Vec<Bit> {
        (0..count)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state & 1) as Bit
            })
            .collect()
    }

    fn run(
        correlator: &mut AccessCodeCorrelator,
        bits: &[Bit],
    ) -> (Vec<TaggedBit>, Vec<CorrelatorEvent>) {
        let mut out = vec![0u8; bits.len()];
        let mut events = Vec::new();
        let report = correlator.process(bits, &mut out, &mut events);
        assert_eq!(report.consumed, bits.len());
        assert_eq!(report.produced, bits.len());
        (out.into_iter().map(TaggedBit::from_byte).collect(), events)
    }

    fn match_offsets(events: &[CorrelatorEvent], want: Polarity) -> Vec<u64> {
        events
            .iter()
            .filter_map(|e| match *e {
                CorrelatorEvent::CodeMatched {
                    offset, polarity, ..
                } if polarity == want => Some(offset),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_patterns_are_left_aligned() {
        let c = AccessCodeCorrelator::new("1010", 0, false).unwrap();
        assert_eq!(c.code_len(), 4);
        assert_eq!(c.mask(), 0xF000_0000_0000_0000);
        assert_eq!(c.access_code(), 0xA000_0000_0000_0000);
        assert_eq!(c.inverted_access_code(), 0x5000_0000_0000_0000);
    }

    #[test]
    fn test_full_width_code() {
        let code = "1".repeat(32) + &"0".repeat(32);
        let c = AccessCodeCorrelator::new(&code, 0, true).unwrap();
        assert_eq!(c.mask(), u64::MAX);
        assert_eq!(c.access_code(), 0xFFFF_FFFF_0000_0000);
        assert_eq!(c.inverted_access_code(), 0x0000_0000_FFFF_FFFF);
    }

    #[test]
    fn test_rejects_oversized_and_empty_codes() {
        let too_long = "1".repeat(65);
        assert!(matches!(
            AccessCodeCorrelator::new(&too_long, 0, false),
            Err(SyncError::InvalidParameter(_))
        ));
        assert!(AccessCodeCorrelator::new("", 0, false).is_err());
    }

    #[test]
    fn test_failed_set_access_code_keeps_previous() {
        let mut c = AccessCodeCorrelator::new("1100", 0, false).unwrap();
        assert!(c.set_access_code(&"0".repeat(65)).is_err());
        assert_eq!(c.code_len(), 4);
        assert_eq!(c.access_code(), 0xC000_0000_0000_0000);

        c.set_access_code("111").unwrap();
        assert_eq!(c.code_len(), 3);
        assert_eq!(c.mask(), 0xE000_0000_0000_0000);
    }

    #[test]
    fn test_register_holds_last_64_bits() {
        let bits = random_bits(150, 0xC0FF_EE11);
        let mut c = AccessCodeCorrelator::new("1111000011110000", 2, false).unwrap();
        run(&mut c, &bits);

        let expected = bits[bits.len() - 64..]
            .iter()
            .fold(0u64, |acc, &b| (acc << 1) | u64::from(b));
        assert_eq!(c.data_register(), expected);
        assert_eq!(c.bits_read(), 150);
    }

    #[test]
    fn test_output_trails_input_by_window() {
        let bits = random_bits(200, 77);
        let mut c = AccessCodeCorrelator::new("1", 0, false).unwrap();
        let (out, _) = run(&mut c, &bits);

        for (i, tagged) in out.iter().enumerate() {
            let expected = if i < WINDOW_BITS { 0 } else { bits[i - WINDOW_BITS] };
            assert_eq!(tagged.bit, expected, "output {}", i);
        }
    }

    #[test]
    fn test_exact_pattern_sets_single_flag() {
        let mut c = AccessCodeCorrelator::new("1010", 0, false).unwrap();
        let mut bits = bits_from_str("1010");
        bits.extend(vec![0; 80]);

        let (out, events) = run(&mut c, &bits);

        // Window ending on the 4th input bit is scored once it reaches the top
        assert_eq!(match_offsets(&events, Polarity::Normal), vec![64]);
        let flagged: Vec<usize> = (0..out.len()).filter(|&i| out[i].matched).collect();
        assert_eq!(flagged, vec![WINDOW_BITS + 4]);

        let payload: Vec<Bit> = out[WINDOW_BITS..WINDOW_BITS + 4].iter().map(|t| t.bit).collect();
        assert_eq!(payload, vec![1, 0, 1, 0]);
        assert!(out.iter().all(|t| !t.inverted));
        assert_eq!(c.polarity(), Polarity::Normal);
        assert!(!events
            .iter()
            .any(|e| matches!(e, CorrelatorEvent::PolaritySwitched { .. })));
    }

    #[test]
    fn test_inverted_pattern_flips_polarity_and_back() {
        let mut c = AccessCodeCorrelator::new("1010", 0, true).unwrap();

        // Complemented code, ones filler, the true code, more filler
        let mut bits = bits_from_str("0101");
        bits.extend(vec![1; 96]);
        bits.extend(bits_from_str("1010"));
        bits.extend(vec![1; 100]);

        let (out, events) = run(&mut c, &bits);

        let switches: Vec<(u64, Polarity)> = events
            .iter()
            .filter_map(|e| match *e {
                CorrelatorEvent::PolaritySwitched { offset, polarity } => Some((offset, polarity)),
                _ => None,
            })
            .collect();
        assert_eq!(
            switches,
            vec![(64, Polarity::Inverted), (164, Polarity::Normal)]
        );

        // The inverted match is tagged on the bit right after the code
        assert!(out[WINDOW_BITS + 4].matched);
        assert!(out[WINDOW_BITS + 4].inverted);
        assert!(!out[WINDOW_BITS + 3].matched);
        assert_eq!(c.polarity(), Polarity::Normal);
        assert!(!events
            .iter()
            .any(|e| matches!(e, CorrelatorEvent::BothPolaritiesMatched { .. })));
    }

    #[test]
    fn test_bits_after_switch_are_complemented() {
        let mut c = AccessCodeCorrelator::new("1100", 0, true).unwrap();
        let mut bits = bits_from_str("0011");
        bits.extend(vec![1; 60]);
        // Bit 64 is the first one inserted after the switch
        bits.extend(bits_from_str("10110"));

        run(&mut c, &bits);
        assert_eq!(c.polarity(), Polarity::Inverted);
        // Register low bits hold the complement of the last five inputs
        assert_eq!(c.data_register() & 0x1F, 0b01001);
    }

    #[test]
    fn test_threshold_tolerance() {
        // One bit off matches with threshold 1
        let mut c = AccessCodeCorrelator::new("1010", 1, false).unwrap();
        let mut bits = bits_from_str("1011");
        bits.extend(vec![0; 70]);
        let (_, events) = run(&mut c, &bits);
        assert!(events.iter().any(|e| matches!(
            *e,
            CorrelatorEvent::CodeMatched {
                offset: 64,
                hamming_distance: 1,
                polarity: Polarity::Normal
            }
        )));

        // Two bits off does not
        let mut c = AccessCodeCorrelator::new("1010", 1, false).unwrap();
        let mut bits = bits_from_str("0110");
        bits.extend(vec![0; 70]);
        let (_, events) = run(&mut c, &bits);
        assert!(!match_offsets(&events, Polarity::Normal).contains(&64));
    }

    #[test]
    fn test_both_polarities_reported_without_switch() {
        // With threshold 2 a 4-bit window two bits away from the code is also
        // two bits away from its complement
        let mut c = AccessCodeCorrelator::new("1010", 2, true).unwrap();
        let (out, events) = run(&mut c, &vec![0; 70]);

        assert!(events
            .iter()
            .any(|e| matches!(e, CorrelatorEvent::BothPolaritiesMatched { .. })));
        assert!(!events
            .iter()
            .any(|e| matches!(e, CorrelatorEvent::PolaritySwitched { .. })));
        assert_eq!(c.polarity(), Polarity::Normal);
        assert!(out[4].matched && out[4].inverted);
    }

    #[test]
    fn test_inversion_ignored_when_disabled() {
        let mut c = AccessCodeCorrelator::new("1100", 0, false).unwrap();
        let mut bits = bits_from_str("0011");
        bits.extend(vec![1; 80]);
        let (out, events) = run(&mut c, &bits);

        assert!(match_offsets(&events, Polarity::Inverted).is_empty());
        assert!(out.iter().all(|t| !t.inverted));
        assert_eq!(c.polarity(), Polarity::Normal);
    }

    #[test]
    fn test_process_is_bounded_by_shorter_buffer() {
        let mut c = AccessCodeCorrelator::new("1010", 0, false).unwrap();
        let input = vec![1u8; 10];
        let mut output = vec![0xFFu8; 4];
        let report = c.process(&input, &mut output, &mut NullSink);
        assert_eq!(report, WorkReport { consumed: 4, produced: 4 });
        assert_eq!(c.bits_read(), 4);
        assert_eq!(c.forecast(4), 4);
    }

    #[test]
    fn test_only_lsb_of_input_is_used() {
        let mut a = AccessCodeCorrelator::new("1", 0, false).unwrap();
        let mut b = AccessCodeCorrelator::new("1", 0, false).unwrap();
        let raw: Vec<u8> = vec![0x31, 0x30, 0xFF, 0xFE, 0x03];
        let masked: Vec<u8> = raw.iter().map(|b| b & 1).collect();
        run(&mut a, &raw);
        run(&mut b, &masked);
        assert_eq!(a.data_register(), b.data_register());
    }

    #[test]
    fn test_reset_clears_state_but_keeps_code() {
        let mut c = AccessCodeCorrelator::new("1010", 0, true).unwrap();
        let mut bits = bits_from_str("0101");
        bits.extend(vec![1; 70]);
        run(&mut c, &bits);
        assert_eq!(c.polarity(), Polarity::Inverted);

        c.reset();
        assert_eq!(c.polarity(), Polarity::Normal);
        assert_eq!(c.data_register(), 0);
        assert_eq!(c.bits_read(), 0);
        assert_eq!(c.access_code(), 0xA000_0000_0000_0000);
    }

    #[test]
    fn test_setters() {
        let mut c = AccessCodeCorrelator::from_config(&CorrelatorConfig::default()).unwrap();
        assert_eq!(c.code_len(), 64);
        assert_eq!(c.threshold(), 12);
        c.set_threshold(3);
        c.set_detect_inversion(true);
        assert_eq!(c.threshold(), 3);
        assert!(c.detect_inversion());
    }
}
