//! Fractional-delay FIR interpolator
//!
//! A fixed 8-tap interpolator with a table of 129 tap rows, one for each
//! quantized fractional offset `mu` in `[0, 1]` (128 steps). Each row is a
//! windowed sinc centred between input[3] and input[4], so
//! `interpolate(&x[n..n + 8], mu)` estimates the signal at `n + 3 + mu`.
//!
//! Every row is a Hann-windowed sinc normalized for unity DC gain. Row 0
//! reduces to a pure pass of input[3].

use std::f32::consts::PI;

use crate::domain::Sample;

/// Number of taps per interpolation row
pub const NTAPS: usize = 8;

/// Number of fractional steps between two input samples
pub const NSTEPS: usize = 128;

/// Index of the tap the interpolation point is measured from
const CENTER: usize = NTAPS / 2 - 1;

/// Precomputed polyphase table for fractional-delay interpolation
#[derive(Debug, Clone)]
pub struct FirInterpolator {
    rows: Vec<[f32; NTAPS]>,
}

impl FirInterpolator {
    pub fn new() -> Self {
        let rows = (0..=NSTEPS)
            .map(|step| Self::design_row(step as f32 / NSTEPS as f32))
            .collect();
        Self { rows }
    }

    fn design_row(mu: f32) -> [f32; NTAPS] {
        let half_width = (NTAPS / 2) as f32;
        let mut row = [0.0f32; NTAPS];

        for (i, tap) in row.iter_mut().enumerate() {
            // Distance from this tap to the interpolation point
            let d = i as f32 - CENTER as f32 - mu;
            let sinc = if d.abs() < 1e-6 {
                1.0
            } else {
                (PI * d).sin() / (PI * d)
            };
            let window = if d.abs() >= half_width {
                0.0
            } else {
                0.5 * (1.0 + (PI * d / half_width).cos())
            };
            *tap = sinc * window;
        }

        let sum: f32 = row.iter().sum();
        for tap in &mut row {
            *tap /= sum;
        }
        row
    }

    /// Number of input samples each interpolation reads
    pub fn ntaps(&self) -> usize {
        NTAPS
    }

    /// Interpolate `input[0..NTAPS]` at fractional offset `mu` past input[3].
    ///
    /// `mu` is clamped to `[0, 1]` and rounded to the nearest table step.
    /// Only the first `NTAPS` samples are read; shorter slices are zero-padded.
    pub fn interpolate(&self, input: &[Sample], mu: f32) -> Sample {
        let step = (mu.clamp(0.0, 1.0) * NSTEPS as f32).round() as usize;
        let row = &self.rows[step.min(NSTEPS)];

        row.iter()
            .zip(input.iter())
            .map(|(&tap, &sample)| tap * sample)
            .sum()
    }
}

impl Default for FirInterpolator {
    fn default() -> Self {
        Self::new()
    }
}
