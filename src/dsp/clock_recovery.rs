//! Symbol timing recovery
//!
//! Mueller & Muller clock recovery for real-valued, oversampled baseband.
//! Each output symbol is interpolated at a fractional offset `mu`; the
//! decision-directed timing error then nudges both the phase `mu` and the
//! samples-per-symbol estimate `omega`:
//!
//! ```text
//! e     = sign(y[k-1])·y[k] − sign(y[k])·y[k-1]
//! omega = omega_mid + clip(omega + gain_omega·e − omega_mid, omega_mid·limit)
//! mu    = mu + omega + gain_mu·e          (integer part advances the input)
//! ```
//!
//! The loop is driven by a host scheduler: `forecast` says how much input a
//! call needs, `process` reports what it actually consumed and produced on
//! every port.

use crate::domain::{ClockRecoveryConfig, Sample, SyncError, SyncResult};
use crate::dsp::interpolator::FirInterpolator;
use crate::ports::Forecast;

/// Hard decision used by the timing error detector
#[inline]
fn slice(x: f32) -> f32 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Symmetric clip of `x` to `[-clip, clip]` without branches
#[inline]
fn branchless_clip(x: f32, clip: f32) -> f32 {
    0.5 * ((x + clip).abs() - (x - clip).abs())
}

fn check_finite(name: &str, value: f32) -> SyncResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SyncError::InvalidParameter(format!("{name} must be finite, got {value}")))
    }
}

fn check_gain(name: &str, gain: f32) -> SyncResult<()> {
    check_finite(name, gain)?;
    if gain < 0.0 {
        return Err(SyncError::InvalidParameter(format!(
            "{name} must be non-negative, got {gain}"
        )));
    }
    Ok(())
}

fn check_omega(omega: f32) -> SyncResult<()> {
    check_finite("omega", omega)?;
    if omega < 1.0 {
        return Err(SyncError::InvalidParameter(format!(
            "omega (samples per symbol) must be >= 1, got {omega}"
        )));
    }
    Ok(())
}

fn check_relative_limit(limit: f32) -> SyncResult<()> {
    check_finite("omega_relative_limit", limit)?;
    if limit < 0.0 {
        return Err(SyncError::InvalidParameter(format!(
            "omega_relative_limit must be non-negative, got {limit}"
        )));
    }
    Ok(())
}

/// Input views for one `process` call
#[derive(Debug, Clone, Copy)]
pub struct ClockRecoveryInput<'a> {
    /// Oversampled signal the loop interpolates
    pub samples: &'a [Sample],
    /// Optional stream copied to the passthrough output, aligned with `samples`
    pub passthrough: Option<&'a [Sample]>,
}

impl<'a> ClockRecoveryInput<'a> {
    pub fn new(samples: &'a [Sample]) -> Self {
        Self {
            samples,
            passthrough: None,
        }
    }

    pub fn with_passthrough(mut self, passthrough: &'a [Sample]) -> Self {
        self.passthrough = Some(passthrough);
        self
    }
}

/// Output views for one `process` call. Unrequested ports are `None`.
#[derive(Debug)]
pub struct ClockRecoveryOutput<'a> {
    /// Recovered symbols
    pub symbols: &'a mut [Sample],
    /// Raw samples alongside each symbol
    pub passthrough: Option<&'a mut [Sample]>,
    /// Rate estimate after each symbol
    pub omega: Option<&'a mut [f32]>,
    /// Phase after each symbol (before the integer part is dropped)
    pub mu: Option<&'a mut [f32]>,
}

impl<'a> ClockRecoveryOutput<'a> {
    pub fn new(symbols: &'a mut [Sample]) -> Self {
        Self {
            symbols,
            passthrough: None,
            omega: None,
            mu: None,
        }
    }

    pub fn with_passthrough(mut self, passthrough: &'a mut [Sample]) -> Self {
        self.passthrough = Some(passthrough);
        self
    }

    pub fn with_omega(mut self, omega: &'a mut [f32]) -> Self {
        self.omega = Some(omega);
        self
    }

    pub fn with_mu(mut self, mu: &'a mut [f32]) -> Self {
        self.mu = Some(mu);
        self
    }
}

/// Item counts for one `process` call, per port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockRecoveryReport {
    /// Input samples consumed
    pub consumed: usize,
    /// Symbols written
    pub symbols: usize,
    /// Passthrough samples written
    pub passthrough: usize,
    /// Omega values written
    pub omega: usize,
    /// Mu values written
    pub mu: usize,
}

/// Mueller & Muller symbol clock recovery for real-valued samples
#[derive(Debug, Clone)]
pub struct ClockRecovery {
    mu: f32,
    initial_mu: f32,
    gain_mu: f32,
    omega: f32,
    omega_mid: f32,
    /// Rate given at construction; sets the passthrough chunk size
    omega_orig: f32,
    omega_relative_limit: f32,
    /// Absolute clip around `omega_mid`
    omega_lim: f32,
    gain_omega: f32,
    last_sample: f32,
    /// Input the phase advance already stepped past, owed by the next call
    pending_skip: usize,
    interp: FirInterpolator,
}

impl ClockRecovery {
    /// Create a new clock recovery loop
    ///
    /// - `omega`: nominal samples per symbol (>= 1)
    /// - `gain_omega`: rate loop gain (>= 0)
    /// - `mu`: initial fractional offset
    /// - `gain_mu`: phase loop gain (>= 0)
    /// - `omega_relative_limit`: max deviation of omega, relative to `omega`
    pub fn new(
        omega: f32,
        gain_omega: f32,
        mu: f32,
        gain_mu: f32,
        omega_relative_limit: f32,
    ) -> SyncResult<Self> {
        check_omega(omega)?;
        check_gain("gain_omega", gain_omega)?;
        check_gain("gain_mu", gain_mu)?;
        check_finite("mu", mu)?;
        check_relative_limit(omega_relative_limit)?;

        log::debug!(
            "clock recovery: omega={omega} gain_omega={gain_omega} mu={mu} gain_mu={gain_mu} limit={omega_relative_limit}"
        );

        Ok(Self {
            mu,
            initial_mu: mu,
            gain_mu,
            omega,
            omega_mid: omega,
            omega_orig: omega,
            omega_relative_limit,
            omega_lim: omega * omega_relative_limit,
            gain_omega,
            last_sample: 0.0,
            pending_skip: 0,
            interp: FirInterpolator::new(),
        })
    }

    pub fn from_config(config: &ClockRecoveryConfig) -> SyncResult<Self> {
        Self::new(
            config.omega,
            config.gain_omega,
            config.mu,
            config.gain_mu,
            config.omega_relative_limit,
        )
    }

    /// Run the loop over `input`, writing as many symbols as both the input
    /// and every requested output port allow.
    pub fn process(
        &mut self,
        input: ClockRecoveryInput<'_>,
        output: ClockRecoveryOutput<'_>,
    ) -> ClockRecoveryReport {
        let ClockRecoveryOutput {
            symbols,
            mut passthrough,
            omega: mut omega_out,
            mu: mut mu_out,
        } = output;
        let samples = input.samples;
        let ntaps = self.interp.ntaps();

        let mut ii = self.pending_skip.min(samples.len());
        self.pending_skip -= ii;

        // Leave a full interpolator window past the read cursor
        let ni = samples.len().saturating_sub(ntaps);
        let copy_chunk = self.omega_orig.floor() as usize;
        let copying = passthrough.is_some() && input.passthrough.is_some();

        let mut capacity = symbols.len();
        if let Some(out) = omega_out.as_deref() {
            capacity = capacity.min(out.len());
        }
        if let Some(out) = mu_out.as_deref() {
            capacity = capacity.min(out.len());
        }
        if !copying {
            if let Some(out) = passthrough.as_deref() {
                capacity = capacity.min(out.len());
            }
        }

        let mut oo = 0;
        let mut thru_count = 0;

        while oo < capacity && ii < ni {
            if let (Some(thru_out), Some(thru_in)) = (passthrough.as_deref(), input.passthrough) {
                if thru_count + copy_chunk > thru_out.len() || ii + copy_chunk > thru_in.len() {
                    break;
                }
            }

            let y = self.interp.interpolate(&samples[ii..ii + ntaps], self.mu);
            let mut mm_val = slice(self.last_sample) * y - slice(y) * self.last_sample;
            if !mm_val.is_finite() {
                mm_val = 0.0;
            }
            self.last_sample = y;

            self.omega += self.gain_omega * mm_val;
            self.omega = self.omega_mid + branchless_clip(self.omega - self.omega_mid, self.omega_lim);
            self.mu += self.omega + self.gain_mu * mm_val;

            symbols[oo] = y;
            match (passthrough.as_deref_mut(), input.passthrough) {
                (Some(thru_out), Some(thru_in)) => {
                    thru_out[thru_count..thru_count + copy_chunk]
                        .copy_from_slice(&thru_in[ii..ii + copy_chunk]);
                    thru_count += copy_chunk;
                }
                (Some(thru_out), None) => {
                    thru_out[oo] = samples[ii];
                    thru_count += 1;
                }
                _ => {}
            }
            if let Some(out) = omega_out.as_deref_mut() {
                out[oo] = self.omega;
            }
            if let Some(out) = mu_out.as_deref_mut() {
                out[oo] = self.mu;
            }

            // A negative phase step never rewinds the read cursor. Huge steps
            // saturate and are carried as skip.
            let advance = self.mu.floor();
            self.mu -= advance;
            ii = ii.saturating_add(advance.max(0.0) as usize);
            oo += 1;
        }

        if ii > samples.len() {
            self.pending_skip = ii - samples.len();
            ii = samples.len();
        }

        ClockRecoveryReport {
            consumed: ii,
            symbols: oo,
            passthrough: if passthrough.is_some() { thru_count } else { 0 },
            omega: if omega_out.is_some() { oo } else { 0 },
            mu: if mu_out.is_some() { oo } else { 0 },
        }
    }

    /// Current fractional offset, always in `[0, 1)` between calls
    pub fn mu(&self) -> f32 {
        self.mu
    }

    pub fn set_mu(&mut self, mu: f32) -> SyncResult<()> {
        check_finite("mu", mu)?;
        self.mu = mu;
        Ok(())
    }

    /// Current samples-per-symbol estimate
    pub fn omega(&self) -> f32 {
        self.omega
    }

    /// Center of the allowed omega range
    pub fn omega_mid(&self) -> f32 {
        self.omega_mid
    }

    /// Retune the nominal rate. Re-centers the clamp range on `omega`; the
    /// passthrough chunk size keeps following the construction-time rate.
    pub fn set_omega(&mut self, omega: f32) -> SyncResult<()> {
        check_omega(omega)?;
        self.omega = omega;
        self.omega_mid = omega;
        self.omega_lim = omega * self.omega_relative_limit;
        log::debug!("clock recovery: omega set to {omega}");
        Ok(())
    }

    /// Allowed omega range as `(min, max)`
    pub fn omega_range(&self) -> (f32, f32) {
        (self.omega_mid - self.omega_lim, self.omega_mid + self.omega_lim)
    }

    pub fn gain_mu(&self) -> f32 {
        self.gain_mu
    }

    pub fn set_gain_mu(&mut self, gain_mu: f32) -> SyncResult<()> {
        check_gain("gain_mu", gain_mu)?;
        self.gain_mu = gain_mu;
        Ok(())
    }

    pub fn gain_omega(&self) -> f32 {
        self.gain_omega
    }

    pub fn set_gain_omega(&mut self, gain_omega: f32) -> SyncResult<()> {
        check_gain("gain_omega", gain_omega)?;
        self.gain_omega = gain_omega;
        Ok(())
    }

    pub fn omega_relative_limit(&self) -> f32 {
        self.omega_relative_limit
    }

    pub fn set_omega_relative_limit(&mut self, limit: f32) -> SyncResult<()> {
        check_relative_limit(limit)?;
        self.omega_relative_limit = limit;
        self.omega_lim = self.omega_mid * limit;
        self.omega = self.omega_mid + branchless_clip(self.omega - self.omega_mid, self.omega_lim);
        Ok(())
    }

    /// Input samples each interpolation reads
    pub fn ntaps(&self) -> usize {
        self.interp.ntaps()
    }

    /// Raw samples copied per symbol when a passthrough input is supplied
    pub fn passthrough_chunk(&self) -> usize {
        self.omega_orig.floor() as usize
    }

    /// Reset the loop state
    pub fn reset(&mut self) {
        self.mu = self.initial_mu;
        self.omega = self.omega_mid;
        self.last_sample = 0.0;
        self.pending_skip = 0;
    }
}

impl Forecast for ClockRecovery {
    fn forecast(&self, noutput_items: usize) -> usize {
        ((noutput_items as f64 * self.omega as f64).ceil() as usize)
            .saturating_add(self.interp.ntaps())
            .saturating_add(self.pending_skip)
    }
}
