//! Configuration profiles
//!
//! A Configuration is a saved profile holding the parameters for one receive
//! chain: the timing loop settings and the access code to hunt for.

use serde::{Deserialize, Serialize};

/// 64-bit sync word used when no access code is configured
pub const DEFAULT_ACCESS_CODE: &str =
    "1010110011011101101001001110001011110010100011000010000011111100";

/// Hamming distance tolerated against `DEFAULT_ACCESS_CODE`
pub const DEFAULT_THRESHOLD: u32 = 12;

const DEFAULT_GAIN_MU: f32 = 0.175;

fn default_omega_relative_limit() -> f32 {
    0.005
}

/// Mueller & Muller timing loop parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockRecoveryConfig {
    /// Nominal samples per symbol (must be >= 1)
    pub omega: f32,
    /// Rate loop gain
    pub gain_omega: f32,
    /// Initial fractional sample offset
    pub mu: f32,
    /// Phase loop gain
    pub gain_mu: f32,
    /// Maximum relative deviation of omega from its nominal value
    #[serde(default = "default_omega_relative_limit")]
    pub omega_relative_limit: f32,
}

impl Default for ClockRecoveryConfig {
    fn default() -> Self {
        Self {
            omega: 4.0,
            gain_omega: 0.25 * DEFAULT_GAIN_MU * DEFAULT_GAIN_MU,
            mu: 0.5,
            gain_mu: DEFAULT_GAIN_MU,
            omega_relative_limit: default_omega_relative_limit(),
        }
    }
}

/// Access-code correlator parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatorConfig {
    /// Sync word as ASCII '0'/'1' characters, first bit first
    pub access_code: String,
    /// Maximum Hamming distance still counted as a match
    pub threshold: u32,
    /// Also hunt for the complemented code and follow polarity flips
    #[serde(default)]
    pub detect_inversion: bool,
}

impl Default for CorrelatorConfig {
    fn default() -> Self {
        Self {
            access_code: DEFAULT_ACCESS_CODE.to_string(),
            threshold: DEFAULT_THRESHOLD,
            detect_inversion: false,
        }
    }
}

/// A saved configuration profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Profile name (e.g., "4 sps BPSK", "GMSK 2 sps inverted")
    pub name: String,
    pub clock_recovery: ClockRecoveryConfig,
    pub correlator: CorrelatorConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            clock_recovery: ClockRecoveryConfig::default(),
            correlator: CorrelatorConfig::default(),
        }
    }
}
