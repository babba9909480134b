/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Network parameters.
//!
//! Constructed once by the caller, validated by [`crate::training::Trainer::new`],
//! and never mutated by the core.

use alloc::format;

use crate::error::{Art1Error, Result};

/// ART1 network parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NetworkParams {
    /// Smoothing constant β ≥ 0 in the choice score and the plausibility test.
    /// Larger values damp the bias toward prototypes with few set bits.
    /// Default: 1.0.
    pub beta: f64,

    /// Vigilance ρ ∈ (0, 1]. Higher values demand tighter matches and produce
    /// more clusters. Default: 0.5.
    pub vigilance: f64,

    /// Upper bound on training passes (≥ 1). Default: 50.
    pub max_passes: usize,

    /// Training stops once a pass fluctuates by this percentage or less
    /// (≥ 0). Default: 0.0.
    pub min_fluctuation: f64,
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self {
            beta: 1.0,
            vigilance: 0.5,
            max_passes: 50,
            min_fluctuation: 0.0,
        }
    }
}

impl NetworkParams {
    /// Check every parameter against its valid range.
    pub fn validate(&self) -> Result<()> {
        if !(self.beta >= 0.0) || !self.beta.is_finite() {
            return Err(Art1Error::InvalidParams(format!(
                "beta must be a finite value >= 0, got {}",
                self.beta
            )));
        }
        if !(self.vigilance > 0.0 && self.vigilance <= 1.0) {
            return Err(Art1Error::InvalidParams(format!(
                "vigilance must be in (0, 1], got {}",
                self.vigilance
            )));
        }
        if self.max_passes == 0 {
            return Err(Art1Error::InvalidParams(
                "max_passes must be at least 1".into(),
            ));
        }
        if !(self.min_fluctuation >= 0.0) {
            return Err(Art1Error::InvalidParams(format!(
                "min_fluctuation must be >= 0, got {}",
                self.min_fluctuation
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(NetworkParams::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let bad = [
            NetworkParams { beta: -1.0, ..Default::default() },
            NetworkParams { beta: f64::NAN, ..Default::default() },
            NetworkParams { vigilance: 0.0, ..Default::default() },
            NetworkParams { vigilance: 1.5, ..Default::default() },
            NetworkParams { max_passes: 0, ..Default::default() },
            NetworkParams { min_fluctuation: -0.1, ..Default::default() },
        ];
        for p in &bad {
            assert!(
                matches!(p.validate(), Err(Art1Error::InvalidParams(_))),
                "{:?} should be rejected",
                p
            );
        }
    }

    #[test]
    fn test_vigilance_one_and_beta_zero_are_valid() {
        let p = NetworkParams { beta: 0.0, vigilance: 1.0, ..Default::default() };
        assert!(p.validate().is_ok());
    }
}
