/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Training passes and the convergence controller.
//!
//! ```text
//! LOOP pass = 1, 2, ...
//!     clear reassignment flags
//!     FOR pattern IN 0..N            (fixed order; assignment is order-dependent)
//!         clear inhibition
//!         resonance::run(pattern)    (retry with inhibition until terminal)
//!     fluctuation = 100 × reassigned / N
//!     IF fluctuation < best: best = clone(registry)
//! UNTIL pass ≥ max_passes OR fluctuation ≤ min_fluctuation
//! ```
//!
//! The retained network is the best (lowest-fluctuation) snapshot, which is not
//! necessarily the state after the final pass.

use alloc::vec;
use alloc::vec::Vec;
use rand::Rng;

use crate::error::{Art1Error, Result};
use crate::params::NetworkParams;
use crate::pattern::BinaryPattern;
use crate::registry::ClusterRegistry;
use crate::resonance;

/// Best-so-far sentinel; any real fluctuation (≤ 100) improves on it.
const UNREACHED_FLUCTUATION: f64 = f64::INFINITY;

// ─── PassStats ───────────────────────────────────────────────────────────────

/// Statistics for one training pass.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassStats {
    /// 1-based pass number.
    pub pass: usize,
    /// Patterns whose assignment changed during the pass.
    pub reassigned: usize,
    /// `100 × reassigned / N`.
    pub fluctuation: f64,
    /// Live clusters at the end of the pass.
    pub clusters: usize,
}

/// `100 × reassigned / total`. Zero when `total` is zero.
pub fn fluctuation(reassigned: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * reassigned as f64 / total as f64
    }
}

// ─── TrainedNetwork ──────────────────────────────────────────────────────────

/// Frozen clusters retained from the best training pass.
///
/// The classification API lives in [`crate::classify`].
#[derive(Clone, Debug)]
pub struct TrainedNetwork {
    pub(crate) registry: ClusterRegistry,
    pub(crate) params: NetworkParams,
    pub(crate) pattern_len: usize,
}

impl TrainedNetwork {
    /// The learned clusters.
    pub fn clusters(&self) -> &ClusterRegistry {
        &self.registry
    }

    /// Number of learned clusters.
    pub fn cluster_count(&self) -> usize {
        self.registry.len()
    }

    /// Parameters the network was trained with.
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Bit length of the training patterns.
    pub fn pattern_len(&self) -> usize {
        self.pattern_len
    }
}

/// Everything training produces.
#[derive(Clone, Debug)]
pub struct TrainingOutcome {
    /// Clusters from the lowest-fluctuation pass.
    pub network: TrainedNetwork,
    /// Fluctuation of that pass.
    pub best_fluctuation: f64,
    /// Pass (1-based) the retained network comes from.
    pub best_pass: usize,
    /// Per-pass statistics, in order.
    pub history: Vec<PassStats>,
}

impl TrainingOutcome {
    /// Number of passes actually run.
    pub fn passes(&self) -> usize {
        self.history.len()
    }
}

// ─── Trainer ─────────────────────────────────────────────────────────────────

/// Drives training passes until convergence or the pass limit.
#[derive(Clone, Debug)]
pub struct Trainer {
    params: NetworkParams,
}

impl Trainer {
    /// Validate `params` and build a trainer.
    pub fn new(params: NetworkParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Parameters in use.
    pub fn params(&self) -> &NetworkParams {
        &self.params
    }

    /// Train on `patterns`, which must be non-empty and of equal length.
    ///
    /// `rng` is used only for tie-breaks; a seeded RNG gives a reproducible run.
    pub fn train<R: Rng + ?Sized>(
        &self,
        patterns: &[BinaryPattern],
        rng: &mut R,
    ) -> Result<TrainingOutcome> {
        let Some(first) = patterns.first() else {
            return Err(Art1Error::EmptyTrainingSet);
        };
        let pattern_len = first.len();
        let n = patterns.len();

        let mut registry = ClusterRegistry::new();
        let mut reassigned = vec![false; n];
        let mut history = Vec::new();
        let mut best: Option<ClusterRegistry> = None;
        let mut best_fluctuation = UNREACHED_FLUCTUATION;
        let mut best_pass = 0;

        loop {
            let pass = history.len() + 1;
            reassigned.fill(false);

            for id in 0..n {
                registry.reset_inhibition();
                let a = resonance::run(&mut registry, patterns, id, &self.params, rng)?;
                if a.reassigned {
                    reassigned[id] = true;
                }
                tracing::debug!(
                    pass,
                    pattern = id,
                    cluster = a.cluster.0,
                    created = a.created,
                    reassigned = a.reassigned,
                    mismatches = a.mismatches,
                    "pattern assigned"
                );
            }

            let count = reassigned.iter().filter(|&&r| r).count();
            let stats = PassStats {
                pass,
                reassigned: count,
                fluctuation: fluctuation(count, n),
                clusters: registry.len(),
            };
            tracing::info!(
                pass,
                reassigned = stats.reassigned,
                fluctuation = stats.fluctuation,
                clusters = stats.clusters,
                "training pass complete"
            );
            history.push(stats);

            if stats.fluctuation < best_fluctuation {
                best = Some(registry.clone());
                best_fluctuation = stats.fluctuation;
                best_pass = pass;
            }

            if pass >= self.params.max_passes || stats.fluctuation <= self.params.min_fluctuation {
                break;
            }
        }

        // The first pass always beats the sentinel, so `best` is set.
        let mut registry = best.unwrap_or(registry);
        registry.reset_inhibition();

        Ok(TrainingOutcome {
            network: TrainedNetwork {
                registry,
                params: self.params.clone(),
                pattern_len,
            },
            best_fluctuation,
            best_pass,
            history,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
