/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Resonance search: find (or create) the cluster a pattern belongs to.
//!
//! One search runs per pattern per pass. Each [`step`] scores every
//! uninhibited prototype, picks the best (random among exact ties), inhibits
//! it, and applies the two-stage vigilance test:
//!
//! ```text
//! score(P, x)  = |P ∧ x| / (β + |P|)          choice score, also simA
//! simB(x)      = |x| / (β + len)               plausibility floor
//! similarity   = |P ∧ x| / |x|                 compared against ρ
//!
//! simA < simB          → NoCandidate  (new cluster)
//! similarity ≥ ρ       → Resonance    (join candidate)
//! otherwise            → Mismatch     (try next-best)
//! ```
//!
//! [`run`] repeats [`step`] until a terminal outcome. The inhibited set grows
//! by one on every mismatch, so the loop is bounded by the cluster count.

use alloc::vec::Vec;
use rand::Rng;

use crate::error::{Art1Error, Result};
use crate::params::NetworkParams;
use crate::pattern::{common_ones, ones_count, ratio, BinaryPattern, PatternId};
use crate::registry::{Cluster, ClusterId, ClusterRegistry};

// ─── Scores ──────────────────────────────────────────────────────────────────

/// Choice score of `prototype` for `pattern`: `|P ∧ x| / (β + |P|)`.
#[inline]
pub fn choice_score(prototype: &BinaryPattern, pattern: &BinaryPattern, beta: f64) -> f64 {
    ratio(
        common_ones(prototype, pattern) as f64,
        beta + ones_count(prototype) as f64,
    )
}

/// Plausibility floor of `pattern`: `|x| / (β + len)`.
#[inline]
pub fn plausibility_floor(pattern: &BinaryPattern, beta: f64) -> f64 {
    ratio(ones_count(pattern) as f64, beta + pattern.len() as f64)
}

/// Vigilance similarity: `|P ∧ x| / |x|`.
#[inline]
pub fn similarity(prototype: &BinaryPattern, pattern: &BinaryPattern) -> f64 {
    ratio(common_ones(prototype, pattern) as f64, ones_count(pattern) as f64)
}

// ─── Candidate selection ─────────────────────────────────────────────────────

/// Result of scoring a set of clusters against one pattern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    /// Best-scoring cluster, `None` when nothing was scored.
    pub chosen: Option<ClusterId>,
    /// Its score (`f64::NEG_INFINITY` when nothing was scored).
    pub score: f64,
    /// Number of clusters that were scored.
    pub candidates: usize,
}

/// Pick the highest-scoring cluster among `clusters`.
///
/// Exact ties are broken uniformly at random with `rng`, over the tied
/// clusters in iteration order. The RNG is only drawn from when there is
/// more than one tied cluster.
pub fn select_candidate<'c, I, R>(
    clusters: I,
    pattern: &BinaryPattern,
    beta: f64,
    rng: &mut R,
) -> Selection
where
    I: IntoIterator<Item = &'c Cluster>,
    R: Rng + ?Sized,
{
    let mut best = f64::NEG_INFINITY;
    let mut ties: Vec<ClusterId> = Vec::new();
    let mut candidates = 0;

    for c in clusters {
        candidates += 1;
        let score = choice_score(c.prototype(), pattern, beta);
        if score > best {
            best = score;
            ties.clear();
            ties.push(c.id());
        } else if score == best {
            ties.push(c.id());
        }
    }

    let chosen = match ties.len() {
        0 => None,
        1 => Some(ties[0]),
        n => Some(ties[rng.gen_range(0..n)]),
    };
    Selection { chosen, score: best, candidates }
}

// ─── Search steps ────────────────────────────────────────────────────────────

/// Outcome of one [`step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStep {
    /// Vigilance passed; the pattern now belongs to `cluster`.
    /// `changed` is false when it was already a member.
    Resonance {
        /// Accepting cluster.
        cluster: ClusterId,
        /// Whether membership actually changed.
        changed: bool,
    },
    /// Vigilance failed; `cluster` stays inhibited and the search continues.
    Mismatch {
        /// Rejected cluster.
        cluster: ClusterId,
    },
    /// No plausible candidate; a new cluster seeded by the pattern was created.
    NoCandidate {
        /// Newly created cluster.
        cluster: ClusterId,
    },
}

/// Terminal result of a full resonance search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// Cluster the pattern ended up in.
    pub cluster: ClusterId,
    /// Whether this counts as a reassignment for fluctuation purposes.
    pub reassigned: bool,
    /// Whether a new cluster was created for the pattern.
    pub created: bool,
    /// Number of mismatches before the terminal step.
    pub mismatches: usize,
}

/// Run one selection + vigilance test for `patterns[id]`.
///
/// Mutates the registry: inhibits the candidate, and on a terminal outcome
/// either adds the pattern to it or creates a new cluster.
pub fn step<R: Rng + ?Sized>(
    registry: &mut ClusterRegistry,
    patterns: &[BinaryPattern],
    id: PatternId,
    params: &NetworkParams,
    rng: &mut R,
) -> Result<SearchStep> {
    let pattern = &patterns[id];
    let selection = select_candidate(
        registry.iter().filter(|c| !c.is_inhibited()),
        pattern,
        params.beta,
        rng,
    );

    let candidate = match selection.chosen {
        Some(c) => c,
        None if selection.candidates == 0 => {
            let cluster = registry.create_cluster(patterns, id)?;
            return Ok(SearchStep::NoCandidate { cluster });
        }
        None => {
            tracing::error!(
                pattern = id,
                candidates = selection.candidates,
                "empty tie set with uninhibited clusters present"
            );
            return Err(Art1Error::EmptyTieSet {
                pattern: id,
                candidates: selection.candidates,
            });
        }
    };

    registry.inhibit(candidate);

    let sim_a = selection.score;
    let sim_b = plausibility_floor(pattern, params.beta);
    if sim_a < sim_b {
        let cluster = registry.create_cluster(patterns, id)?;
        return Ok(SearchStep::NoCandidate { cluster });
    }

    let sim = match registry.get(candidate) {
        Some(c) => similarity(c.prototype(), pattern),
        None => 0.0,
    };
    if sim >= params.vigilance {
        let changed = registry.add_pattern(patterns, candidate, id);
        Ok(SearchStep::Resonance { cluster: candidate, changed })
    } else {
        tracing::trace!(pattern = id, cluster = candidate.0, sim, "mismatch");
        Ok(SearchStep::Mismatch { cluster: candidate })
    }
}

/// Run [`step`] until a terminal outcome for `patterns[id]`.
///
/// The caller resets inhibition before each pattern.
pub fn run<R: Rng + ?Sized>(
    registry: &mut ClusterRegistry,
    patterns: &[BinaryPattern],
    id: PatternId,
    params: &NetworkParams,
    rng: &mut R,
) -> Result<Assignment> {
    let mut mismatches = 0;
    loop {
        match step(registry, patterns, id, params, rng)? {
            SearchStep::Resonance { cluster, changed } => {
                return Ok(Assignment { cluster, reassigned: changed, created: false, mismatches });
            }
            SearchStep::NoCandidate { cluster } => {
                return Ok(Assignment { cluster, reassigned: true, created: true, mismatches });
            }
            SearchStep::Mismatch { .. } => mismatches += 1,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
