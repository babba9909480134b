/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! The cluster registry: every cluster, its prototype, and who owns which pattern.
//!
//! Clusters carry a stable [`ClusterId`] allocated from a monotonic counter and
//! are stored in creation order. Deleting a cluster never renumbers the others,
//! so an id picked during a resonance search stays valid (or resolves to
//! `None`) no matter what earlier patterns did to the registry.
//!
//! # Invariants
//!
//! - **ART-R01**: a cluster's prototype is the bitwise AND of its members.
//!   Additions fold incrementally; removals rebuild from scratch.
//! - **ART-R02**: a pattern id belongs to at most one cluster, and `owners`
//!   mirrors the member lists exactly.
//! - **ART-R03**: no cluster is ever empty. Losing the last member deletes it.

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::error::{Art1Error, Result};
use crate::pattern::{fold_into, BinaryPattern, PatternId};

// ─── ClusterId ───────────────────────────────────────────────────────────────

/// Stable cluster identifier. Never reused within one registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterId(pub u32);

impl core::fmt::Display for ClusterId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Cluster ─────────────────────────────────────────────────────────────────

/// One cluster: its prototype, its members, and per-search inhibition state.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cluster {
    id: ClusterId,
    prototype: BinaryPattern,
    members: Vec<PatternId>,
    #[cfg_attr(feature = "serde", serde(skip))]
    inhibited: bool,
}

impl Cluster {
    /// Stable identifier.
    pub fn id(&self) -> ClusterId {
        self.id
    }

    /// Current prototype (AND of all members).
    pub fn prototype(&self) -> &BinaryPattern {
        &self.prototype
    }

    /// Member pattern ids, in insertion order.
    pub fn members(&self) -> &[PatternId] {
        &self.members
    }

    /// Whether the cluster is excluded from the current resonance search.
    pub fn is_inhibited(&self) -> bool {
        self.inhibited
    }
}

// ─── ClusterRegistry ─────────────────────────────────────────────────────────

/// Owns all clusters and the pattern → cluster ownership map.
#[derive(Clone, Debug, Default)]
pub struct ClusterRegistry {
    clusters: Vec<Cluster>,
    owners: HashMap<PatternId, ClusterId>,
    next_id: u32,
}

impl ClusterRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// True when no cluster exists.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Iterate clusters in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    /// Ids of all live clusters, in creation order.
    pub fn ids(&self) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters.iter().map(|c| c.id)
    }

    /// Look up a cluster by id. `None` once the cluster has been deleted.
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.slot(id).map(|i| &self.clusters[i])
    }

    /// The cluster currently owning `pattern`, if any.
    pub fn owner_of(&self, pattern: PatternId) -> Option<ClusterId> {
        self.owners.get(&pattern).copied()
    }

    /// Clear the inhibition flag on every cluster.
    pub fn reset_inhibition(&mut self) {
        for c in &mut self.clusters {
            c.inhibited = false;
        }
    }

    /// Exclude a cluster from the rest of the current search.
    pub fn inhibit(&mut self, id: ClusterId) {
        if let Some(i) = self.slot(id) {
            self.clusters[i].inhibited = true;
        }
    }

    /// Whether `id` is inhibited. Unknown ids read as not inhibited.
    pub fn is_inhibited(&self, id: ClusterId) -> bool {
        self.get(id).is_some_and(|c| c.inhibited)
    }

    /// Create a cluster seeded by `patterns[seed]` and return its id.
    ///
    /// If the seed already belongs to a cluster it is removed from there first.
    /// Fails without touching the registry once the id space is used up.
    pub fn create_cluster(
        &mut self,
        patterns: &[BinaryPattern],
        seed: PatternId,
    ) -> Result<ClusterId> {
        let id = ClusterId(self.next_id);
        let next = self.next_id.checked_add(1).ok_or_else(|| {
            tracing::error!(created = self.next_id, "cluster id space exhausted");
            Art1Error::ClusterIdsExhausted { created: self.next_id }
        })?;
        if let Some(owner) = self.owner_of(seed) {
            self.remove_pattern(patterns, owner, seed);
        }
        self.next_id = next;
        self.clusters.push(Cluster {
            id,
            prototype: patterns[seed].clone(),
            members: alloc::vec![seed],
            inhibited: false,
        });
        self.owners.insert(seed, id);
        Ok(id)
    }

    /// Remove `pattern` from cluster `id`.
    ///
    /// Deletes the cluster when it empties; otherwise rebuilds the prototype by
    /// folding every remaining member into a copy of the first. Returns `true`
    /// when the pattern was a member.
    pub fn remove_pattern(
        &mut self,
        patterns: &[BinaryPattern],
        id: ClusterId,
        pattern: PatternId,
    ) -> bool {
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let cluster = &mut self.clusters[slot];
        let Some(pos) = cluster.members.iter().position(|&m| m == pattern) else {
            return false;
        };
        cluster.members.remove(pos);
        if self.owners.get(&pattern) == Some(&id) {
            self.owners.remove(&pattern);
        }

        if cluster.members.is_empty() {
            self.clusters.remove(slot);
        } else {
            let mut proto = patterns[cluster.members[0]].clone();
            for &m in &cluster.members[1..] {
                fold_into(&mut proto, &patterns[m]);
            }
            cluster.prototype = proto;
        }
        true
    }

    /// Add `pattern_id` to cluster `id`, transferring it from its previous owner.
    ///
    /// Returns `false` (no change) when the pattern is already a member of `id`
    /// or when `id` no longer exists.
    pub fn add_pattern(
        &mut self,
        patterns: &[BinaryPattern],
        id: ClusterId,
        pattern_id: PatternId,
    ) -> bool {
        match self.owner_of(pattern_id) {
            Some(owner) if owner == id => return false,
            Some(owner) => {
                self.remove_pattern(patterns, owner, pattern_id);
            }
            None => {}
        }
        // Looked up after the removal: deleting the old owner may shift slots.
        let Some(slot) = self.slot(id) else {
            return false;
        };
        let cluster = &mut self.clusters[slot];
        cluster.members.push(pattern_id);
        fold_into(&mut cluster.prototype, &patterns[pattern_id]);
        self.owners.insert(pattern_id, id);
        true
    }

    /// Consume the registry and hand out its clusters in creation order.
    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    fn slot(&self, id: ClusterId) -> Option<usize> {
        // Creation order == id order, and removal preserves order.
        self.clusters.binary_search_by_key(&id, |c| c.id).ok()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
