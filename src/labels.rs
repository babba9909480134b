/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Majority-class labelling of clusters and success/fail tallies.
//!
//! ART1 never sees class labels. After training, each cluster is given the
//! label held by most of its members, and predictions are scored by comparing
//! that label with a pattern's own.
//!
//! Label ties inside a cluster go to the label that appears first in the
//! training set.

use alloc::vec::Vec;
use core::hash::Hash;
use hashbrown::HashMap;
use rand::Rng;

use crate::error::{Art1Error, Result};
use crate::pattern::BinaryPattern;
use crate::registry::ClusterId;
use crate::training::TrainedNetwork;

// ─── Tally ───────────────────────────────────────────────────────────────────

/// Success / failure counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tally {
    /// Predictions whose label matched.
    pub success: usize,
    /// Predictions whose label did not match (including unlabelled clusters).
    pub fail: usize,
}

impl Tally {
    /// Total predictions.
    pub fn total(&self) -> usize {
        self.success + self.fail
    }

    /// Success percentage in [0, 100]. Zero when empty.
    pub fn success_rate(&self) -> f64 {
        percent(self.success, self.total())
    }

    /// Failure percentage in [0, 100]. Zero when empty.
    pub fn fail_rate(&self) -> f64 {
        percent(self.fail, self.total())
    }

    /// `success / fail`; infinite when nothing failed.
    pub fn ratio(&self) -> f64 {
        self.success as f64 / self.fail as f64
    }

    fn record(&mut self, ok: bool) {
        if ok {
            self.success += 1;
        } else {
            self.fail += 1;
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

// ─── Prediction ──────────────────────────────────────────────────────────────

/// Outcome of classifying one labelled pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction<L> {
    /// Matched cluster, `None` for an empty network.
    pub cluster: Option<ClusterId>,
    /// That cluster's majority label.
    pub predicted: Option<L>,
    /// The pattern's own label.
    pub actual: L,
}

impl<L: PartialEq> Prediction<L> {
    /// Whether the predicted label equals the actual one.
    pub fn is_success(&self) -> bool {
        self.predicted.as_ref() == Some(&self.actual)
    }
}

/// Per-pattern predictions plus their tally.
#[derive(Clone, Debug)]
pub struct Evaluation<L> {
    /// One entry per test pattern, in order.
    pub predictions: Vec<Prediction<L>>,
    /// Aggregate counts.
    pub tally: Tally,
}

// ─── ClusterLabels ───────────────────────────────────────────────────────────

/// Per-cluster label distribution and majority label.
#[derive(Clone, Debug)]
pub struct ClusterLabels<L> {
    /// Distinct training labels in order of first appearance.
    classes: Vec<L>,
    /// For each cluster (creation order): id, count per class, majority label.
    rows: Vec<(ClusterId, Vec<usize>, Option<L>)>,
}

impl<L: Clone + Eq + Hash> ClusterLabels<L> {
    /// Label every cluster of `network` by majority vote of its members.
    ///
    /// `labels[i]` is the class of training pattern `i`.
    pub fn from_training(network: &TrainedNetwork, labels: &[L]) -> Result<Self> {
        let max_member = network
            .clusters()
            .iter()
            .flat_map(|c| c.members().iter().copied())
            .max();
        if let Some(m) = max_member.filter(|&m| m >= labels.len()) {
            // Member ids are training-set positions, so the set held at least m + 1.
            return Err(Art1Error::LabelCountMismatch { labels: labels.len(), patterns: m + 1 });
        }

        let mut classes: Vec<L> = Vec::new();
        let mut index: HashMap<&L, usize> = HashMap::new();
        for l in labels {
            if !index.contains_key(l) {
                index.insert(l, classes.len());
                classes.push(l.clone());
            }
        }

        let rows = network
            .clusters()
            .iter()
            .map(|c| {
                let mut counts = alloc::vec![0usize; classes.len()];
                for &m in c.members() {
                    counts[index[&labels[m]]] += 1;
                }
                let mut major: Option<usize> = None;
                let mut score = 0;
                for (i, &n) in counts.iter().enumerate() {
                    if n > score {
                        score = n;
                        major = Some(i);
                    }
                }
                (c.id(), counts, major.map(|i| classes[i].clone()))
            })
            .collect();

        Ok(Self { classes, rows })
    }

    /// Distinct labels in order of first appearance.
    pub fn classes(&self) -> &[L] {
        &self.classes
    }

    /// Majority label of `cluster`.
    pub fn label_of(&self, cluster: ClusterId) -> Option<&L> {
        self.rows
            .iter()
            .find(|(id, _, _)| *id == cluster)
            .and_then(|(_, _, l)| l.as_ref())
    }

    /// Iterate `(cluster, per-class counts, majority label)` in creation order.
    pub fn repartition(&self) -> impl Iterator<Item = (ClusterId, &[usize], Option<&L>)> {
        self.rows
            .iter()
            .map(|(id, counts, l)| (*id, counts.as_slice(), l.as_ref()))
    }

    /// Compare every training pattern's label with its cluster's label.
    ///
    /// Patterns not owned by any retained cluster count as failures.
    pub fn training_tally(&self, network: &TrainedNetwork, labels: &[L]) -> Tally {
        let mut tally = Tally::default();
        for (i, l) in labels.iter().enumerate() {
            let predicted = network.clusters().owner_of(i).and_then(|c| self.label_of(c));
            tally.record(predicted == Some(l));
        }
        tally
    }

    /// Classify labelled test patterns and score them.
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        network: &TrainedNetwork,
        patterns: &[BinaryPattern],
        labels: &[L],
        rng: &mut R,
    ) -> Result<Evaluation<L>> {
        if patterns.len() != labels.len() {
            return Err(Art1Error::LabelCountMismatch {
                labels: labels.len(),
                patterns: patterns.len(),
            });
        }
        let mut tally = Tally::default();
        let predictions = patterns
            .iter()
            .zip(labels)
            .map(|(p, actual)| {
                let cluster = network.classify(p, rng);
                let predicted = cluster.and_then(|c| self.label_of(c)).cloned();
                let prediction = Prediction { cluster, predicted, actual: actual.clone() };
                tally.record(prediction.is_success());
                prediction
            })
            .collect();
        Ok(Evaluation { predictions, tally })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NetworkParams;
    use crate::training::Trainer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn setup() -> (TrainedNetwork, Vec<&'static str>) {
        let p: Vec<BinaryPattern> = [
            [1u8, 1, 0, 0, 0, 0],
            [1, 1, 1, 0, 0, 0],
            [1, 1, 0, 1, 0, 0],
            [0, 0, 0, 0, 1, 1],
            [0, 0, 0, 1, 1, 1],
        ]
        .iter()
        .map(|r| BinaryPattern::from_bits(r))
        .collect();
        let labels = alloc::vec!["a", "a", "b", "c", "c"];
        let params = NetworkParams { beta: 0.0, vigilance: 0.6, max_passes: 10, min_fluctuation: 0.0 };
        let mut rng = StdRng::seed_from_u64(4);
        let net = Trainer::new(params).unwrap().train(&p, &mut rng).unwrap().network;
        (net, labels)
    }

    #[test]
    fn test_majority_labels() {
        let (net, labels) = setup();
        let cl = ClusterLabels::from_training(&net, &labels).unwrap();
        assert_eq!(cl.classes(), &["a", "b", "c"]);
        for (id, counts, label) in cl.repartition() {
            let total: usize = counts.iter().sum();
            assert_eq!(total, net.clusters().get(id).map(|c| c.members().len()).unwrap());
            assert!(label.is_some());
        }
        let owner0 = net.clusters().owner_of(0).unwrap();
        assert_eq!(cl.label_of(owner0), Some(&"a"));
        let owner3 = net.clusters().owner_of(3).unwrap();
        assert_eq!(cl.label_of(owner3), Some(&"c"));
    }

    #[test]
    fn test_training_tally_counts_every_pattern() {
        let (net, labels) = setup();
        let cl = ClusterLabels::from_training(&net, &labels).unwrap();
        let t = cl.training_tally(&net, &labels);
        assert_eq!(t.total(), 5);
        assert!(t.success >= 4, "{:?}", t);
    }

    #[test]
    fn test_evaluate_scores_predictions() {
        let (net, labels) = setup();
        let cl = ClusterLabels::from_training(&net, &labels).unwrap();
        let tests = [
            BinaryPattern::from_bits(&[1, 1, 0, 0, 0, 0]),
            BinaryPattern::from_bits(&[0, 0, 0, 0, 1, 1]),
        ];
        let mut rng = StdRng::seed_from_u64(0);
        let eval = cl.evaluate(&net, &tests, &["a", "a"], &mut rng).unwrap();
        assert_eq!(eval.predictions.len(), 2);
        assert!(eval.predictions[0].is_success());
        assert!(!eval.predictions[1].is_success());
        assert_eq!(eval.tally, Tally { success: 1, fail: 1 });
        assert_eq!(eval.tally.success_rate(), 50.0);
        assert_eq!(eval.tally.ratio(), 1.0);
    }

    #[test]
    fn test_evaluate_rejects_label_mismatch() {
        let (net, labels) = setup();
        let cl = ClusterLabels::from_training(&net, &labels).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let res = cl.evaluate(&net, &[BinaryPattern::zeros(6)], &[], &mut rng);
        assert!(matches!(res, Err(Art1Error::LabelCountMismatch { .. })));
    }

    #[test]
    fn test_too_few_labels_rejected() {
        let (net, _) = setup();
        let err = ClusterLabels::from_training(&net, &["a", "a"]).unwrap_err();
        assert!(
            matches!(err, Art1Error::LabelCountMismatch { labels: 2, patterns: 5 }),
            "{err}"
        );
    }

    #[test]
    fn test_tally_rates() {
        let t = Tally { success: 3, fail: 1 };
        assert_eq!(t.success_rate(), 75.0);
        assert_eq!(t.fail_rate(), 25.0);
        assert_eq!(t.ratio(), 3.0);
        assert_eq!(Tally::default().success_rate(), 0.0);
    }
}
