/*
 * This source code is licensed under the Business Source License 1.1.
 * See LICENSE in the root directory for full details.
 */

//! Learning-free classification against a frozen [`TrainedNetwork`].
//!
//! Only the selection half of a resonance search runs here: the best-scoring
//! prototype wins, with no vigilance test, no inhibition loop, and no change to
//! the clusters.

use alloc::vec::Vec;
use rand::Rng;

use crate::pattern::BinaryPattern;
use crate::registry::ClusterId;
use crate::resonance::select_candidate;
use crate::training::TrainedNetwork;

impl TrainedNetwork {
    /// Best-matching cluster for `pattern`, or `None` if the network is empty.
    ///
    /// Exact score ties are broken with `rng`; pin its seed for reproducible
    /// predictions.
    pub fn classify<R: Rng + ?Sized>(&self, pattern: &BinaryPattern, rng: &mut R) -> Option<ClusterId> {
        select_candidate(self.registry.iter(), pattern, self.params.beta, rng).chosen
    }

    /// [`Self::classify`] over a batch, in order.
    pub fn classify_all<R: Rng + ?Sized>(
        &self,
        patterns: &[BinaryPattern],
        rng: &mut R,
    ) -> Vec<Option<ClusterId>> {
        patterns.iter().map(|p| self.classify(p, rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::params::NetworkParams;
    use crate::pattern::BinaryPattern;
    use crate::training::Trainer;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trained() -> crate::training::TrainedNetwork {
        let p: alloc::vec::Vec<BinaryPattern> = [[1u8, 1, 0, 0], [1, 1, 0, 0], [0, 0, 1, 1]]
            .iter()
            .map(|r| BinaryPattern::from_bits(r))
            .collect();
        let params = NetworkParams { beta: 0.0, vigilance: 0.9, max_passes: 5, min_fluctuation: 0.0 };
        let mut rng = StdRng::seed_from_u64(1);
        Trainer::new(params).unwrap().train(&p, &mut rng).unwrap().network
    }

    #[test]
    fn test_classify_picks_matching_prototype() {
        let net = trained();
        let mut rng = StdRng::seed_from_u64(2);
        let ids: alloc::vec::Vec<_> = net.clusters().ids().collect();
        assert_eq!(net.classify(&BinaryPattern::from_bits(&[1, 1, 0, 0]), &mut rng), Some(ids[0]));
        assert_eq!(net.classify(&BinaryPattern::from_bits(&[0, 1, 1, 1]), &mut rng), Some(ids[1]));
    }

    #[test]
    fn test_classify_does_not_mutate() {
        let net = trained();
        let before: alloc::vec::Vec<_> = net.clusters().iter().map(|c| c.prototype().clone()).collect();
        let mut rng = StdRng::seed_from_u64(2);
        let query = BinaryPattern::from_bits(&[1, 0, 0, 0]);
        let _ = net.classify_all(&[query.clone(), query], &mut rng);
        let after: alloc::vec::Vec<_> = net.clusters().iter().map(|c| c.prototype().clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_repeated_classification_with_same_seed_is_identical() {
        let net = trained();
        // 1001 ties both prototypes (score 1/2 each).
        let query = BinaryPattern::from_bits(&[1, 0, 0, 1]);
        let a = net.classify(&query, &mut StdRng::seed_from_u64(11));
        let b = net.classify(&query, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
        assert!(a.is_some());
    }
}
