use super::error::EngineError;
use super::hive::Hive;
use super::solution::Solution;
use crate::comm::mesh::Endpoint;
use tracing::{debug, trace};

/// Periodic solution exchange between island coordinators arranged in a
/// ring, plus the final gather of every island's best.
///
/// A no-op when only one island participates.
pub struct MigrationRing<'a> {
    endpoint: &'a Endpoint,
    hp_size: usize,
}

impl<'a> MigrationRing<'a> {
    pub fn new(endpoint: &'a Endpoint, hp_size: usize) -> Self {
        Self { endpoint, hp_size }
    }

    /// Cycles between exchanges: one tenth of the run, rounded up so short
    /// runs still migrate.
    pub fn interval(n_cycles: usize) -> usize {
        ((n_cycles as f64) * 0.1).ceil() as usize
    }

    /// Whether `cycle` is an exchange cycle. Cycle 0 never is.
    pub fn should_exchange(cycle: usize, n_cycles: usize) -> bool {
        cycle != 0 && cycle % Self::interval(n_cycles) == 0
    }

    /// Sends this island's best and one uniformly random population solution
    /// around the ring; each inbound solution force-replaces a uniformly
    /// random slot, without fitness comparison and without touching the best.
    pub fn exchange(&self, hive: &mut Hive) -> Result<(), EngineError> {
        if self.endpoint.size() == 1 {
            return Ok(());
        }

        let random_index = hive.random_slot();
        let mut outbound = Vec::with_capacity(2 * Solution::packed_len(self.hp_size));
        hive.best().pack(&mut outbound);
        hive.solution(random_index).pack(&mut outbound);

        trace!(
            ring_rank = self.endpoint.rank(),
            cycle = hive.cycle(),
            "migrating solutions around the ring"
        );
        let inbound = self.endpoint.ring_exchange(&outbound)?;

        let packed_len = Solution::packed_len(self.hp_size);
        for piece in inbound.chunks_exact(packed_len) {
            let migrant = Solution::unpack(piece)?;
            let slot = hive.random_slot();
            hive.force_replace_solution(migrant, slot);
        }
        Ok(())
    }

    /// Collects every island's best at ring rank 0, which keeps the single
    /// strictly-best solution (ties keep the incumbent). Other islands'
    /// copies are dropped.
    pub fn gather_best(&self, hive: &mut Hive) -> Result<(), EngineError> {
        if self.endpoint.size() == 1 {
            return Ok(());
        }

        let mut packed = Vec::with_capacity(Solution::packed_len(self.hp_size));
        hive.best().pack(&mut packed);

        let gathered = self.endpoint.ring_gather(&packed)?;

        if let Some(all) = gathered {
            for piece in all.chunks_exact(packed.len()) {
                let candidate = Solution::unpack(piece)?;
                if candidate.score() > hive.best().score() {
                    debug!(fitness = candidate.score(), "global best updated from gathered islands");
                    hive.replace_best(candidate);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::mesh::RankMesh;
    use crate::core::models::sequence::HpSequence;
    use crate::engine::config::SearchConfig;
    use crate::engine::evaluator::LocalEvaluator;
    use crate::fitness::energy::{EnergyWeights, FitnessKernel, ScorerBackend};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::thread;

    fn test_hive(seq: &HpSequence, seed: u64) -> Hive {
        let config = SearchConfig::builder()
            .colony_size(8)
            .forager_ratio(0.5)
            .n_cycles(10)
            .build()
            .unwrap();
        let mut hive = Hive::new(&config, seq.len(), StdRng::seed_from_u64(seed));
        let kernel =
            FitnessKernel::new(seq.clone(), EnergyWeights::default(), ScorerBackend::Lattice)
                .unwrap();
        let mut evaluator = LocalEvaluator::new(kernel);
        hive.forager_phase(&mut evaluator).unwrap();
        hive
    }

    #[test]
    fn interval_rounds_up_for_short_runs() {
        assert_eq!(MigrationRing::interval(5), 1);
        assert_eq!(MigrationRing::interval(10), 1);
        assert_eq!(MigrationRing::interval(600), 60);
    }

    #[test]
    fn cycle_zero_never_exchanges() {
        assert!(!MigrationRing::should_exchange(0, 600));
        assert!(MigrationRing::should_exchange(60, 600));
        assert!(!MigrationRing::should_exchange(61, 600));
    }

    #[test]
    fn exchange_is_identity_for_a_single_island() {
        let seq = HpSequence::parse("HPPH").unwrap();
        let endpoints = RankMesh::build(1);
        let mut hive = test_hive(&seq, 7);
        let before: Vec<_> =
            (0..hive.population_size()).map(|i| hive.solution(i).clone()).collect();

        let ring = MigrationRing::new(&endpoints[0], seq.len());
        ring.exchange(&mut hive).unwrap();

        for (i, sol) in before.iter().enumerate() {
            assert_eq!(hive.solution(i), sol);
        }
    }

    #[test]
    fn exchange_installs_two_migrants_per_island() {
        let seq = HpSequence::parse("HPPHPH").unwrap();
        let endpoints = RankMesh::build(2);

        let mut handles = Vec::new();
        for (island, ep) in endpoints.into_iter().enumerate() {
            let seq = seq.clone();
            handles.push(thread::spawn(move || {
                let mut hive = test_hive(&seq, island as u64);
                let before: Vec<_> = (0..hive.population_size())
                    .map(|i| hive.solution(i).chain().clone())
                    .collect();

                let ring = MigrationRing::new(&ep, seq.len());
                ring.exchange(&mut hive).unwrap();

                // Two migrants arrive; the second may land on the first's
                // slot, so between one and two slots now hold foreign chains.
                let foreign = (0..hive.population_size())
                    .filter(|&i| !before.contains(hive.solution(i).chain()))
                    .count();
                assert!(
                    (1..=2).contains(&foreign),
                    "island {island} installed {foreign} migrants"
                );
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn gather_keeps_the_strictly_best_island_solution() {
        let seq = HpSequence::parse("HPPHPH").unwrap();
        let endpoints = RankMesh::build(3);

        let mut handles = Vec::new();
        for (island, ep) in endpoints.into_iter().enumerate() {
            let seq = seq.clone();
            handles.push(thread::spawn(move || {
                let mut hive = test_hive(&seq, 100 + island as u64);
                // Give each island a synthetic best with a known fitness.
                let mut best = hive.best().clone();
                best.set_fitness(island as f64 * 10.0);
                hive.replace_best(best);

                let ring = MigrationRing::new(&ep, seq.len());
                ring.gather_best(&mut hive).unwrap();
                (island, hive.best().score())
            }));
        }
        for handle in handles {
            let (island, best_score) = handle.join().unwrap();
            if island == 0 {
                assert_eq!(best_score, 20.0);
            }
        }
    }
}
