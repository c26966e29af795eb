use crate::core::models::movement::{MoveChain, MovementError, MovePair};
use rand::Rng;

/// A candidate conformation: the movement chain it owns, its lazily cached
/// fitness, and the number of cycles it has gone without improving.
///
/// The cached fitness is either `None` ("stale") or exactly the score of the
/// current chain; every constructor that produces a fresh or mutated chain
/// leaves it stale, so a stale score can never be read for a mutated chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    chain: MoveChain,
    fitness: Option<f64>,
    idle_iterations: u32,
}

impl Solution {
    /// Bytes of the packed wire form for proteins of `hp_size` beads.
    pub fn packed_len(hp_size: usize) -> usize {
        std::mem::size_of::<f64>() + hp_size - 1
    }

    pub fn new(chain: MoveChain) -> Self {
        Self {
            chain,
            fitness: None,
            idle_iterations: 0,
        }
    }

    /// A solution with a uniformly random movement chain, stale fitness and
    /// zero staleness.
    pub fn random<R: Rng>(hp_size: usize, rng: &mut R) -> Self {
        Self::new(MoveChain::random(hp_size - 1, rng))
    }

    pub fn chain(&self) -> &MoveChain {
        &self.chain
    }

    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// The fitness used in comparisons: stale solutions rank below every
    /// scored one.
    pub fn score(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    pub fn idle_iterations(&self) -> u32 {
        self.idle_iterations
    }

    /// Records one more cycle without improvement.
    pub fn mark_idle(&mut self) {
        self.idle_iterations += 1;
    }

    /// Derives a perturbed copy: one random chain position moves a random
    /// fraction of the discrete distance toward `other`'s value at the same
    /// position.
    ///
    /// Distances are taken on the `[0, 24]` total order over movement pairs;
    /// the step is `round(u · (theirs − own))` with `u` uniform in `[0, 1)`,
    /// so the result always lies between the two original values. The copy
    /// comes back stale with zero staleness.
    pub fn perturbed_toward<R: Rng>(&self, other: &Solution, rng: &mut R) -> Solution {
        let position = rng.gen_range(0..self.chain.len());
        let own = self.chain.pairs()[position];
        let theirs = other.chain.pairs()[position];

        let distance = theirs.index() as i16 - own.index() as i16;
        let delta = (rng.r#gen::<f64>() * distance as f64).round() as i16;
        let index = (own.index() as i16 + delta) as u8;

        let mut chain = self.chain.clone();
        // The step arithmetic keeps the index inside the alphabet.
        chain.set(position, MovePair::from_index(index).unwrap_or(own));
        Self::new(chain)
    }

    /// Packs the solution for the wire: fitness as little-endian `f64`
    /// (negative infinity when stale), then one byte per movement pair.
    pub fn pack(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.score().to_le_bytes());
        let start = out.len();
        out.resize(start + self.chain.len(), 0);
        self.chain.encode(&mut out[start..]);
    }

    /// Inverse of [`Solution::pack`]. Staleness starts at zero.
    pub fn unpack(bytes: &[u8]) -> Result<Self, MovementError> {
        const FITNESS_LEN: usize = std::mem::size_of::<f64>();
        if bytes.len() <= FITNESS_LEN {
            return Err(MovementError::Truncated(bytes.len()));
        }

        let (fitness_bytes, chain_bytes) = bytes.split_at(FITNESS_LEN);
        let fitness = f64::from_le_bytes(
            fitness_bytes
                .try_into()
                .map_err(|_| MovementError::Truncated(bytes.len()))?,
        );
        let chain = MoveChain::decode(chain_bytes)?;

        let mut solution = Self::new(chain);
        if fitness.is_finite() {
            solution.fitness = Some(fitness);
        }
        Ok(solution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_solutions_start_stale_with_zero_staleness() {
        let mut rng = StdRng::seed_from_u64(1);
        let sol = Solution::random(6, &mut rng);
        assert_eq!(sol.chain().len(), 5);
        assert_eq!(sol.fitness(), None);
        assert_eq!(sol.idle_iterations(), 0);
        assert_eq!(sol.score(), f64::NEG_INFINITY);
    }

    #[test]
    fn perturbation_lands_between_the_parent_values() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let a = Solution::random(8, &mut rng);
            let b = Solution::random(8, &mut rng);
            let child = a.perturbed_toward(&b, &mut rng);

            // Exactly one position may differ, and it must lie within the
            // closed interval spanned by the parents at that position.
            let mut changed = 0;
            for (pos, (pa, pc)) in a.chain().pairs().iter().zip(child.chain().pairs()).enumerate() {
                if pa != pc {
                    changed += 1;
                    let low = a.chain().pairs()[pos].index().min(b.chain().pairs()[pos].index());
                    let high = a.chain().pairs()[pos].index().max(b.chain().pairs()[pos].index());
                    assert!((low..=high).contains(&pc.index()));
                }
            }
            assert!(changed <= 1);
            assert_eq!(child.fitness(), None);
            assert_eq!(child.idle_iterations(), 0);
        }
    }

    #[test]
    fn staleness_accumulates_one_cycle_at_a_time() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sol = Solution::random(4, &mut rng);
        sol.mark_idle();
        sol.mark_idle();
        assert_eq!(sol.idle_iterations(), 2);
    }

    #[test]
    fn pack_unpack_round_trips_fitness_and_chain() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut sol = Solution::random(7, &mut rng);
        sol.set_fitness(-12.75);

        let mut bytes = Vec::new();
        sol.pack(&mut bytes);
        assert_eq!(bytes.len(), Solution::packed_len(7));

        let back = Solution::unpack(&bytes).unwrap();
        assert_eq!(back.fitness(), Some(-12.75));
        assert_eq!(back.chain(), sol.chain());
    }

    #[test]
    fn stale_solutions_survive_the_wire_as_stale() {
        let mut rng = StdRng::seed_from_u64(5);
        let sol = Solution::random(5, &mut rng);
        let mut bytes = Vec::new();
        sol.pack(&mut bytes);
        assert_eq!(Solution::unpack(&bytes).unwrap().fitness(), None);
    }
}
