use super::config::SearchConfig;
use super::error::EngineError;
use super::evaluator::BatchEvaluator;
use super::solution::Solution;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

/// One independent population undergoing ABC search.
///
/// An explicit context object owned by the caller: it holds the population
/// slots, the designated best solution, the cycle counter, and its own seeded
/// random stream. Exactly one solution is the hive's best at any time,
/// independent of population membership; its fitness is monotone
/// non-decreasing across the run.
pub struct Hive {
    solutions: Vec<Solution>,
    best: Solution,
    cycle: usize,
    hp_size: usize,
    idle_limit: u32,
    n_onlookers: usize,
    rng: StdRng,
}

impl Hive {
    /// Builds a hive with `population_size` uniformly random solutions and a
    /// random initial best, all with stale fitness.
    pub fn new(config: &SearchConfig, hp_size: usize, mut rng: StdRng) -> Self {
        let population_size = config.population_size();
        let solutions = (0..population_size)
            .map(|_| Solution::random(hp_size, &mut rng))
            .collect();
        let best = Solution::random(hp_size, &mut rng);

        debug!(
            population_size,
            n_onlookers = config.onlooker_count(),
            idle_limit = config.idle_limit,
            "hive initialized"
        );

        Self {
            solutions,
            best,
            cycle: 0,
            hp_size,
            idle_limit: config.idle_limit,
            n_onlookers: config.onlooker_count(),
            rng,
        }
    }

    pub fn population_size(&self) -> usize {
        self.solutions.len()
    }

    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn solution(&self, index: usize) -> &Solution {
        &self.solutions[index]
    }

    pub fn best(&self) -> &Solution {
        &self.best
    }

    /// Advances the cycle counter after all phases of a cycle have run.
    pub fn increment_cycle(&mut self) {
        self.cycle += 1;
    }

    /// Picks a uniformly random population slot.
    pub fn random_slot(&mut self) -> usize {
        self.rng.gen_range(0..self.solutions.len())
    }

    /// Derives one perturbed candidate for slot `index`, moving it toward a
    /// distinct random slot.
    fn perturb_solution(&mut self, index: usize) -> Solution {
        let other = loop {
            let candidate = self.rng.gen_range(0..self.solutions.len());
            if candidate != index {
                break candidate;
            }
        };
        self.solutions[index].perturbed_toward(&self.solutions[other], &mut self.rng)
    }

    /// Greedy acceptance: installs `alt` in slot `index` only if it scores
    /// strictly higher, updating the best on improvement. A rejected
    /// candidate is dropped and the slot's staleness grows by one.
    fn try_replace_solution(&mut self, alt: Solution, index: usize) {
        let alt_fitness = alt.score();
        if alt_fitness > self.solutions[index].score() {
            if alt_fitness > self.best.score() {
                trace!(cycle = self.cycle, fitness = alt_fitness, "new best solution");
                self.best = alt.clone();
            }
            self.solutions[index] = alt;
        } else {
            self.solutions[index].mark_idle();
        }
    }

    /// Unconditionally installs `alt` in slot `index`, dropping the previous
    /// occupant. Never consults or updates the best solution.
    pub fn force_replace_solution(&mut self, alt: Solution, index: usize) {
        self.solutions[index] = alt;
    }

    /// Replaces the best solution. Used by the final inter-island gather.
    pub fn replace_best(&mut self, new_best: Solution) {
        self.best = new_best;
    }

    /// Runs one full search cycle: forager, onlooker, then scout phase.
    pub fn run_cycle(&mut self, evaluator: &mut dyn BatchEvaluator) -> Result<(), EngineError> {
        self.forager_phase(evaluator)?;
        self.onlooker_phase(evaluator)?;
        self.scout_phase(evaluator)?;
        self.increment_cycle();
        Ok(())
    }

    /// Forager phase: one perturbed candidate per slot, batch-priced, then
    /// greedily accepted.
    pub fn forager_phase(&mut self, evaluator: &mut dyn BatchEvaluator) -> Result<(), EngineError> {
        let mut candidates: Vec<Solution> = (0..self.solutions.len())
            .map(|index| self.perturb_solution(index))
            .collect();

        evaluator.evaluate(&mut candidates)?;

        for (index, candidate) in candidates.into_iter().enumerate() {
            self.try_replace_solution(candidate, index);
        }
        Ok(())
    }

    /// Onlooker phase: slots attract visits proportional to their normalized
    /// fitness; every visit is a perturbation priced and accepted like a
    /// forager's.
    ///
    /// Fitness can be negative, so weights are shifted by the lowest observed
    /// fitness (floored at zero). Per-slot visit counts are rounded
    /// independently; the total may drift from the onlooker budget by up to
    /// one visit per slot, which is accepted rather than corrected.
    pub fn onlooker_phase(&mut self, evaluator: &mut dyn BatchEvaluator) -> Result<(), EngineError> {
        let min = self
            .solutions
            .iter()
            .map(Solution::score)
            .fold(0.0, f64::min);
        let sum: f64 = self.solutions.iter().map(|s| s.score() - min).sum();

        let mut candidates = Vec::with_capacity(self.n_onlookers + self.solutions.len());
        let mut origins = Vec::with_capacity(candidates.capacity());
        for index in 0..self.solutions.len() {
            let visits = if sum > 0.0 {
                let probability = (self.solutions[index].score() - min) / sum;
                (probability * self.n_onlookers as f64).round() as usize
            } else {
                0
            };

            for _ in 0..visits {
                candidates.push(self.perturb_solution(index));
                origins.push(index);
            }
        }

        evaluator.evaluate(&mut candidates)?;

        for (candidate, index) in candidates.into_iter().zip(origins) {
            self.try_replace_solution(candidate, index);
        }
        Ok(())
    }

    /// Scout phase: every slot whose staleness exceeded the idle limit is
    /// replaced by a fresh random solution. Replacements are batch-priced
    /// before installation and never touch the best directly.
    pub fn scout_phase(&mut self, evaluator: &mut dyn BatchEvaluator) -> Result<(), EngineError> {
        let indexes: Vec<usize> = (0..self.solutions.len())
            .filter(|&i| self.solutions[i].idle_iterations() > self.idle_limit)
            .collect();
        if indexes.is_empty() {
            return Ok(());
        }

        debug!(cycle = self.cycle, scouts = indexes.len(), "replacing stale slots");
        let mut replacements: Vec<Solution> = indexes
            .iter()
            .map(|_| Solution::random(self.hp_size, &mut self.rng))
            .collect();

        evaluator.evaluate(&mut replacements)?;

        for (replacement, index) in replacements.into_iter().zip(indexes) {
            self.force_replace_solution(replacement, index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::sequence::HpSequence;
    use crate::engine::evaluator::LocalEvaluator;
    use crate::fitness::energy::{EnergyWeights, FitnessKernel, ScorerBackend};
    use rand::SeedableRng;

    fn setup(colony_size: usize, idle_limit: u32) -> (Hive, LocalEvaluator) {
        let seq = HpSequence::parse("HPPHHPHP").unwrap();
        let config = SearchConfig::builder()
            .colony_size(colony_size)
            .forager_ratio(0.5)
            .idle_limit(idle_limit)
            .n_cycles(10)
            .build()
            .unwrap();
        let kernel =
            FitnessKernel::new(seq.clone(), EnergyWeights::default(), ScorerBackend::Lattice)
                .unwrap();
        let hive = Hive::new(&config, seq.len(), StdRng::seed_from_u64(1234));
        (hive, LocalEvaluator::new(kernel))
    }

    #[test]
    fn best_fitness_is_monotone_across_cycles() {
        let (mut hive, mut evaluator) = setup(8, 3);
        let mut previous = hive.best().score();
        for _ in 0..20 {
            hive.run_cycle(&mut evaluator).unwrap();
            let current = hive.best().score();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn acceptance_strictly_improves_the_slot() {
        let (mut hive, mut evaluator) = setup(8, 100);
        hive.forager_phase(&mut evaluator).unwrap();

        let before: Vec<f64> = (0..hive.population_size())
            .map(|i| hive.solution(i).score())
            .collect();
        for _ in 0..10 {
            hive.forager_phase(&mut evaluator).unwrap();
        }
        for (i, &old) in before.iter().enumerate() {
            assert!(hive.solution(i).score() >= old);
        }
    }

    #[test]
    fn rejection_leaves_the_slot_chain_untouched_and_ages_it() {
        let (mut hive, mut evaluator) = setup(8, 100);
        // Prices the whole population once so rejections are meaningful.
        hive.forager_phase(&mut evaluator).unwrap();

        let chains_before: Vec<_> =
            (0..hive.population_size()).map(|i| hive.solution(i).chain().clone()).collect();
        let scores_before: Vec<f64> =
            (0..hive.population_size()).map(|i| hive.solution(i).score()).collect();
        let idle_before: Vec<u32> =
            (0..hive.population_size()).map(|i| hive.solution(i).idle_iterations()).collect();

        hive.forager_phase(&mut evaluator).unwrap();

        for i in 0..hive.population_size() {
            if hive.solution(i).idle_iterations() > idle_before[i] {
                // Rejected: same chain, same score.
                assert_eq!(*hive.solution(i).chain(), chains_before[i]);
                assert_eq!(hive.solution(i).score(), scores_before[i]);
            } else {
                // Accepted: strictly better.
                assert!(hive.solution(i).score() > scores_before[i]);
            }
        }
    }

    #[test]
    fn stale_slots_are_replaced_by_the_next_scout_phase() {
        let (mut hive, mut evaluator) = setup(8, 2);
        hive.forager_phase(&mut evaluator).unwrap();

        // Age slot 0 past the idle limit by hand.
        let mut stale = hive.solution(0).clone();
        for _ in 0..5 {
            stale.mark_idle();
        }
        let stale_chain = stale.chain().clone();
        hive.force_replace_solution(stale, 0);

        hive.scout_phase(&mut evaluator).unwrap();

        let replaced = hive.solution(0);
        assert_eq!(replaced.idle_iterations(), 0);
        assert!(replaced.fitness().is_some());
        assert_ne!(*replaced.chain(), stale_chain);
    }

    #[test]
    fn scout_replacements_do_not_touch_the_best() {
        let (mut hive, mut evaluator) = setup(8, 0);
        hive.forager_phase(&mut evaluator).unwrap();
        let best_before = hive.best().clone();

        // With idle_limit 0, any rejection schedules a scout replacement.
        for _ in 0..5 {
            hive.forager_phase(&mut evaluator).unwrap();
        }
        hive.scout_phase(&mut evaluator).unwrap();

        assert_eq!(hive.best().chain(), best_before.chain());
        assert!(hive.best().score() >= best_before.score());
    }

    #[test]
    fn onlooker_visit_total_stays_within_the_rounding_bound() {
        let (mut hive, mut evaluator) = setup(12, 100);
        hive.forager_phase(&mut evaluator).unwrap();

        // Reproduce the phase's own visit arithmetic and bound the drift.
        let min = (0..hive.population_size())
            .map(|i| hive.solution(i).score())
            .fold(0.0, f64::min);
        let sum: f64 = (0..hive.population_size())
            .map(|i| hive.solution(i).score() - min)
            .sum();
        let total_visits: i64 = (0..hive.population_size())
            .map(|i| {
                let probability = (hive.solution(i).score() - min) / sum;
                (probability * hive.n_onlookers as f64).round() as i64
            })
            .sum();

        let drift = (total_visits - hive.n_onlookers as i64).abs();
        assert!(drift <= hive.population_size() as i64);

        hive.onlooker_phase(&mut evaluator).unwrap();
    }

    #[test]
    fn onlooker_phase_handles_all_equal_negative_fitness() {
        let (mut hive, mut evaluator) = setup(8, 100);
        for i in 0..hive.population_size() {
            let mut sol = hive.solution(i).clone();
            sol.set_fitness(-5.0);
            hive.force_replace_solution(sol, i);
        }
        // Every weight is zero; the phase must not divide by the zero sum.
        hive.onlooker_phase(&mut evaluator).unwrap();
    }
}
