use super::error::EngineError;
use super::solution::Solution;
use crate::comm::mesh::Endpoint;
use crate::core::models::movement::MoveChain;
use crate::fitness::energy::FitnessKernel;
use tracing::{debug, trace};

/// Chunk filler for round slots past the end of the candidate batch: the
/// receiving rank reports fitness 0 without scoring.
pub(crate) const NOOP_BYTE: u8 = 0xFE;

/// Chunk filler that tells every worker to leave its evaluation loop.
pub(crate) const TERMINATE_BYTE: u8 = 0xFF;

/// Prices a batch of candidate solutions, setting each one's cached fitness.
///
/// The hive depends only on this trait; whether the batch is scored in
/// process or fanned across a rank group is the caller's wiring decision.
pub trait BatchEvaluator {
    fn evaluate(&mut self, candidates: &mut [Solution]) -> Result<(), EngineError>;
}

/// Scores every candidate on the calling thread.
pub struct LocalEvaluator {
    kernel: FitnessKernel,
}

impl LocalEvaluator {
    pub fn new(kernel: FitnessKernel) -> Self {
        Self { kernel }
    }

    pub fn kernel_mut(&mut self) -> &mut FitnessKernel {
        &mut self.kernel
    }

    pub fn into_kernel(self) -> FitnessKernel {
        self.kernel
    }
}

impl BatchEvaluator for LocalEvaluator {
    fn evaluate(&mut self, candidates: &mut [Solution]) -> Result<(), EngineError> {
        for candidate in candidates {
            let fitness = self.kernel.fitness(candidate.chain())?;
            candidate.set_fitness(fitness);
        }
        Ok(())
    }
}

/// The coordinating rank's side of distributed batch pricing.
///
/// Candidates are processed in rounds of `comm_size`: slot `r` of a round
/// buffer carries candidate `i + r`'s encoded chain (or the no-op sentinel
/// past the end), the buffer is tree-scattered, every rank — the coordinator
/// included — scores its chunk, and the per-rank fitnesses are tree-gathered
/// back. The assignment of candidates to ranks is deterministic, so result
/// ordering is reproducible for a fixed group size.
pub struct DistributedEvaluator<'a> {
    endpoint: &'a Endpoint,
    kernel: FitnessKernel,
}

impl<'a> DistributedEvaluator<'a> {
    pub fn new(endpoint: &'a Endpoint, kernel: FitnessKernel) -> Self {
        Self { endpoint, kernel }
    }

    pub fn kernel_mut(&mut self) -> &mut FitnessKernel {
        &mut self.kernel
    }

    /// Broadcasts the terminate sentinel through the scatter channel and
    /// releases the coordinator's scoring resources.
    ///
    /// Every worker in the group recognizes the sentinel, leaves its loop and
    /// drops its own scratch state.
    pub fn shutdown(self) -> Result<FitnessKernel, EngineError> {
        let chunk = self.kernel.chain_len();
        let mut buf = vec![TERMINATE_BYTE; self.endpoint.size() * chunk];
        debug!(rank = self.endpoint.rank(), "signaling workers to terminate");
        self.endpoint.scatter(&mut buf, chunk)?;
        Ok(self.kernel)
    }
}

impl BatchEvaluator for DistributedEvaluator<'_> {
    fn evaluate(&mut self, candidates: &mut [Solution]) -> Result<(), EngineError> {
        let size = self.endpoint.size();
        let chunk = self.kernel.chain_len();
        let mut chain_buf = vec![0u8; size * chunk];
        let mut fitness_buf = vec![0f64; size];

        let mut start = 0;
        while start < candidates.len() {
            for r in 0..size {
                let slot = &mut chain_buf[r * chunk..(r + 1) * chunk];
                match candidates.get(start + r) {
                    Some(candidate) => candidate.chain().encode(slot),
                    None => slot.fill(NOOP_BYTE),
                }
            }

            self.endpoint.scatter(&mut chain_buf, chunk)?;

            // The coordinator's own chunk is the round's first candidate,
            // which always exists.
            let own = MoveChain::decode(&chain_buf[..chunk])?;
            fitness_buf[0] = self.kernel.fitness(&own)?;

            self.endpoint.gather(&mut fitness_buf, 1)?;

            for r in 0..size {
                if let Some(candidate) = candidates.get_mut(start + r) {
                    candidate.set_fitness(fitness_buf[r]);
                }
            }
            start += size;
        }
        Ok(())
    }
}

/// Body of a non-coordinating rank: waits for chain chunks, scores them, and
/// reports fitness back, until the terminate sentinel arrives.
///
/// A no-op chunk is answered with fitness 0 without scoring. The scratch
/// state inside `kernel` is released when the loop returns.
pub fn worker_loop(endpoint: &Endpoint, mut kernel: FitnessKernel) -> Result<(), EngineError> {
    let size = endpoint.size();
    let chunk = kernel.chain_len();
    let mut chain_buf = vec![0u8; size * chunk];
    let mut fitness_buf = vec![0f64; size];

    loop {
        endpoint.scatter(&mut chain_buf, chunk)?;

        match chain_buf[0] {
            TERMINATE_BYTE => {
                trace!(rank = endpoint.rank(), "worker received terminate sentinel");
                return Ok(());
            }
            NOOP_BYTE => fitness_buf[0] = 0.0,
            _ => {
                let chain = MoveChain::decode(&chain_buf[..chunk])?;
                fitness_buf[0] = kernel.fitness(&chain)?;
            }
        }

        endpoint.gather(&mut fitness_buf, 1)?;
    }
}
