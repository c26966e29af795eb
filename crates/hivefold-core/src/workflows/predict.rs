use crate::comm::mesh::{Endpoint, RankMesh};
use crate::core::models::movement::MoveChain;
use crate::core::models::sequence::HpSequence;
use crate::engine::config::SearchConfig;
use crate::engine::error::EngineError;
use crate::engine::evaluator::{DistributedEvaluator, LocalEvaluator, worker_loop};
use crate::engine::hive::Hive;
use crate::engine::migration::MigrationRing;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::fitness::energy::FitnessKernel;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::thread;
use tracing::{info, instrument};

/// The outcome of a prediction run: the best movement chain found and its
/// reported measures.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub chain: MoveChain,
    pub fitness: f64,
    pub h_contacts: i32,
    pub collisions: i32,
    pub bb_gyration: f64,
}

fn rng_for(seed: Option<u64>, world_rank: u64) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(world_rank)),
        None => StdRng::from_entropy(),
    }
}

fn finalize(hive: &Hive, kernel: &mut FitnessKernel) -> Result<Prediction, EngineError> {
    let best = hive.best();
    let fitness = match best.fitness() {
        Some(fitness) => fitness,
        None => kernel.fitness(best.chain())?,
    };
    let report = kernel.report(best.chain())?;

    info!(
        fitness,
        h_contacts = report.h_contacts,
        collisions = report.collisions,
        "prediction finished"
    );
    Ok(Prediction {
        chain: best.chain().clone(),
        fitness,
        h_contacts: report.h_contacts,
        collisions: report.collisions,
        bb_gyration: report.backbone_gyration,
    })
}

/// Searches for the lowest-energy conformation of `sequence` on the calling
/// thread.
///
/// One hive runs `n_cycles` forager/onlooker/scout cycles with in-process
/// batch evaluation; scoring may still use the thread-parallel or deferred
/// backend, per the configuration. Fully deterministic for a fixed seed.
#[instrument(skip_all, name = "prediction_run")]
pub fn run(
    sequence: &HpSequence,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<Prediction, EngineError> {
    info!(sequence = %sequence, cycles = config.n_cycles, "starting sequential prediction");

    let kernel = FitnessKernel::new(sequence.clone(), config.weights, config.backend)?;
    let mut hive = Hive::new(config, sequence.len(), rng_for(config.seed, 0));
    let mut evaluator = LocalEvaluator::new(kernel);

    reporter.report(Progress::SearchStart {
        total_cycles: config.n_cycles as u64,
    });
    for cycle in 0..config.n_cycles {
        hive.run_cycle(&mut evaluator)?;
        reporter.report(Progress::CycleFinish {
            cycle: cycle as u64,
            best_fitness: hive.best().score(),
        });
    }
    reporter.report(Progress::SearchFinish);

    finalize(&hive, evaluator.kernel_mut())
}

/// Searches for the lowest-energy conformation of `sequence` across
/// `config.processes` ranks split into `config.islands` contiguous groups.
///
/// Each group's rank 0 coordinates one hive and participates in the
/// migration ring; the remaining ranks run the worker evaluation loop until
/// the terminate sentinel. The returned prediction is the global best
/// gathered at ring rank 0; every other rank's result stays internal.
#[instrument(skip_all, name = "prediction_run_distributed")]
pub fn run_distributed(
    sequence: &HpSequence,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<Prediction, EngineError> {
    config.validate_topology()?;
    let islands = config.islands;
    let per_island = config.processes / islands;
    info!(
        sequence = %sequence,
        islands,
        processes = config.processes,
        "starting distributed prediction"
    );

    let group_meshes: Vec<Vec<Endpoint>> =
        (0..islands).map(|_| RankMesh::build(per_island)).collect();
    let ring_endpoints = RankMesh::build(islands);

    thread::scope(|scope| {
        let mut masters = Vec::new();
        let mut workers = Vec::new();

        for ((island, group), ring_endpoint) in group_meshes
            .into_iter()
            .enumerate()
            .zip(ring_endpoints)
        {
            let coordinator_rank = (island * per_island) as u64;
            let mut members = group.into_iter();

            if let Some(endpoint) = members.next() {
                // Progress comes from one island only; the others run the
                // same cycles in lockstep.
                let reporter = (island == 0).then_some(reporter);
                masters.push(scope.spawn(move || {
                    island_master(
                        sequence,
                        config,
                        endpoint,
                        ring_endpoint,
                        coordinator_rank,
                        reporter,
                    )
                }));
            }

            for endpoint in members {
                workers.push(scope.spawn(move || {
                    let kernel =
                        FitnessKernel::new(sequence.clone(), config.weights, config.backend)?;
                    worker_loop(&endpoint, kernel)
                }));
            }
        }

        let mut prediction = None;
        let mut first_error = None;
        for handle in masters {
            match handle.join() {
                Ok(Ok(Some(result))) => prediction = Some(result),
                Ok(Ok(None)) => {}
                Ok(Err(error)) => {
                    first_error.get_or_insert(error);
                }
                Err(_) => {
                    first_error.get_or_insert(EngineError::Internal(
                        "an island coordinator thread panicked".into(),
                    ));
                }
            }
        }
        for handle in workers {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    first_error.get_or_insert(error);
                }
                Err(_) => {
                    first_error.get_or_insert(EngineError::Internal(
                        "a worker rank thread panicked".into(),
                    ));
                }
            }
        }

        if let Some(error) = first_error {
            return Err(error);
        }
        prediction.ok_or_else(|| {
            EngineError::Internal("the coordinating rank produced no prediction".into())
        })
    })
}

fn island_master(
    sequence: &HpSequence,
    config: &SearchConfig,
    group_endpoint: Endpoint,
    ring_endpoint: Endpoint,
    world_rank: u64,
    reporter: Option<&ProgressReporter>,
) -> Result<Option<Prediction>, EngineError> {
    let kernel = FitnessKernel::new(sequence.clone(), config.weights, config.backend)?;
    let mut hive = Hive::new(config, sequence.len(), rng_for(config.seed, world_rank));
    let mut evaluator = DistributedEvaluator::new(&group_endpoint, kernel);
    let ring = MigrationRing::new(&ring_endpoint, sequence.len());

    if let Some(reporter) = reporter {
        reporter.report(Progress::SearchStart {
            total_cycles: config.n_cycles as u64,
        });
    }

    for cycle in 0..config.n_cycles {
        hive.forager_phase(&mut evaluator)?;
        hive.onlooker_phase(&mut evaluator)?;
        hive.scout_phase(&mut evaluator)?;

        if MigrationRing::should_exchange(cycle, config.n_cycles) {
            ring.exchange(&mut hive)?;
        }
        hive.increment_cycle();

        if let Some(reporter) = reporter {
            reporter.report(Progress::CycleFinish {
                cycle: cycle as u64,
                best_fitness: hive.best().score(),
            });
        }
    }

    ring.gather_best(&mut hive)?;

    let mut kernel = evaluator.shutdown()?;
    let result = if ring_endpoint.rank() == 0 {
        Some(finalize(&hive, &mut kernel)?)
    } else {
        None
    };

    if let Some(reporter) = reporter {
        reporter.report(Progress::SearchFinish);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness::energy::ScorerBackend;
    use std::sync::Mutex;

    fn small_config(seed: u64) -> SearchConfig {
        SearchConfig::builder()
            .colony_size(4)
            .forager_ratio(0.5)
            .n_cycles(5)
            .idle_limit(2)
            .seed(Some(seed))
            .build()
            .unwrap()
    }

    #[test]
    fn hpph_prediction_terminates_with_a_sane_result() {
        let sequence = HpSequence::parse("HPPH").unwrap();
        let config = small_config(77);

        let prediction = run(&sequence, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(prediction.chain.len(), 3);
        assert!(prediction.fitness.is_finite());
        assert!(prediction.collisions >= 0);
        assert!(prediction.h_contacts >= 0);
    }

    #[test]
    fn fixed_seed_runs_are_bit_identical() {
        let sequence = HpSequence::parse("HPPHHP").unwrap();
        let config = small_config(2024);

        let first = run(&sequence, &config, &ProgressReporter::new()).unwrap();
        let second = run(&sequence, &config, &ProgressReporter::new()).unwrap();

        assert_eq!(first.chain, second.chain);
        assert_eq!(first.fitness.to_bits(), second.fitness.to_bits());
    }

    #[test]
    fn reporter_sees_every_cycle() {
        let sequence = HpSequence::parse("HPPH").unwrap();
        let config = small_config(5);

        let cycles = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::CycleFinish { cycle, .. } = event {
                cycles.lock().unwrap().push(cycle);
            }
        }));
        run(&sequence, &config, &reporter).unwrap();

        assert_eq!(*cycles.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn threaded_backend_runs_end_to_end() {
        let sequence = HpSequence::parse("HPPH").unwrap();
        let config = SearchConfig::builder()
            .colony_size(4)
            .forager_ratio(0.5)
            .n_cycles(3)
            .idle_limit(2)
            .seed(Some(9))
            .backend(ScorerBackend::Threaded)
            .build()
            .unwrap();
        let prediction = run(&sequence, &config, &ProgressReporter::new()).unwrap();
        assert!(prediction.fitness.is_finite());
    }

    #[test]
    fn distributed_two_islands_terminate_and_agree_on_chain_shape() {
        let sequence = HpSequence::parse("HPPHHP").unwrap();
        let config = SearchConfig::builder()
            .colony_size(4)
            .forager_ratio(0.5)
            .n_cycles(4)
            .idle_limit(2)
            .islands(2)
            .processes(4)
            .seed(Some(31))
            .build()
            .unwrap();

        let prediction = run_distributed(&sequence, &config, &ProgressReporter::new()).unwrap();
        assert_eq!(prediction.chain.len(), sequence.chain_len());
        assert!(prediction.fitness.is_finite());
    }

    #[test]
    fn distributed_single_process_matches_the_sequential_engine() {
        let sequence = HpSequence::parse("HPPH").unwrap();
        let config = small_config(123);

        let sequential = run(&sequence, &config, &ProgressReporter::new()).unwrap();
        let distributed =
            run_distributed(&sequence, &config, &ProgressReporter::new()).unwrap();

        // One island on one rank consumes randomness in the same order as
        // the sequential engine, so the runs coincide exactly.
        assert_eq!(sequential.chain, distributed.chain);
        assert_eq!(sequential.fitness.to_bits(), distributed.fitness.to_bits());
    }
}
