use super::error::FitnessError;
use super::grid::SpatialGrid;
use super::measures::{BeadMeasures, CountKind, MeasureBackend, finalize, partition};
use crate::core::models::point::LatticePoint;
use crate::core::models::sequence::HpSequence;
use crossbeam_channel::{Receiver, bounded};

/// A pending sub-count: the one-shot handle returned by [`launch`] and
/// consumed exactly once by [`fetch`].
///
/// Dropping a handle without fetching abandons the result; the worker side
/// never blocks on it.
#[derive(Debug)]
pub struct CountHandle {
    result: Receiver<i32>,
}

/// Starts one pair count without blocking and returns its handle.
///
/// The scratch grid is allocated (and checked against the memory ceiling) on
/// the calling thread before the job is handed to the pool, so resource
/// failures surface here rather than inside the pool.
pub(crate) fn launch(
    beads: Vec<LatticePoint>,
    kind: CountKind,
    hp_size: usize,
) -> Result<CountHandle, FitnessError> {
    let mut grid = SpatialGrid::new(hp_size)?;
    let (tx, rx) = bounded(1);

    rayon::spawn(move || {
        let count = match kind {
            CountKind::Contacts => grid.count_contacts(&beads),
            CountKind::Collisions => grid.count_collisions(&beads),
        };
        // The handle may have been dropped; nothing to do then.
        let _ = tx.send(count);
    });

    Ok(CountHandle { result: rx })
}

/// Blocks until the count behind `handle` is ready and returns it.
pub(crate) fn fetch(handle: CountHandle) -> Result<i32, FitnessError> {
    handle
        .result
        .recv()
        .map_err(|e| FitnessError::BackendUnavailable(e.to_string()))
}

/// The deferred backend: the launch/fetch contract of an asynchronous
/// accelerator, backed here by the thread pool.
///
/// All seven sub-counts are launched before any is fetched, so they overlap
/// in flight exactly as the accelerated backend requires.
pub struct DeferredMeasures {
    sequence: HpSequence,
}

impl DeferredMeasures {
    pub fn new(sequence: HpSequence) -> Self {
        Self { sequence }
    }
}

impl MeasureBackend for DeferredMeasures {
    fn measures(
        &mut self,
        backbone: &[LatticePoint],
        sidechain: &[LatticePoint],
    ) -> Result<BeadMeasures, FitnessError> {
        if backbone.len() != sidechain.len() {
            return Err(FitnessError::CoordinateMismatch {
                backbone: backbone.len(),
                sidechain: sidechain.len(),
            });
        }

        let hp_size = self.sequence.len();
        let classes = partition(backbone, sidechain, &self.sequence);

        let handles = [
            launch(classes.h_side, CountKind::Contacts, hp_size)?,
            launch(classes.p_side, CountKind::Contacts, hp_size)?,
            launch(classes.all_side, CountKind::Contacts, hp_size)?,
            launch(classes.backbone, CountKind::Contacts, hp_size)?,
            launch(classes.h_backbone, CountKind::Contacts, hp_size)?,
            launch(classes.p_backbone, CountKind::Contacts, hp_size)?,
            launch(classes.all, CountKind::Collisions, hp_size)?,
        ];

        let [hh, pp, all_side, bb, h_union, p_union, collisions] = handles;
        Ok(finalize(
            fetch(hh)?,
            fetch(pp)?,
            fetch(all_side)?,
            fetch(bb)?,
            fetch(h_union)?,
            fetch(p_union)?,
            fetch(collisions)?,
            &self.sequence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::build_coordinates;
    use crate::core::models::movement::MoveChain;
    use crate::fitness::measures::LatticeMeasures;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fetch_returns_the_launched_count() {
        let beads = vec![
            LatticePoint::new(1, 0, 0),
            LatticePoint::new(1, 0, 0),
            LatticePoint::new(2, 0, 0),
        ];
        let handle = launch(beads, CountKind::Collisions, 4).unwrap();
        assert_eq!(fetch(handle).unwrap(), 1);
    }

    #[test]
    fn deferred_backend_matches_the_lattice_backend() {
        let seq = HpSequence::parse("HHPPHPHH").unwrap();
        let mut deferred = DeferredMeasures::new(seq.clone());
        let mut lattice = LatticeMeasures::new(seq.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..20 {
            let chain = MoveChain::random(seq.chain_len(), &mut rng);
            let (backbone, sidechain) = build_coordinates(&chain);
            assert_eq!(
                deferred.measures(&backbone, &sidechain).unwrap(),
                lattice.measures(&backbone, &sidechain).unwrap()
            );
        }
    }
}
