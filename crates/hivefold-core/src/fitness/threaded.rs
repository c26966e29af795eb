use super::error::FitnessError;
use super::grid::SpatialGrid;
use super::measures::{BeadMeasures, CountKind, MeasureBackend, finalize, partition};
use crate::core::models::point::LatticePoint;
use crate::core::models::sequence::HpSequence;
use rayon::prelude::*;

/// Number of independent sub-counts per conformation: the six contact classes
/// plus the collision count.
const SUB_COUNTS: usize = 7;

/// The thread-parallel backend.
///
/// Fans the seven independent sub-counts out across the rayon pool. Each job
/// owns a private scratch grid, so the workers share no mutable state and
/// join only to combine the seven integers.
pub struct ThreadedMeasures {
    sequence: HpSequence,
    grids: Vec<SpatialGrid>,
}

impl ThreadedMeasures {
    pub fn new(sequence: HpSequence) -> Result<Self, FitnessError> {
        let grids = (0..SUB_COUNTS)
            .map(|_| SpatialGrid::new(sequence.len()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sequence, grids })
    }
}

impl MeasureBackend for ThreadedMeasures {
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

        let classes = partition(backbone, sidechain, &self.sequence);
        let jobs: [(&[LatticePoint], CountKind); SUB_COUNTS] = [
            (&classes.h_side, CountKind::Contacts),
            (&classes.p_side, CountKind::Contacts),
            (&classes.all_side, CountKind::Contacts),
            (&classes.backbone, CountKind::Contacts),
            (&classes.h_backbone, CountKind::Contacts),
            (&classes.p_backbone, CountKind::Contacts),
            (&classes.all, CountKind::Collisions),
        ];

        let counts: Vec<i32> = self
            .grids
            .par_iter_mut()
            .zip(jobs.par_iter())
            .map(|(grid, &(beads, kind))| match kind {
                CountKind::Contacts => grid.count_contacts(beads),
                CountKind::Collisions => grid.count_collisions(beads),
            })
            .collect();

        Ok(finalize(
            counts[0],
            counts[1],
            counts[2],
            counts[3],
            counts[4],
            counts[5],
            counts[6],
            &self.sequence,
        ))
    }
}
