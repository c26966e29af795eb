use super::error::FitnessError;
use super::measures::{BeadMeasures, MeasureBackend, finalize, partition};
use crate::core::models::point::{LatticePoint, is_unit_step};
use crate::core::models::sequence::HpSequence;

/// The O(n²) brute-force backend.
///
/// Enumerates every unordered bead pair directly. Far too slow for search,
/// but the counts are trivially correct, which makes it the oracle the
/// spatial-hash backends are validated against.
pub struct ReferenceMeasures {
    sequence: HpSequence,
}

impl ReferenceMeasures {
    pub fn new(sequence: HpSequence) -> Self {
        Self { sequence }
    }
}

fn count_collisions(beads: &[LatticePoint]) -> i32 {
    let mut collisions = 0;
    for i in 0..beads.len() {
        for j in (i + 1)..beads.len() {
            if beads[i] == beads[j] {
                collisions += 1;
            }
        }
    }
    collisions
}

fn count_contacts(beads: &[LatticePoint]) -> i32 {
    let mut contacts = 0;
    for i in 0..beads.len() {
        for j in (i + 1)..beads.len() {
            if is_unit_step(&beads[i], &beads[j]) {
                contacts += 1;
            }
        }
    }
    contacts
}

impl MeasureBackend for ReferenceMeasures {
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
        Ok(finalize(
            count_contacts(&classes.h_side),
            count_contacts(&classes.p_side),
            count_contacts(&classes.all_side),
            count_contacts(&classes.backbone),
            count_contacts(&classes.h_backbone),
            count_contacts(&classes.p_backbone),
            count_collisions(&classes.all),
            &self.sequence,
        ))
    }
}
