use super::error::FitnessError;
use super::grid::SpatialGrid;
use crate::core::models::point::LatticePoint;
use crate::core::models::sequence::{BeadType, HpSequence};

/// Raw integer bead measures for one conformation.
///
/// Contact sub-counts exclude trivially-adjacent pairs (consecutive backbone
/// beads, and each bead with its own side-chain bead). On conformations with
/// collisions the inclusion–exclusion arithmetic can drive a sub-count below
/// zero; callers damp with [`crate::fitness::energy::damp`], which clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BeadMeasures {
    pub hh: i32,
    pub pp: i32,
    pub hp: i32,
    pub bb: i32,
    pub hb: i32,
    pub pb: i32,
    pub collisions: i32,
}

/// Which of the two pair counts a backend job computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CountKind {
    Contacts,
    Collisions,
}

/// The bead-class coordinate vectors every backend counts over.
///
/// `h_side`/`p_side`/`all_side` partition the side-chain beads by type;
/// `h_backbone`/`p_backbone` are the backbone beads joined with one side-chain
/// class, so the mixed sub-counts can be recovered by inclusion–exclusion.
pub(crate) struct BeadClasses {
    pub all: Vec<LatticePoint>,
    pub backbone: Vec<LatticePoint>,
    pub h_backbone: Vec<LatticePoint>,
    pub p_backbone: Vec<LatticePoint>,
    pub h_side: Vec<LatticePoint>,
    pub p_side: Vec<LatticePoint>,
    pub all_side: Vec<LatticePoint>,
}

pub(crate) fn partition(
    backbone: &[LatticePoint],
    sidechain: &[LatticePoint],
    sequence: &HpSequence,
) -> BeadClasses {
    let hp_size = sequence.len();
    let mut classes = BeadClasses {
        all: Vec::with_capacity(hp_size * 2),
        backbone: Vec::with_capacity(hp_size),
        h_backbone: Vec::with_capacity(hp_size * 2),
        p_backbone: Vec::with_capacity(hp_size * 2),
        h_side: Vec::with_capacity(hp_size),
        p_side: Vec::with_capacity(hp_size),
        all_side: Vec::with_capacity(hp_size),
    };

    for bead in backbone {
        classes.all.push(*bead);
        classes.backbone.push(*bead);
        classes.h_backbone.push(*bead);
        classes.p_backbone.push(*bead);
    }

    for (i, bead) in sidechain.iter().enumerate() {
        classes.all.push(*bead);
        classes.all_side.push(*bead);
        match sequence.bead(i) {
            BeadType::Hydrophobic => {
                classes.h_side.push(*bead);
                classes.h_backbone.push(*bead);
            }
            BeadType::Polar => {
                classes.p_side.push(*bead);
                classes.p_backbone.push(*bead);
            }
        }
    }

    classes
}

/// Folds seven raw class counts into the final sub-counts.
///
/// Mixed classes come out by inclusion–exclusion (H–P = all-side − H–H − P–P,
/// and likewise for the backbone unions), then the trivially-adjacent pairs
/// are subtracted: `hp_size - 1` backbone–backbone pairs, one H–backbone pair
/// per H bead, one P–backbone pair per P bead.
pub(crate) fn finalize(
    hh: i32,
    pp: i32,
    all_side: i32,
    bb: i32,
    h_union: i32,
    p_union: i32,
    collisions: i32,
    sequence: &HpSequence,
) -> BeadMeasures {
    let hp = all_side - hh - pp;
    let hb = h_union - hh - bb;
    let pb = p_union - pp - bb;

    BeadMeasures {
        hh,
        pp,
        hp,
        bb: bb - (sequence.len() as i32 - 1),
        hb: hb - sequence.hydrophobic_count() as i32,
        pb: pb - sequence.polar_count() as i32,
        collisions,
    }
}

/// A source of raw bead measures for conformations of one fixed protein.
///
/// Implementations own whatever scratch state they need; the engine selects
/// one at configuration time and depends only on this trait.
pub trait MeasureBackend: Send {
    fn measures(
        &mut self,
        backbone: &[LatticePoint],
        sidechain: &[LatticePoint],
    ) -> Result<BeadMeasures, FitnessError>;
}

/// The O(n) spatial-hash backend: one scratch grid, seven sequential counting
/// passes.
pub struct LatticeMeasures {
    sequence: HpSequence,
    grid: SpatialGrid,
}

impl LatticeMeasures {
    pub fn new(sequence: HpSequence) -> Result<Self, FitnessError> {
        let grid = SpatialGrid::new(sequence.len())?;
        Ok(Self { sequence, grid })
    }
}

impl MeasureBackend for LatticeMeasures {
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
        let hh = self.grid.count_contacts(&classes.h_side);
        let pp = self.grid.count_contacts(&classes.p_side);
        let all_side = self.grid.count_contacts(&classes.all_side);
        let bb = self.grid.count_contacts(&classes.backbone);
        let h_union = self.grid.count_contacts(&classes.h_backbone);
        let p_union = self.grid.count_contacts(&classes.p_backbone);
        let collisions = self.grid.count_collisions(&classes.all);

        Ok(finalize(
            hh,
            pp,
            all_side,
            bb,
            h_union,
            p_union,
            collisions,
            &self.sequence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::build_coordinates;
    use crate::core::models::movement::MoveChain;

    #[test]
    fn partition_splits_sidechains_by_type() {
        let seq = HpSequence::parse("HPH").unwrap();
        let backbone = vec![
            LatticePoint::new(1, 0, 0),
            LatticePoint::new(2, 0, 0),
            LatticePoint::new(3, 0, 0),
        ];
        let sidechain = vec![
            LatticePoint::new(1, 1, 0),
            LatticePoint::new(2, 1, 0),
            LatticePoint::new(3, 1, 0),
        ];

        let classes = partition(&backbone, &sidechain, &seq);
        assert_eq!(classes.all.len(), 6);
        assert_eq!(classes.backbone.len(), 3);
        assert_eq!(classes.h_side.len(), 2);
        assert_eq!(classes.p_side.len(), 1);
        assert_eq!(classes.h_backbone.len(), 5);
        assert_eq!(classes.p_backbone.len(), 4);
    }

    #[test]
    fn ladder_conformation_counts_only_sidechain_line_contacts() {
        // Straight backbone with every side chain turned up: two parallel
        // lines, backbone at y=0 (x = 1..=4) and side chains at y=1. All
        // backbone and bead-to-own-side-chain contacts are trivial pairs; the
        // side-chain line contributes its three adjacent pairs.
        let seq = HpSequence::parse("HHPP").unwrap();
        let up_up = 18u8; // (Up, Up)
        let straight_up = 3u8; // (Straight, Up)
        let chain = MoveChain::decode(&[up_up, straight_up, straight_up]).unwrap();
        let (backbone, sidechain) = build_coordinates(&chain);

        let mut backend = LatticeMeasures::new(seq).unwrap();
        let m = backend.measures(&backbone, &sidechain).unwrap();

        assert_eq!(m.collisions, 0);
        assert_eq!(m.bb, 0);
        assert_eq!(m.hb, 0);
        assert_eq!(m.pb, 0);
        assert_eq!(m.hh, 1);
        assert_eq!(m.pp, 1);
        assert_eq!(m.hp, 1);
    }
}
