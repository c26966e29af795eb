//! Deterministic reconstruction of 3D lattice coordinates from a movement
//! chain.
//!
//! Each chain position contributes one backbone bead and one side-chain bead.
//! By convention the first two backbone beads sit at `(1,0,0)` and `(2,0,0)`.
//! The first chain element is special: its backbone turn places the side-chain
//! bead of position 0 (against the predecessor `(-1,0,0)`) and its side-chain
//! turn places the side-chain bead of position 1 (against `(1,0,0)`). Every
//! later element supplies the turn for the next backbone bead and the turn for
//! its side-chain bead.

use super::models::movement::{MoveChain, Turn};
use super::models::point::{LatticePoint, LatticeVector};

/// Applies `turn` to the predecessor displacement and returns the resulting
/// displacement.
///
/// `Straight` keeps the predecessor. The other turns fill one of the two axes
/// orthogonal to the predecessor's nonzero axis: `Up`/`Down` set the first
/// free axis to ±1, `Right`/`Left` set the second free axis to ±1.
fn turn_displacement(pred: LatticeVector, turn: Turn) -> LatticeVector {
    if turn == Turn::Straight {
        return pred;
    }

    let (first, second) = if pred.x != 0 {
        (1, 2)
    } else if pred.y != 0 {
        (0, 2)
    } else {
        (0, 1)
    };

    let mut result = LatticeVector::zeros();
    match turn {
        Turn::Up => result[first] = 1,
        Turn::Down => result[first] = -1,
        Turn::Right => result[second] = 1,
        Turn::Left => result[second] = -1,
        Turn::Straight => unreachable!(),
    }
    result
}

/// Takes a movement chain and returns the positions of the backbone and
/// side-chain beads over 3D space.
///
/// Pure and deterministic; a chain of `n` elements yields `n + 1` beads of
/// each kind.
pub fn build_coordinates(chain: &MoveChain) -> (Vec<LatticePoint>, Vec<LatticePoint>) {
    let chain_len = chain.len();
    let mut backbone = Vec::with_capacity(chain_len + 1);
    let mut sidechain = Vec::with_capacity(chain_len + 1);

    backbone.push(LatticePoint::new(1, 0, 0));
    backbone.push(LatticePoint::new(2, 0, 0));

    // The first element stores directions for the first two side-chain beads.
    let head = chain.pairs()[0];
    sidechain.push(backbone[0] + turn_displacement(LatticeVector::new(-1, 0, 0), head.backbone));
    let mut pred = LatticeVector::new(1, 0, 0);
    sidechain.push(backbone[1] + turn_displacement(pred, head.side_chain));

    for i in 2..=chain_len {
        let pair = chain.pairs()[i - 1];

        let step = turn_displacement(pred, pair.backbone);
        backbone.push(backbone[i - 1] + step);
        pred = step;

        sidechain.push(backbone[i] + turn_displacement(pred, pair.side_chain));
    }

    (backbone, sidechain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::movement::MovePair;

    fn chain(pairs: &[(Turn, Turn)]) -> MoveChain {
        MoveChain::new(pairs.iter().map(|&(bb, sc)| MovePair::new(bb, sc)).collect())
    }

    #[test]
    fn straight_backbone_stays_collinear() {
        let chain = chain(&[
            (Turn::Straight, Turn::Up),
            (Turn::Straight, Turn::Up),
            (Turn::Straight, Turn::Up),
        ]);
        let (backbone, sidechain) = build_coordinates(&chain);

        assert_eq!(backbone.len(), 4);
        assert_eq!(sidechain.len(), 4);
        for (i, bead) in backbone.iter().enumerate() {
            assert_eq!(*bead, LatticePoint::new(1 + i as i32, 0, 0));
        }
    }

    #[test]
    fn first_element_places_both_head_sidechains() {
        // Backbone turn Up against predecessor (-1,0,0) lifts SC0 off bead 0;
        // side-chain turn Right against (1,0,0) pushes SC1 along +z.
        let chain = chain(&[(Turn::Up, Turn::Right)]);
        let (backbone, sidechain) = build_coordinates(&chain);

        assert_eq!(backbone, vec![LatticePoint::new(1, 0, 0), LatticePoint::new(2, 0, 0)]);
        assert_eq!(sidechain[0], LatticePoint::new(1, 1, 0));
        assert_eq!(sidechain[1], LatticePoint::new(2, 0, 1));
    }

    #[test]
    fn turns_are_applied_against_the_running_predecessor() {
        let chain = chain(&[
            (Turn::Straight, Turn::Straight),
            (Turn::Up, Turn::Straight),
            (Turn::Straight, Turn::Straight),
        ]);
        let (backbone, _) = build_coordinates(&chain);

        // Bead 2 turns up off the x axis; bead 3 continues along the new axis.
        assert_eq!(backbone[2], LatticePoint::new(2, 1, 0));
        assert_eq!(backbone[3], LatticePoint::new(2, 2, 0));
    }

    #[test]
    fn sidechain_beads_sit_one_step_off_their_backbone() {
        use crate::core::models::point::is_unit_step;
        use rand::SeedableRng;
        use rand::rngs::StdRng;

        let mut rng = StdRng::seed_from_u64(3);
        let chain = MoveChain::random(12, &mut rng);
        let (backbone, sidechain) = build_coordinates(&chain);

        for i in 0..backbone.len() {
            // A Straight side-chain turn repeats the backbone displacement, so
            // the side-chain bead always sits exactly one step off its bead.
            assert!(is_unit_step(&backbone[i], &sidechain[i]));
        }
    }
}
