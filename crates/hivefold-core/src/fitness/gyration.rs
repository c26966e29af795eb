//! Gyration radii of bead sets: achieved, joint per bead type, and the
//! maximum attainable by the fully extended backbone.

use crate::core::models::point::LatticePoint;
use crate::core::models::sequence::{BeadType, HpSequence};
use nalgebra::Point3;

fn dsquare(a: f64) -> f64 {
    a * a
}

/// Barycenter of a bead set. Returns `None` for an empty set.
pub fn centroid(coords: &[LatticePoint]) -> Option<Point3<f64>> {
    if coords.is_empty() {
        return None;
    }
    let mut sum = Point3::new(0.0, 0.0, 0.0);
    for c in coords {
        sum.x += c.x as f64;
        sum.y += c.y as f64;
        sum.z += c.z as f64;
    }
    let n = coords.len() as f64;
    Some(Point3::new(sum.x / n, sum.y / n, sum.z / n))
}

/// Root-mean-square distance of the beads from `center`.
pub fn gyration_radius(coords: &[LatticePoint], center: &Point3<f64>) -> f64 {
    let mut gyr = 0.0;
    for c in coords {
        gyr += dsquare(c.x as f64 - center.x);
        gyr += dsquare(c.y as f64 - center.y);
        gyr += dsquare(c.z as f64 - center.z);
    }
    (gyr / coords.len() as f64).sqrt()
}

/// Gyration radii of the H and P side-chain beads around their own
/// barycenters, in one pass over the side-chain coordinates.
///
/// The P radius is defined as exactly 1 when the sequence has no P beads.
pub fn joint_gyration(
    sidechain: &[LatticePoint],
    sequence: &HpSequence,
    center_h: &Point3<f64>,
    center_p: Option<&Point3<f64>>,
) -> (f64, f64) {
    let mut sum_h = 0.0;
    let mut sum_p = 0.0;
    let mut count_h = 0usize;
    let mut count_p = 0usize;

    for (i, c) in sidechain.iter().enumerate() {
        match sequence.bead(i) {
            BeadType::Hydrophobic => {
                sum_h += dsquare(c.x as f64 - center_h.x);
                sum_h += dsquare(c.y as f64 - center_h.y);
                sum_h += dsquare(c.z as f64 - center_h.z);
                count_h += 1;
            }
            BeadType::Polar => {
                if let Some(center) = center_p {
                    sum_p += dsquare(c.x as f64 - center.x);
                    sum_p += dsquare(c.y as f64 - center.y);
                    sum_p += dsquare(c.z as f64 - center.z);
                }
                count_p += 1;
            }
        }
    }

    let gyr_h = (sum_h / count_h as f64).sqrt();
    let gyr_p = if count_p == 0 {
        1.0
    } else {
        (sum_p / count_p as f64).sqrt()
    };
    (gyr_h, gyr_p)
}

/// Gyration radius of the hydrophobic beads with the protein completely
/// unfolded, precomputed once per sequence.
///
/// With an extended backbone, bead `i` sits at axis coordinate `i`; the +1 on
/// every deviation accounts for the side-chain bend off the axis.
pub fn max_hydrophobic_gyration(sequence: &HpSequence) -> f64 {
    let mut coord_sum = 0usize;
    let mut count_h = 0usize;
    for (i, &bead) in sequence.beads().iter().enumerate() {
        if bead == BeadType::Hydrophobic {
            coord_sum += i;
            count_h += 1;
        }
    }
    let center = coord_sum as f64 / count_h as f64;

    let mut max_gyr = 0.0;
    for (i, &bead) in sequence.beads().iter().enumerate() {
        if bead == BeadType::Hydrophobic {
            max_gyr += dsquare((i as f64 - center).abs() + 1.0);
        }
    }
    (max_gyr / count_h as f64).sqrt()
}
