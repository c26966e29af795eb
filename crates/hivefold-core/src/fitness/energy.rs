use super::deferred::DeferredMeasures;
use super::error::FitnessError;
use super::gyration::{centroid, gyration_radius, joint_gyration, max_hydrophobic_gyration};
use super::measures::{LatticeMeasures, MeasureBackend};
use super::threaded::ThreadedMeasures;
use crate::core::geometry::build_coordinates;
use crate::core::models::movement::MoveChain;
use crate::core::models::point::LatticePoint;
use crate::core::models::sequence::{BeadType, HpSequence};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Pairwise interaction energies and the collision penalty.
///
/// One weight per contact class; raw counts are square-root damped before
/// weighting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyWeights {
    pub hh: f64,
    pub hp: f64,
    pub hb: f64,
    pub pp: f64,
    pub pb: f64,
    pub bb: f64,
    pub collision_penalty: f64,
}

impl Default for EnergyWeights {
    fn default() -> Self {
        Self {
            hh: 10.0,
            hp: -3.0,
            hb: -3.0,
            pp: 1.0,
            pb: 1.0,
            bb: 1.0,
            collision_penalty: 10.0,
        }
    }
}

/// Which measures backend the kernel scores with, selected once at
/// configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerBackend {
    /// Single-threaded spatial hash.
    #[default]
    Lattice,
    /// Spatial hash with the seven sub-counts fanned across the thread pool.
    Threaded,
    /// The asynchronous launch/fetch backend.
    Deferred,
}

/// Square-root damping of a raw pair count.
///
/// Inclusion–exclusion can leave a sub-count negative on colliding
/// conformations; those dampen to zero.
pub(crate) fn damp(count: i32) -> f64 {
    (count.max(0) as f64).sqrt()
}

/// Additional measures reported for a finished prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConformationReport {
    pub h_contacts: i32,
    pub collisions: i32,
    pub backbone_gyration: f64,
}

/// Scores movement chains of one fixed protein.
///
/// Owns the selected measures backend and the per-protein precomputations
/// (the maximum hydrophobic gyration of the extended backbone). One kernel
/// per evaluating thread; the scratch state inside the backend is released
/// when the kernel drops.
pub struct FitnessKernel {
    sequence: HpSequence,
    weights: EnergyWeights,
    backend: Box<dyn MeasureBackend>,
    max_gyration: f64,
}

impl FitnessKernel {
    pub fn new(
        sequence: HpSequence,
        weights: EnergyWeights,
        backend: ScorerBackend,
    ) -> Result<Self, FitnessError> {
        let backend: Box<dyn MeasureBackend> = match backend {
            ScorerBackend::Lattice => Box::new(LatticeMeasures::new(sequence.clone())?),
            ScorerBackend::Threaded => Box::new(ThreadedMeasures::new(sequence.clone())?),
            ScorerBackend::Deferred => Box::new(DeferredMeasures::new(sequence.clone())),
        };
        Ok(Self::with_backend(sequence, weights, backend))
    }

    /// Builds a kernel around an explicit backend instance.
    pub fn with_backend(
        sequence: HpSequence,
        weights: EnergyWeights,
        backend: Box<dyn MeasureBackend>,
    ) -> Self {
        let max_gyration = max_hydrophobic_gyration(&sequence);
        debug!(
            sequence = %sequence,
            max_gyration,
            "fitness kernel initialized"
        );
        Self {
            sequence,
            weights,
            backend,
            max_gyration,
        }
    }

    pub fn sequence(&self) -> &HpSequence {
        &self.sequence
    }

    /// Length of the movement chains this kernel scores.
    pub fn chain_len(&self) -> usize {
        self.sequence.chain_len()
    }

    /// Scores a movement chain.
    pub fn fitness(&mut self, chain: &MoveChain) -> Result<f64, FitnessError> {
        let (backbone, sidechain) = build_coordinates(chain);
        self.fitness_of_coords(&backbone, &sidechain)
    }

    /// Scores a conformation already reconstructed into coordinates.
    pub fn fitness_of_coords(
        &mut self,
        backbone: &[LatticePoint],
        sidechain: &[LatticePoint],
    ) -> Result<f64, FitnessError> {
        let m = self.backend.measures(backbone, sidechain)?;

        let w = &self.weights;
        let contact_energy = w.hh * damp(m.hh)
            + w.pp * damp(m.pp)
            + w.hp * damp(m.hp)
            + w.hb * damp(m.hb)
            + w.pb * damp(m.pb)
            + w.bb * damp(m.bb);
        let penalty = w.collision_penalty * damp(m.collisions);

        let (compactness, dispersion) = self.correction_factors(sidechain);
        Ok((contact_energy - penalty) * compactness * dispersion)
    }

    /// The two gyration-ratio correction factors: hydrophobic compactness and
    /// polar dispersion.
    fn correction_factors(&self, sidechain: &[LatticePoint]) -> (f64, f64) {
        let mut h_coords = Vec::with_capacity(self.sequence.hydrophobic_count());
        let mut p_coords = Vec::with_capacity(self.sequence.polar_count());
        for (i, c) in sidechain.iter().enumerate() {
            match self.sequence.bead(i) {
                BeadType::Hydrophobic => h_coords.push(*c),
                BeadType::Polar => p_coords.push(*c),
            }
        }

        // The sequence always carries at least one H bead.
        let center_h = centroid(&h_coords).unwrap_or_else(|| Point3::new(0.0, 0.0, 0.0));
        let center_p = centroid(&p_coords);
        let (gyr_h, gyr_p) =
            joint_gyration(sidechain, &self.sequence, &center_h, center_p.as_ref());

        let compactness = self.max_gyration - gyr_h;
        let dispersion = if p_coords.is_empty() || gyr_p >= gyr_h {
            1.0
        } else {
            1.0 / (1.0 - (gyr_p - gyr_h))
        };
        (compactness, dispersion)
    }

    /// Measures reported alongside the final prediction: hydrophobic contact
    /// count, collision count, and the backbone gyration radius.
    pub fn report(&mut self, chain: &MoveChain) -> Result<ConformationReport, FitnessError> {
        let (backbone, sidechain) = build_coordinates(chain);
        let m = self.backend.measures(&backbone, &sidechain)?;

        let center = centroid(&backbone).unwrap_or_else(|| Point3::new(0.0, 0.0, 0.0));
        Ok(ConformationReport {
            h_contacts: m.hh,
            collisions: m.collisions,
            backbone_gyration: gyration_radius(&backbone, &center),
        })
    }
}
