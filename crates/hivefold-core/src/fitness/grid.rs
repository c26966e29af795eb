use super::error::FitnessError;
use crate::core::models::point::LatticePoint;

/// Max total size of scratch memory allocated for one grid.
pub(crate) const MAX_GRID_BYTES: u64 = 4_000_000_000;

/// A scratch 3D occupancy lattice used to count same-cell and axis-neighbor
/// bead pairs in one pass each.
///
/// The axis spans `(hp_size + 3) * 2` cells, which bounds every coordinate a
/// chain of `hp_size` beads can reach from the pinned start (including the
/// one-step neighborhood probed while counting contacts). Cells are only ever
/// reset lazily around the beads of the current call, so the grid can be
/// reused across calls without clearing it wholesale.
#[derive(Debug)]
pub(crate) struct SpatialGrid {
    cells: Vec<u16>,
    axis: i64,
}

impl SpatialGrid {
    /// Allocates a grid sized for proteins of `hp_size` beads, refusing
    /// allocations beyond the memory ceiling.
    pub(crate) fn new(hp_size: usize) -> Result<Self, FitnessError> {
        Self::with_ceiling(hp_size, MAX_GRID_BYTES)
    }

    pub(crate) fn with_ceiling(hp_size: usize, ceiling_bytes: u64) -> Result<Self, FitnessError> {
        let axis = ((hp_size + 3) * 2) as i64;
        let cell_count = (axis * axis * axis) as u64;
        let requested_bytes = cell_count * std::mem::size_of::<u16>() as u64;
        if requested_bytes > ceiling_bytes {
            return Err(FitnessError::GridTooLarge {
                requested_bytes,
                ceiling_bytes,
            });
        }

        Ok(Self {
            cells: vec![0; cell_count as usize],
            axis,
        })
    }

    #[inline]
    fn index(&self, x: i64, y: i64, z: i64) -> usize {
        let half = self.axis / 2;
        ((z + half) * self.axis * self.axis + (y + half) * self.axis + (x + half)) as usize
    }

    #[inline]
    fn cell_of(&self, point: &LatticePoint) -> usize {
        self.index(point.x as i64, point.y as i64, point.z as i64)
    }

    /// Counts the bead pairs occupying an identical lattice cell.
    ///
    /// Each bead contributes the pre-increment occupancy of its cell, which
    /// sums to the number of same-cell pairs independent of bead order.
    pub(crate) fn count_collisions(&mut self, beads: &[LatticePoint]) -> i32 {
        for bead in beads {
            let idx = self.cell_of(bead);
            self.cells[idx] = 0;
        }

        let mut collisions = 0i32;
        for bead in beads {
            let idx = self.cell_of(bead);
            collisions += i32::from(self.cells[idx]);
            self.cells[idx] += 1;
        }
        collisions
    }

    /// Counts the unordered bead pairs sitting exactly one lattice step apart
    /// along one axis.
    ///
    /// Three passes: zero the six axis neighbors of every bead, place
    /// occupancy counts, then sum each bead's six neighbor occupancies and
    /// halve the total to undo the double counting. The cell under a bead is
    /// never reset; it is only read when some bead neighbors it, in which
    /// case the first pass has zeroed it.
    pub(crate) fn count_contacts(&mut self, beads: &[LatticePoint]) -> i32 {
        for bead in beads {
            let (x, y, z) = (bead.x as i64, bead.y as i64, bead.z as i64);
            for idx in self.neighbor_cells(x, y, z) {
                self.cells[idx] = 0;
            }
        }

        for bead in beads {
            let idx = self.cell_of(bead);
            self.cells[idx] += 1;
        }

        let mut contacts = 0i32;
        for bead in beads {
            let (x, y, z) = (bead.x as i64, bead.y as i64, bead.z as i64);
            for idx in self.neighbor_cells(x, y, z) {
                contacts += i32::from(self.cells[idx]);
            }
        }
        contacts / 2
    }

    #[inline]
    fn neighbor_cells(&self, x: i64, y: i64, z: i64) -> [usize; 6] {
        [
            self.index(x + 1, y, z),
            self.index(x - 1, y, z),
            self.index(x, y + 1, z),
            self.index(x, y - 1, z),
            self.index(x, y, z + 1),
            self.index(x, y, z - 1),
        ]
    }
}
