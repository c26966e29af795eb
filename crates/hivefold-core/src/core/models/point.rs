use nalgebra::{Point3, Vector3};

/// A bead position on the unit lattice.
pub type LatticePoint = Point3<i32>;

/// An integer displacement between lattice cells.
pub type LatticeVector = Vector3<i32>;

/// Verifies that `a` and `b` lie exactly one lattice step apart along one axis.
pub fn is_unit_step(a: &LatticePoint, b: &LatticePoint) -> bool {
    let d = a - b;
    d.x.abs() + d.y.abs() + d.z.abs() == 1
}
