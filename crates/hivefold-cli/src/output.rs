use crate::error::Result;
use hivefold::core::geometry::build_coordinates;
use hivefold::core::models::movement::MoveChain;
use hivefold::core::models::sequence::HpSequence;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes the predicted conformation to `path`: one `x,y,z` line per
/// backbone bead interleaved with its side-chain bead, followed by the HP
/// sequence itself.
pub fn write_conformation(path: &Path, chain: &MoveChain, sequence: &HpSequence) -> Result<()> {
    let (backbone, sidechain) = build_coordinates(chain);

    let mut file = std::fs::File::create(path)?;
    for (bb, sc) in backbone.iter().zip(&sidechain) {
        writeln!(file, "{},{},{}", bb.x, bb.y, bb.z)?;
        writeln!(file, "{},{},{}", sc.x, sc.y, sc.z)?;
    }
    writeln!(file)?;
    write!(file, "{sequence}")?;

    info!(path = %path.display(), "conformation written");
    Ok(())
}
