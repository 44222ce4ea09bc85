//! System construction from a complete input selection.
//!
//! Loads the MOL2 topology and XYZ trajectory into a unified [`System`],
//! cross-validates atom counts, and applies the cubic cell read from the
//! box file. Construction is deterministic: the same selection always
//! yields an identical system. Systems are rebuilt for every analysis run
//! and never cached.

use thiserror::Error;

use crate::io::{mol2, pbc, xyz, ReadError};
use crate::models::{Selection, System};

/// Error from system construction.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A selected file could not be read or parsed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The trajectory's atom count does not match the topology's.
    #[error("trajectory has {trajectory} atoms per frame, topology has {topology}")]
    AtomCountMismatch { topology: usize, trajectory: usize },
}

/// Result type for system construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Build a ready-to-analyze [`System`] from a complete [`Selection`].
pub fn build_system(selection: &Selection) -> BuildResult<System> {
    let topology = mol2::read(&selection.topology)?;
    let frames = xyz::read(&selection.trajectory)?;
    let cell = pbc::read(&selection.box_file)?;

    let per_frame = frames[0].n_atoms();
    if per_frame != topology.atoms.len() {
        return Err(BuildError::AtomCountMismatch {
            topology: topology.atoms.len(),
            trajectory: per_frame,
        });
    }

    tracing::info!(
        "built system: {} atoms, {} frames, box edge {:.3} A",
        topology.atoms.len(),
        frames.len(),
        cell.edge
    );

    Ok(System {
        atoms: topology.atoms,
        bonds: topology.bonds,
        frames,
        cell,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    const TOPOLOGY: &str = "\
@<TRIPOS>MOLECULE
water
3 2 1
SMALL
USER_CHARGES
@<TRIPOS>ATOM
1 O1  0.000 0.000 0.000 O.3 1 WAT1 -0.8340
2 H1  0.960 0.000 0.000 H   1 WAT1  0.4170
3 H2 -0.240 0.930 0.000 H   1 WAT1  0.4170
@<TRIPOS>BOND
1 1 2 1
2 1 3 1
";

    const TRAJECTORY: &str = "\
3
frame 1
O 0.0 0.0 0.0
H 0.96 0.0 0.0
H -0.24 0.93 0.0
3
frame 2
O 0.5 0.0 0.0
H 1.46 0.0 0.0
H 0.26 0.93 0.0
";

    fn write_inputs(dir: &std::path::Path) -> Selection {
        let traj = dir.join("traj.xyz");
        let topo = dir.join("topo.mol2");
        let cell = dir.join("box.pbc");
        fs::write(&traj, TRAJECTORY).unwrap();
        fs::write(&topo, TOPOLOGY).unwrap();
        fs::write(&cell, "18.0\n").unwrap();
        Selection::new(traj, topo, cell)
    }

    #[test]
    fn builds_unified_system() {
        let dir = tempfile::tempdir().unwrap();
        let selection = write_inputs(dir.path());

        let system = build_system(&selection).unwrap();
        assert_eq!(system.n_atoms(), 3);
        assert_eq!(system.n_frames(), 2);
        assert!((system.cell.edge - 18.0).abs() < 1e-12);
        assert_eq!(system.bonds.len(), 2);
    }

    #[test]
    fn building_twice_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let selection = write_inputs(dir.path());

        let first = build_system(&selection).unwrap();
        let second = build_system(&selection).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_atom_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let selection = write_inputs(dir.path());
        fs::write(&selection.trajectory, "1\nframe 1\nO 0.0 0.0 0.0\n").unwrap();

        let err = build_system(&selection).unwrap_err();
        assert!(matches!(err, BuildError::AtomCountMismatch { .. }));
    }

    #[test]
    fn propagates_malformed_box_file() {
        let dir = tempfile::tempdir().unwrap();
        let selection = write_inputs(dir.path());
        fs::write(&selection.box_file, "not a number").unwrap();

        let err = build_system(&selection).unwrap_err();
        assert!(err.to_string().contains("invalid box edge"));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let selection = Selection::new(
            PathBuf::from("/nonexistent/traj.xyz"),
            PathBuf::from("/nonexistent/topo.mol2"),
            PathBuf::from("/nonexistent/box.pbc"),
        );
        assert!(build_system(&selection).is_err());
    }
}
