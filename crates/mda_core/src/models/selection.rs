//! Input file selection: the (trajectory, topology, box) triple.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The three kinds of input file the dashboard needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Coordinate trajectory (`.xyz`).
    Trajectory,
    /// Topology with atom names, residues, charges and bonds (`.mol2`).
    Topology,
    /// Cubic box edge length, one float in Angstrom (`.pbc`).
    Box,
}

impl InputKind {
    /// File extension associated with this kind, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            InputKind::Trajectory => "xyz",
            InputKind::Topology => "mol2",
            InputKind::Box => "pbc",
        }
    }

    /// Label used by the sidebar pick lists.
    pub fn display_name(&self) -> &'static str {
        match self {
            InputKind::Trajectory => "trajectory file",
            InputKind::Topology => "topology file",
            InputKind::Box => "pbc file",
        }
    }
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A complete input selection.
///
/// Immutable once constructed; downstream steps take it by reference and
/// never run with a partial triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub trajectory: PathBuf,
    pub topology: PathBuf,
    pub box_file: PathBuf,
}

impl Selection {
    pub fn new(
        trajectory: impl Into<PathBuf>,
        topology: impl Into<PathBuf>,
        box_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            trajectory: trajectory.into(),
            topology: topology.into(),
            box_file: box_file.into(),
        }
    }

    /// Path for the given input kind.
    pub fn path(&self, kind: InputKind) -> &Path {
        match kind {
            InputKind::Trajectory => &self.trajectory,
            InputKind::Topology => &self.topology,
            InputKind::Box => &self.box_file,
        }
    }
}
