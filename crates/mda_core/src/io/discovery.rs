//! Candidate input discovery.
//!
//! Walks the data root recursively and collects files by extension, one
//! sorted list per input kind. The UI presents these as pick lists; an
//! analysis can only start once one candidate of each kind is selected.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::InputKind;

use super::error::{ReadError, ReadResult};

/// Candidate files for each input kind, sorted lexicographically by path.
#[derive(Debug, Clone, Default)]
pub struct InputCatalog {
    pub trajectories: Vec<PathBuf>,
    pub topologies: Vec<PathBuf>,
    pub box_files: Vec<PathBuf>,
}

impl InputCatalog {
    /// Candidates for the given kind.
    pub fn candidates(&self, kind: InputKind) -> &[PathBuf] {
        match kind {
            InputKind::Trajectory => &self.trajectories,
            InputKind::Topology => &self.topologies,
            InputKind::Box => &self.box_files,
        }
    }

    /// Whether at least one candidate exists for every kind.
    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Input kinds with no candidates at all.
    pub fn missing(&self) -> Vec<InputKind> {
        [InputKind::Trajectory, InputKind::Topology, InputKind::Box]
            .into_iter()
            .filter(|kind| self.candidates(*kind).is_empty())
            .collect()
    }
}

/// Recursively scan `root` for input candidates.
///
/// Directory entries that cannot be read surface as errors; the scan does
/// not silently skip unreadable subtrees. Symlinks are not followed.
pub fn scan_inputs(root: &Path) -> ReadResult<InputCatalog> {
    let mut catalog = InputCatalog::default();
    visit(root, &mut catalog)?;
    catalog.trajectories.sort();
    catalog.topologies.sort();
    catalog.box_files.sort();
    tracing::debug!(
        "scanned {}: {} trajectories, {} topologies, {} box files",
        root.display(),
        catalog.trajectories.len(),
        catalog.topologies.len(),
        catalog.box_files.len()
    );
    Ok(catalog)
}

fn visit(dir: &Path, catalog: &mut InputCatalog) -> ReadResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| ReadError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ReadError::io(dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| ReadError::io(&path, e))?;
        if file_type.is_dir() {
            visit(&path, catalog)?;
        } else if file_type.is_file() {
            match path.extension().and_then(|e| e.to_str()) {
                Some("xyz") => catalog.trajectories.push(path),
                Some("mol2") => catalog.topologies.push(path),
                Some("pbc") => catalog.box_files.push(path),
                _ => {}
            }
        }
    }
    Ok(())
}
