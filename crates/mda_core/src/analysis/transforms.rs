//! Periodic boundary transforms applied before analysis.
//!
//! Two successive corrections mirror the usual trajectory workflow:
//! [`unwrap_molecules`] makes every molecule whole across the periodic
//! boundary, then [`wrap_residues`] moves residues back into the primary
//! cell by their center of mass, optionally leaving one residue (the
//! solute) untouched.

use crate::models::System;

/// Make every molecule whole across periodic boundaries, in place.
///
/// Walks each bond-graph fragment breadth-first from its lowest-index
/// atom and repositions every atom at its parent plus the minimum-image
/// displacement. Atoms without bonds are left where they are.
pub fn unwrap_molecules(system: &mut System) {
    let fragments = system.fragments();
    let n = system.n_atoms();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for bond in &system.bonds {
        adjacency[bond.a].push(bond.b);
        adjacency[bond.b].push(bond.a);
    }

    let cell = system.cell;
    for frame in &mut system.frames {
        let mut seen = vec![false; n];
        for fragment in &fragments {
            if fragment.len() < 2 {
                continue;
            }
            let root = fragment[0];
            seen[root] = true;
            let mut queue = std::collections::VecDeque::from([root]);
            while let Some(parent) = queue.pop_front() {
                let anchor = frame.coords[parent];
                for &child in &adjacency[parent] {
                    if seen[child] {
                        continue;
                    }
                    seen[child] = true;
                    let raw = frame.coords[child];
                    let delta = cell.min_image([
                        raw[0] - anchor[0],
                        raw[1] - anchor[1],
                        raw[2] - anchor[2],
                    ]);
                    frame.coords[child] = [
                        anchor[0] + delta[0],
                        anchor[1] + delta[1],
                        anchor[2] + delta[2],
                    ];
                    queue.push_back(child);
                }
            }
        }
    }
}

/// Wrap residues into the primary cell by their center of mass, in place.
///
/// Each residue is shifted as a rigid unit so its center of mass lands in
/// [0, edge). A residue id passed as `exclude` (the solute) is skipped.
/// Molecules should be made whole first or the centers are meaningless.
pub fn wrap_residues(system: &mut System, exclude: Option<u32>) {
    let residues = system.residues();
    let cell = system.cell;
    let masses: Vec<f64> = system.atoms.iter().map(|a| a.mass).collect();

    for frame in &mut system.frames {
        for (resid, members) in &residues {
            if Some(*resid) == exclude {
                continue;
            }
            let mut total_mass = 0.0;
            let mut center = [0.0f64; 3];
            for &i in members {
                let m = masses[i];
                total_mass += m;
                for d in 0..3 {
                    center[d] += m * frame.coords[i][d];
                }
            }
            if total_mass <= 0.0 {
                continue;
            }
            for c in &mut center {
                *c /= total_mass;
            }
            let wrapped = cell.wrap(center);
            let shift = [
                wrapped[0] - center[0],
                wrapped[1] - center[1],
                wrapped[2] - center[2],
            ];
            if shift.iter().all(|s| s.abs() < 1e-12) {
                continue;
            }
            for &i in members {
                for d in 0..3 {
                    frame.coords[i][d] += shift[d];
                }
            }
        }
    }
}
