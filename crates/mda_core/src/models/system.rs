//! The in-memory molecular system: topology, trajectory and box geometry.

use serde::{Deserialize, Serialize};

/// Standard atomic mass in amu for an element symbol.
///
/// Covers the elements that show up in small-molecule MD topologies.
/// Returns `None` for symbols outside the table so the topology reader
/// can surface a parse error instead of a silent zero mass.
pub fn atomic_mass(symbol: &str) -> Option<f64> {
    let mass = match symbol {
        "H" => 1.008,
        "He" => 4.0026,
        "Li" => 6.94,
        "Be" => 9.0122,
        "B" => 10.81,
        "C" => 12.011,
        "N" => 14.007,
        "O" => 15.999,
        "F" => 18.998,
        "Ne" => 20.18,
        "Na" => 22.99,
        "Mg" => 24.305,
        "Al" => 26.982,
        "Si" => 28.085,
        "P" => 30.974,
        "S" => 32.06,
        "Cl" => 35.45,
        "Ar" => 39.948,
        "K" => 39.098,
        "Ca" => 40.078,
        "Fe" => 55.845,
        "Co" => 58.933,
        "Ni" => 58.693,
        "Cu" => 63.546,
        "Zn" => 65.38,
        "Br" => 79.904,
        "I" => 126.9,
        _ => return None,
    };
    Some(mass)
}

/// One atom from the topology.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    /// Atom name from the topology (e.g. "O1", "HW2").
    pub name: String,
    /// Element symbol (normalized, e.g. "O").
    pub element: String,
    /// Atomic mass in amu.
    pub mass: f64,
    /// Partial charge in units of e (0.0 if the topology carries none).
    pub charge: f64,
    /// Residue (substructure) id this atom belongs to.
    pub resid: u32,
}

impl AtomRecord {
    pub fn is_oxygen(&self) -> bool {
        self.element == "O"
    }
}

/// An undirected bond between two atom indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
}

/// Coordinates for one trajectory frame, in Angstrom.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub coords: Vec<[f64; 3]>,
}

impl Frame {
    pub fn n_atoms(&self) -> usize {
        self.coords.len()
    }
}

/// A cubic simulation cell with all angles at 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBox {
    /// Edge length in Angstrom.
    pub edge: f64,
}

impl CubicBox {
    /// Create a box from an edge length. The edge must be positive and finite.
    pub fn from_edge(edge: f64) -> Option<Self> {
        if edge.is_finite() && edge > 0.0 {
            Some(Self { edge })
        } else {
            None
        }
    }

    /// Box volume in cubic Angstrom.
    pub fn volume(&self) -> f64 {
        self.edge * self.edge * self.edge
    }

    /// Wrap a coordinate into the primary cell [0, edge).
    pub fn wrap(&self, point: [f64; 3]) -> [f64; 3] {
        [
            point[0].rem_euclid(self.edge),
            point[1].rem_euclid(self.edge),
            point[2].rem_euclid(self.edge),
        ]
    }

    /// Minimum-image displacement between two points.
    pub fn min_image(&self, delta: [f64; 3]) -> [f64; 3] {
        let l = self.edge;
        [
            delta[0] - (delta[0] / l).round() * l,
            delta[1] - (delta[1] / l).round() * l,
            delta[2] - (delta[2] / l).round() * l,
        ]
    }

    /// Minimum-image distance between two points.
    pub fn distance(&self, a: [f64; 3], b: [f64; 3]) -> f64 {
        let d = self.min_image([a[0] - b[0], a[1] - b[1], a[2] - b[2]]);
        (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
    }
}

/// A ready-to-analyze molecular system.
///
/// Built deterministically from a [`Selection`](super::Selection) by
/// [`system::build_system`](crate::system::build_system); rebuilt from
/// scratch for every analysis run and never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    pub atoms: Vec<AtomRecord>,
    pub bonds: Vec<Bond>,
    pub frames: Vec<Frame>,
    pub cell: CubicBox,
}

impl System {
    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Indices of all oxygen atoms.
    pub fn oxygen_indices(&self) -> Vec<usize> {
        self.atoms
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_oxygen())
            .map(|(i, _)| i)
            .collect()
    }

    /// Atom indices grouped by residue id, in ascending residue order.
    pub fn residues(&self) -> Vec<(u32, Vec<usize>)> {
        let mut groups: Vec<(u32, Vec<usize>)> = Vec::new();
        for (i, atom) in self.atoms.iter().enumerate() {
            match groups.iter_mut().find(|(id, _)| *id == atom.resid) {
                Some((_, members)) => members.push(i),
                None => groups.push((atom.resid, vec![i])),
            }
        }
        groups.sort_by_key(|(id, _)| *id);
        groups
    }

    /// Connected components of the bond graph, each sorted by atom index.
    ///
    /// Atoms without bonds form singleton components. Used by the periodic
    /// unwrap transform to make molecules whole.
    pub fn fragments(&self) -> Vec<Vec<usize>> {
        let n = self.n_atoms();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for bond in &self.bonds {
            if bond.a < n && bond.b < n {
                adjacency[bond.a].push(bond.b);
                adjacency[bond.b].push(bond.a);
            }
        }

        let mut seen = vec![false; n];
        let mut fragments = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = std::collections::VecDeque::from([start]);
            seen[start] = true;
            while let Some(i) = queue.pop_front() {
                component.push(i);
                for &j in &adjacency[i] {
                    if !seen[j] {
                        seen[j] = true;
                        queue.push_back(j);
                    }
                }
            }
            component.sort_unstable();
            fragments.push(component);
        }
        fragments
    }
}
