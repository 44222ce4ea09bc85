//! TRIPOS MOL2 topology reader.
//!
//! Reads the `@<TRIPOS>MOLECULE` counts line, the `@<TRIPOS>ATOM` records
//! (id, name, coordinates, SYBYL type, substructure id, substructure name,
//! charge) and the `@<TRIPOS>BOND` records. Coordinates are ignored — the
//! trajectory provides them — but residue ids, partial charges and bonds
//! are kept for the periodic transforms and the dielectric kernel.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::models::{atomic_mass, AtomRecord, Bond};

use super::error::{ReadError, ReadResult};

const FORMAT: &str = "MOL2";

/// Parsed topology: atoms plus the bond list.
#[derive(Debug, Clone)]
pub struct Topology {
    pub atoms: Vec<AtomRecord>,
    pub bonds: Vec<Bond>,
}

/// Read a MOL2 topology file.
pub fn read(path: &Path) -> ReadResult<Topology> {
    let content = fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;
    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l))
        .collect();

    let mol_idx = find_section(&lines, "@<TRIPOS>MOLECULE").ok_or_else(|| {
        ReadError::parse(FORMAT, path, 1, "missing @<TRIPOS>MOLECULE section")
    })?;

    let mut cursor = mol_idx + 1;
    // Molecule name line, then the counts line.
    next_data_line(&lines, &mut cursor);
    let (count_line_no, count_line) = next_data_line(&lines, &mut cursor)
        .ok_or_else(|| ReadError::parse(FORMAT, path, cursor + 1, "missing counts line"))?;
    let (atom_count, bond_count) = parse_counts(path, count_line_no, count_line)?;

    let atom_idx = find_section(&lines, "@<TRIPOS>ATOM").ok_or_else(|| {
        ReadError::parse(FORMAT, path, cursor + 1, "missing @<TRIPOS>ATOM section")
    })?;
    let bond_idx = find_section(&lines, "@<TRIPOS>BOND").unwrap_or(lines.len());

    let (atoms, id_map) = parse_atoms(path, &lines, atom_idx + 1, bond_idx, atom_count)?;
    let bonds = parse_bonds(path, &lines, bond_idx + 1, bond_count, &id_map)?;

    Ok(Topology { atoms, bonds })
}

fn find_section(lines: &[(usize, &str)], name: &str) -> Option<usize> {
    lines
        .iter()
        .position(|(_, line)| line.trim().eq_ignore_ascii_case(name))
}

fn next_data_line<'a>(lines: &[(usize, &'a str)], cursor: &mut usize) -> Option<(usize, &'a str)> {
    while *cursor < lines.len() {
        let (ln, content) = lines[*cursor];
        *cursor += 1;
        let trimmed = content.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Some((ln, content));
    }
    None
}

fn parse_counts(path: &Path, line_no: usize, line: &str) -> ReadResult<(usize, usize)> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Err(ReadError::parse(FORMAT, path, line_no, "empty counts line"));
    }
    let atoms = parts[0].parse::<usize>().map_err(|_| {
        ReadError::parse(FORMAT, path, line_no, "invalid atom count in counts line")
    })?;
    // The bond count is optional in the wild; default to zero.
    let bonds = match parts.get(1) {
        Some(token) => token.parse::<usize>().map_err(|_| {
            ReadError::parse(FORMAT, path, line_no, "invalid bond count in counts line")
        })?,
        None => 0,
    };
    Ok((atoms, bonds))
}

fn parse_atoms(
    path: &Path,
    lines: &[(usize, &str)],
    start: usize,
    end: usize,
    expected: usize,
) -> ReadResult<(Vec<AtomRecord>, HashMap<usize, usize>)> {
    let mut atoms = Vec::with_capacity(expected);
    let mut id_map = HashMap::new();
    let mut cursor = start;

    for _ in 0..expected {
        if cursor >= end {
            return Err(ReadError::parse(
                FORMAT,
                path,
                lines.get(end.saturating_sub(1)).map(|(ln, _)| *ln).unwrap_or(0),
                "ATOM section ended before expected atom count",
            ));
        }
        let (ln, raw) = next_data_line(&lines[..end], &mut cursor).ok_or_else(|| {
            ReadError::parse(
                FORMAT,
                path,
                lines.get(end.saturating_sub(1)).map(|(ln, _)| *ln).unwrap_or(0),
                "ATOM section ended before expected atom count",
            )
        })?;

        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 6 {
            return Err(ReadError::parse(FORMAT, path, ln, "invalid ATOM line"));
        }

        let atom_id = parts[0].parse::<usize>().map_err(|_| {
            ReadError::parse(FORMAT, path, ln, "invalid atom id in ATOM line")
        })?;
        let name = parts[1].to_string();
        for token in &parts[2..5] {
            token.parse::<f64>().map_err(|_| {
                ReadError::parse(FORMAT, path, ln, format!("invalid coordinate '{token}'"))
            })?;
        }
        let sybyl_type = parts[5];
        let element = element_from_type(sybyl_type)
            .or_else(|| element_from_type(&name))
            .ok_or_else(|| {
                ReadError::parse(
                    FORMAT,
                    path,
                    ln,
                    format!("unable to infer element from '{sybyl_type}'"),
                )
            })?;
        let mass = atomic_mass(&element).ok_or_else(|| {
            ReadError::parse(FORMAT, path, ln, format!("unknown element '{element}'"))
        })?;

        let resid = match parts.get(6) {
            Some(token) => token.parse::<u32>().map_err(|_| {
                ReadError::parse(FORMAT, path, ln, "invalid substructure id in ATOM line")
            })?,
            None => 1,
        };
        let charge = match parts.get(8) {
            Some(token) => token.parse::<f64>().map_err(|_| {
                ReadError::parse(FORMAT, path, ln, "invalid charge in ATOM line")
            })?,
            None => 0.0,
        };

        id_map.insert(atom_id, atoms.len());
        atoms.push(AtomRecord {
            name,
            element,
            mass,
            charge,
            resid,
        });
    }

    Ok((atoms, id_map))
}

fn parse_bonds(
    path: &Path,
    lines: &[(usize, &str)],
    start: usize,
    expected: usize,
    id_map: &HashMap<usize, usize>,
) -> ReadResult<Vec<Bond>> {
    let mut bonds = Vec::with_capacity(expected);
    let mut cursor = start;

    for _ in 0..expected {
        let (ln, raw) = next_data_line(lines, &mut cursor).ok_or_else(|| {
            ReadError::parse(
                FORMAT,
                path,
                lines.last().map(|(ln, _)| *ln).unwrap_or(0),
                "BOND section ended before expected bond count",
            )
        })?;

        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(ReadError::parse(FORMAT, path, ln, "invalid BOND line"));
        }

        let a1 = parts[1].parse::<usize>().map_err(|_| {
            ReadError::parse(FORMAT, path, ln, "invalid first atom id in BOND line")
        })?;
        let a2 = parts[2].parse::<usize>().map_err(|_| {
            ReadError::parse(FORMAT, path, ln, "invalid second atom id in BOND line")
        })?;

        let a = *id_map.get(&a1).ok_or_else(|| {
            ReadError::parse(FORMAT, path, ln, "bond references unknown atom id")
        })?;
        let b = *id_map.get(&a2).ok_or_else(|| {
            ReadError::parse(FORMAT, path, ln, "bond references unknown atom id")
        })?;
        bonds.push(Bond { a, b });
    }

    Ok(bonds)
}

/// Infer the element symbol from a SYBYL atom type or atom name.
///
/// SYBYL types look like `O.3`, `C.ar`, `H`; the element is the token
/// before the dot. Atom names like `HW2` start with the element letters.
fn element_from_type(token: &str) -> Option<String> {
    let head = token.split('.').next()?;
    let chars: Vec<char> = head.chars().collect();
    if chars.is_empty() {
        return None;
    }
    // Two-letter symbols first (Cl before C).
    if chars.len() >= 2 {
        let two = normalize(&chars[..2]);
        if atomic_mass(&two).is_some() {
            return Some(two);
        }
    }
    let one = normalize(&chars[..1]);
    if atomic_mass(&one).is_some() {
        return Some(one);
    }
    None
}

fn normalize(chars: &[char]) -> String {
    let mut out = String::new();
    for (i, c) in chars.iter().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
