//! XYZ trajectory reader.
//!
//! The XYZ format repeats per frame: an atom-count line, a comment line,
//! then one `symbol x y z` record per atom (coordinates in Angstrom).
//! Every frame must carry the same atom count as the first.

use std::fs;
use std::path::Path;

use crate::models::Frame;

use super::error::{ReadError, ReadResult};

const FORMAT: &str = "XYZ";

/// Read all frames from an XYZ trajectory file.
pub fn read(path: &Path) -> ReadResult<Vec<Frame>> {
    let content = fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;
    let lines: Vec<&str> = content.lines().collect();
    let mut frames: Vec<Frame> = Vec::new();
    let mut cursor = 0usize;

    while cursor < lines.len() {
        // Trailing blank lines are fine; blank lines inside a frame are not.
        if lines[cursor].trim().is_empty() {
            cursor += 1;
            continue;
        }

        let count_line_no = cursor + 1;
        let n_atoms: usize = lines[cursor].trim().parse().map_err(|_| {
            ReadError::parse(FORMAT, path, count_line_no, "invalid atom count line")
        })?;
        if n_atoms == 0 {
            return Err(ReadError::parse(
                FORMAT,
                path,
                count_line_no,
                "frame declares zero atoms",
            ));
        }
        if let Some(first) = frames.first() {
            if n_atoms != first.n_atoms() {
                return Err(ReadError::parse(
                    FORMAT,
                    path,
                    count_line_no,
                    format!(
                        "frame {} has {} atoms, expected {}",
                        frames.len() + 1,
                        n_atoms,
                        first.n_atoms()
                    ),
                ));
            }
        }

        // Comment line.
        cursor += 1;
        if cursor >= lines.len() {
            return Err(ReadError::parse(
                FORMAT,
                path,
                count_line_no,
                "truncated frame: missing comment line",
            ));
        }

        // Atom records.
        let mut coords = Vec::with_capacity(n_atoms);
        for _ in 0..n_atoms {
            cursor += 1;
            if cursor >= lines.len() {
                return Err(ReadError::parse(
                    FORMAT,
                    path,
                    lines.len(),
                    format!(
                        "truncated frame: expected {} atom records, got {}",
                        n_atoms,
                        coords.len()
                    ),
                ));
            }
            coords.push(parse_atom_line(path, cursor + 1, lines[cursor])?);
        }
        frames.push(Frame { coords });
        cursor += 1;
    }

    if frames.is_empty() {
        return Err(ReadError::parse(FORMAT, path, 1, "no frames in trajectory"));
    }
    Ok(frames)
}

fn parse_atom_line(path: &Path, line_no: usize, raw: &str) -> ReadResult<[f64; 3]> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() < 4 {
        return Err(ReadError::parse(
            FORMAT,
            path,
            line_no,
            "atom record needs symbol and three coordinates",
        ));
    }
    let mut coord = [0.0; 3];
    for (slot, token) in coord.iter_mut().zip(&parts[1..4]) {
        *slot = token.parse::<f64>().map_err(|_| {
            ReadError::parse(FORMAT, path, line_no, format!("invalid coordinate '{token}'"))
        })?;
    }
    Ok(coord)
}
