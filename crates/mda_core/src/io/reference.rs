//! Bundled experimental reference curve.
//!
//! The RDF chart overlays an experimental O-O curve loaded from a CSV
//! with header columns `r (Å)` and `g_OO`. The file ships with the
//! application; its path is configurable in settings.

use std::fs;
use std::path::Path;

use super::error::{ReadError, ReadResult};

const FORMAT: &str = "CSV";

/// The experimental g_OO(r) curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCurve {
    pub r: Vec<f64>,
    pub g: Vec<f64>,
}

impl ReferenceCurve {
    pub fn len(&self) -> usize {
        self.r.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }
}

/// Load the experimental reference curve from a two-column CSV.
pub fn load_reference_curve(path: &Path) -> ReadResult<ReferenceCurve> {
    let content = fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;
    let mut lines = content.lines().enumerate();

    let (_, header) = lines
        .next()
        .ok_or_else(|| ReadError::parse(FORMAT, path, 1, "empty reference file"))?;
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    if columns.len() < 2 || !columns[0].starts_with('r') || columns[1] != "g_OO" {
        return Err(ReadError::parse(
            FORMAT,
            path,
            1,
            format!("expected header 'r (Å),g_OO', got '{header}'"),
        ));
    }

    let mut curve = ReferenceCurve {
        r: Vec::new(),
        g: Vec::new(),
    };
    for (idx, line) in lines {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < 2 {
            return Err(ReadError::parse(FORMAT, path, line_no, "expected two columns"));
        }
        let r: f64 = fields[0].parse().map_err(|_| {
            ReadError::parse(FORMAT, path, line_no, format!("invalid r value '{}'", fields[0]))
        })?;
        let g: f64 = fields[1].parse().map_err(|_| {
            ReadError::parse(FORMAT, path, line_no, format!("invalid g value '{}'", fields[1]))
        })?;
        curve.r.push(r);
        curve.g.push(g);
    }

    if curve.is_empty() {
        return Err(ReadError::parse(FORMAT, path, 1, "reference file has no data rows"));
    }
    Ok(curve)
}
