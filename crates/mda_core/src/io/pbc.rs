//! Periodic-box file reader.
//!
//! A `.pbc` file holds a single float: the cubic cell edge length in
//! Angstrom. The box is cubic with all angles at 90 degrees.

use std::fs;
use std::path::Path;

use crate::models::CubicBox;

use super::error::{ReadError, ReadResult};

const FORMAT: &str = "PBC";

/// Read the cubic box from a `.pbc` file.
pub fn read(path: &Path) -> ReadResult<CubicBox> {
    let content = fs::read_to_string(path).map_err(|e| ReadError::io(path, e))?;
    let token = content.trim();
    if token.is_empty() {
        return Err(ReadError::parse(FORMAT, path, 1, "empty box file"));
    }
    let edge: f64 = token.parse().map_err(|_| {
        ReadError::parse(FORMAT, path, 1, format!("invalid box edge '{token}'"))
    })?;
    CubicBox::from_edge(edge).ok_or_else(|| {
        ReadError::parse(
            FORMAT,
            path,
            1,
            format!("box edge must be positive and finite, got {edge}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".pbc").tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn reads_edge_with_whitespace() {
        let f = write_file("18.0\n");
        let cell = read(f.path()).unwrap();
        assert!((cell.edge - 18.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_numeric_content() {
        let f = write_file("eighteen");
        let err = read(f.path()).unwrap_err();
        assert!(err.to_string().contains("invalid box edge"));
    }

    #[test]
    fn rejects_negative_edge() {
        let f = write_file("-18.0");
        assert!(read(f.path()).is_err());
    }

    #[test]
    fn rejects_empty_file() {
        let f = write_file("  \n");
        assert!(read(f.path()).is_err());
    }
}
