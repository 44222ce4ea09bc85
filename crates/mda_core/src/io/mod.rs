//! Input discovery and file format readers.
//!
//! The dashboard consumes three filesystem inputs, discovered recursively
//! from the configured data root and parsed into the core model:
//!
//! 1. **Discovery** (`discovery`): enumerate `.xyz` / `.mol2` / `.pbc`
//!    candidates, sorted lexicographically.
//! 2. **Trajectory** (`xyz`): repeated XYZ frames of coordinates.
//! 3. **Topology** (`mol2`): TRIPOS MOL2 atoms, residues, charges, bonds.
//! 4. **Box** (`pbc`): a single float, the cubic cell edge in Angstrom.
//! 5. **Reference data** (`reference`): the bundled experimental O-O RDF
//!    curve overlaid on the calculated one.
//!
//! Every reader surfaces malformed content as a typed error carrying the
//! file path and line number; none of them return partial data.

mod discovery;
mod error;
pub mod mol2;
pub mod pbc;
pub mod reference;
pub mod xyz;

pub use discovery::{scan_inputs, InputCatalog};
pub use error::{ReadError, ReadResult};
