//! Core data model: input selections, the molecular system, and metric
//! identifiers shared by the analysis, session, and presentation layers.

mod metric;
mod selection;
mod system;

pub use metric::Metric;
pub use selection::{InputKind, Selection};
pub use system::{atomic_mass, AtomRecord, Bond, CubicBox, Frame, System};
