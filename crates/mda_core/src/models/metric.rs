//! Metric identifiers for the four derived quantities.

use serde::{Deserialize, Serialize};

/// One of the derived physical quantities the dashboard can compute.
///
/// Doubles as the key into the session cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Oxygen-oxygen radial distribution function.
    Rdf,
    /// Mass density histograms along each Cartesian axis.
    LinearDensity,
    /// Mean-squared displacement with self-diffusivity fit.
    Msd,
    /// Static dielectric constant from dipole fluctuations.
    Dielectric,
}

impl Metric {
    /// All metrics, in sidebar order.
    pub const ALL: [Metric; 4] = [
        Metric::Rdf,
        Metric::LinearDensity,
        Metric::Msd,
        Metric::Dielectric,
    ];

    /// Stable key used for the session cache and log messages.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Rdf => "rdf_OO",
            Metric::LinearDensity => "linear_density",
            Metric::Msd => "msd",
            Metric::Dielectric => "dielectric",
        }
    }

    /// Human-readable name shown in the sidebar.
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::Rdf => "RDFs",
            Metric::LinearDensity => "Linear Density",
            Metric::Msd => "MSD and self-diffusivity",
            Metric::Dielectric => "Dielectric Constant",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_unique() {
        let keys: Vec<_> = Metric::ALL.iter().map(|m| m.key()).collect();
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn display_matches_sidebar_labels() {
        assert_eq!(Metric::Rdf.to_string(), "RDFs");
        assert_eq!(Metric::Msd.to_string(), "MSD and self-diffusivity");
    }
}
