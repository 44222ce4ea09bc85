//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level
//! updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Analysis constants.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for input discovery, logs, and bundled data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Root folder scanned recursively for input files.
    #[serde(default = "default_data_root")]
    pub data_root: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Bundled experimental O-O RDF curve.
    #[serde(default = "default_reference_csv")]
    pub reference_csv: String,
}

fn default_data_root() -> String {
    ".".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

fn default_reference_csv() -> String {
    "data/RDF_OO_exp.csv".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            logs_folder: default_logs_folder(),
            reference_csv: default_reference_csv(),
        }
    }
}

/// Physical constants and kernel parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Assumed time between trajectory frames in fs.
    ///
    /// A placeholder, not read from trajectory metadata; set it to the
    /// real frame spacing of your run.
    #[serde(default = "default_timestep_fs")]
    pub timestep_fs: f64,

    /// Temperature for the dielectric kernel in K.
    #[serde(default = "default_temperature_k")]
    pub temperature_k: f64,

    /// RDF bin count.
    #[serde(default = "default_rdf_nbins")]
    pub rdf_nbins: usize,

    /// RDF range lower edge in Angstrom.
    #[serde(default = "default_rdf_r_min")]
    pub rdf_r_min: f64,

    /// RDF range upper edge in Angstrom.
    #[serde(default = "default_rdf_r_max")]
    pub rdf_r_max: f64,

    /// Linear density bin width in Angstrom.
    #[serde(default = "default_density_binsize")]
    pub density_binsize: f64,

    /// Residue id excluded from the solvent re-wrap (the solute).
    #[serde(default = "default_solute_resid")]
    pub solute_resid: u32,
}

fn default_timestep_fs() -> f64 {
    100.0
}

fn default_temperature_k() -> f64 {
    298.15
}

fn default_rdf_nbins() -> usize {
    500
}

fn default_rdf_r_min() -> f64 {
    2.0
}

fn default_rdf_r_max() -> f64 {
    9.0
}

fn default_density_binsize() -> f64 {
    0.1
}

fn default_solute_resid() -> u32 {
    201
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            timestep_fs: default_timestep_fs(),
            temperature_k: default_temperature_k(),
            rdf_nbins: default_rdf_nbins(),
            rdf_r_min: default_rdf_r_min(),
            rdf_r_max: default_rdf_r_max(),
            density_binsize: default_density_binsize(),
            solute_resid: default_solute_resid(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for log output (overridden by RUST_LOG).
    #[serde(default)]
    pub level: LogLevel,

    /// Also write a daily log file under the logs folder.
    #[serde(default = "default_true")]
    pub log_to_file: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            log_to_file: default_true(),
        }
    }
}

/// The sections a [`ConfigManager`](super::ConfigManager) can update
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Paths,
    Analysis,
    Logging,
}

impl ConfigSection {
    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Analysis => "analysis",
            ConfigSection::Logging => "logging",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_constants() {
        let settings = Settings::default();
        assert_eq!(settings.analysis.timestep_fs, 100.0);
        assert_eq!(settings.analysis.temperature_k, 298.15);
        assert_eq!(settings.analysis.rdf_nbins, 500);
        assert_eq!(settings.analysis.rdf_r_min, 2.0);
        assert_eq!(settings.analysis.rdf_r_max, 9.0);
        assert_eq!(settings.analysis.density_binsize, 0.1);
        assert_eq!(settings.analysis.solute_resid, 201);
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let settings: Settings = toml::from_str(
            "[analysis]\ntimestep_fs = 50.0\n",
        )
        .unwrap();
        assert_eq!(settings.analysis.timestep_fs, 50.0);
        assert_eq!(settings.analysis.rdf_nbins, 500);
        assert_eq!(settings.paths.data_root, ".");
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back.analysis.solute_resid, settings.analysis.solute_resid);
        assert_eq!(back.paths.reference_csv, settings.paths.reference_csv);
    }
}
