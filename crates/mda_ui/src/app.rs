//! Application state and message handlers.
//!
//! Every control is bound to one [`Message`]; each handler produces a
//! single state transition against the session store. Computation is
//! synchronous: an interaction blocks until its (re)computation finishes,
//! matching the request-per-interaction model of the dashboard.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use iced::{Element, Theme};

use mda_core::analysis::dielectric::{self, DielectricConfig};
use mda_core::analysis::diffusivity::FitWindow;
use mda_core::analysis::linear_density::{self, LinearDensityConfig};
use mda_core::analysis::msd;
use mda_core::analysis::rdf::{self, RdfConfig};
use mda_core::analysis::{
    AnalysisResult, DielectricResult, LinearDensityResult, MetricResult, MsdResult, RdfResult,
};
use mda_core::config::{AnalysisSettings, ConfigManager};
use mda_core::io::reference::{load_reference_curve, ReferenceCurve};
use mda_core::io::{scan_inputs, InputCatalog};
use mda_core::models::{InputKind, Metric, Selection, System};
use mda_core::session::SessionStore;
use mda_core::system::build_system;

use crate::view;

/// A selectable file, displayed by file name like the sidebar pick lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChoice(pub PathBuf);

impl fmt::Display for FileChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.file_name() {
            Some(name) => write!(f, "{}", name.to_string_lossy()),
            None => write!(f, "{}", self.0.display()),
        }
    }
}

/// All possible messages the application can receive.
#[derive(Debug, Clone)]
pub enum Message {
    /// A pick list chose a candidate for one input kind.
    InputSelected(InputKind, FileChoice),
    /// Re-scan the data root for input candidates.
    RefreshInputs,
    /// A metric toggle flipped in the sidebar.
    ToggleMetric(Metric, bool),
    /// Per-metric recalculate button.
    Recalculate(Metric),
    /// Fit-window start slider moved (fs).
    FitStartChanged(f64),
    /// Fit-window end slider moved (fs).
    FitEndChanged(f64),
}

/// Main application state.
pub struct App {
    pub config: ConfigManager,

    // Input resolution
    pub catalog: InputCatalog,
    pub scan_error: Option<String>,
    pub selected_trajectory: Option<FileChoice>,
    pub selected_topology: Option<FileChoice>,
    pub selected_box: Option<FileChoice>,

    // Metric state
    enabled: HashMap<Metric, bool>,
    errors: HashMap<Metric, String>,
    pub store: SessionStore,

    // RDF experimental overlay, loaded once at startup.
    pub reference: Result<ReferenceCurve, String>,

    // Diffusivity fit window; transient, never cached.
    pub fit_window: Option<FitWindow>,
}

impl App {
    pub fn new(config: ConfigManager) -> Self {
        let (catalog, scan_error) = match scan_inputs(&config.data_root()) {
            Ok(catalog) => (catalog, None),
            Err(e) => {
                tracing::error!("input scan failed: {e}");
                (InputCatalog::default(), Some(e.to_string()))
            }
        };
        let reference =
            load_reference_curve(&config.reference_csv()).map_err(|e| e.to_string());
        if let Err(e) = &reference {
            tracing::warn!("reference curve unavailable: {e}");
        }

        let mut app = Self {
            config,
            catalog,
            scan_error,
            selected_trajectory: None,
            selected_topology: None,
            selected_box: None,
            enabled: HashMap::new(),
            errors: HashMap::new(),
            store: SessionStore::new(),
            reference,
            fit_window: None,
        };
        app.default_selections();
        app
    }

    /// Pre-select the first candidate of each kind, like the pick lists do.
    fn default_selections(&mut self) {
        self.selected_trajectory = self
            .catalog
            .candidates(InputKind::Trajectory)
            .first()
            .map(|p| FileChoice(p.clone()));
        self.selected_topology = self
            .catalog
            .candidates(InputKind::Topology)
            .first()
            .map(|p| FileChoice(p.clone()));
        self.selected_box = self
            .catalog
            .candidates(InputKind::Box)
            .first()
            .map(|p| FileChoice(p.clone()));
    }

    /// The complete selection, or None while any input is missing.
    pub fn selection(&self) -> Option<Selection> {
        Some(Selection::new(
            self.selected_trajectory.as_ref()?.0.clone(),
            self.selected_topology.as_ref()?.0.clone(),
            self.selected_box.as_ref()?.0.clone(),
        ))
    }

    pub fn selected(&self, kind: InputKind) -> Option<&FileChoice> {
        match kind {
            InputKind::Trajectory => self.selected_trajectory.as_ref(),
            InputKind::Topology => self.selected_topology.as_ref(),
            InputKind::Box => self.selected_box.as_ref(),
        }
    }

    pub fn is_enabled(&self, metric: Metric) -> bool {
        self.enabled.get(&metric).copied().unwrap_or(false)
    }

    pub fn metric_error(&self, metric: Metric) -> Option<&str> {
        self.errors.get(&metric).map(String::as_str)
    }

    /// Whether the cached snapshot was computed from a previous selection.
    pub fn is_stale(&self, metric: Metric) -> bool {
        self.store.get(metric).map(|c| c.stale).unwrap_or(false)
    }

    pub fn rdf_result(&self) -> Option<&RdfResult> {
        match &self.store.get(Metric::Rdf)?.result {
            MetricResult::Rdf(r) => Some(r),
            _ => None,
        }
    }

    pub fn density_result(&self) -> Option<&LinearDensityResult> {
        match &self.store.get(Metric::LinearDensity)?.result {
            MetricResult::LinearDensity(r) => Some(r),
            _ => None,
        }
    }

    pub fn msd_result(&self) -> Option<&MsdResult> {
        match &self.store.get(Metric::Msd)?.result {
            MetricResult::Msd(r) => Some(r),
            _ => None,
        }
    }

    pub fn dielectric_result(&self) -> Option<&DielectricResult> {
        match &self.store.get(Metric::Dielectric)?.result {
            MetricResult::Dielectric(r) => Some(r),
            _ => None,
        }
    }

    pub fn timestep_fs(&self) -> f64 {
        self.config.settings().analysis.timestep_fs
    }

    pub fn update(&mut self, message: Message) {
        match message {
            Message::InputSelected(kind, choice) => self.select_input(kind, choice),
            Message::RefreshInputs => self.refresh_inputs(),
            Message::ToggleMetric(metric, on) => {
                self.enabled.insert(metric, on);
                if on {
                    self.ensure_computed(metric);
                }
            }
            Message::Recalculate(metric) => {
                if self.is_enabled(metric) {
                    self.compute_and_store(metric, true);
                }
            }
            Message::FitStartChanged(value) => {
                if let Some(window) = &mut self.fit_window {
                    window.start_fs = value.min(window.end_fs);
                }
            }
            Message::FitEndChanged(value) => {
                if let Some(window) = &mut self.fit_window {
                    window.end_fs = value.max(window.start_fs);
                }
            }
        }
    }

    fn select_input(&mut self, kind: InputKind, choice: FileChoice) {
        let slot = match kind {
            InputKind::Trajectory => &mut self.selected_trajectory,
            InputKind::Topology => &mut self.selected_topology,
            InputKind::Box => &mut self.selected_box,
        };
        if slot.as_ref() == Some(&choice) {
            return;
        }
        *slot = Some(choice);
        self.on_selection_changed();
    }

    fn refresh_inputs(&mut self) {
        match scan_inputs(&self.config.data_root()) {
            Ok(catalog) => {
                self.catalog = catalog;
                self.scan_error = None;
                // Drop selections whose file disappeared.
                let keep = |slot: &mut Option<FileChoice>, kind: InputKind, cat: &InputCatalog| {
                    let gone = slot
                        .as_ref()
                        .map(|choice| !cat.candidates(kind).contains(&choice.0))
                        .unwrap_or(false);
                    if gone {
                        *slot = None;
                    }
                };
                keep(&mut self.selected_trajectory, InputKind::Trajectory, &self.catalog);
                keep(&mut self.selected_topology, InputKind::Topology, &self.catalog);
                keep(&mut self.selected_box, InputKind::Box, &self.catalog);
            }
            Err(e) => {
                tracing::error!("input scan failed: {e}");
                self.scan_error = Some(e.to_string());
            }
        }
    }

    /// Selection changed: flag cached snapshots as stale (they are NOT
    /// evicted) and fill in metrics that have no snapshot yet.
    fn on_selection_changed(&mut self) {
        self.store.mark_all_stale();
        self.errors.clear();
        for metric in Metric::ALL {
            if self.is_enabled(metric) && !self.store.contains(metric) {
                self.compute_and_store(metric, false);
            }
        }
    }

    /// First-use path: compute only when no snapshot exists.
    fn ensure_computed(&mut self, metric: Metric) {
        if self.store.contains(metric) {
            return;
        }
        self.compute_and_store(metric, false);
    }

    fn compute_and_store(&mut self, metric: Metric, force: bool) {
        let Some(selection) = self.selection() else {
            self.errors.insert(
                metric,
                "select a trajectory, topology and box file first".to_string(),
            );
            return;
        };

        // The system is rebuilt from scratch for every run; only the
        // analysis snapshot is cached.
        let settings = self.config.settings().analysis.clone();
        let computed = build_system(&selection)
            .map_err(|e| e.to_string())
            .and_then(|system| {
                compute_metric(system, &settings, metric).map_err(|e| e.to_string())
            });

        match computed {
            Ok(result) => {
                let stored = if force {
                    self.store.recompute(metric, || Ok(result))
                } else {
                    self.store.run_or_cached(metric, || Ok(result))
                };
                debug_assert!(stored.is_ok());
                self.errors.remove(&metric);
                if metric == Metric::Msd {
                    self.reset_fit_window();
                }
            }
            Err(message) => {
                tracing::error!("{} failed: {message}", metric.key());
                self.errors.insert(metric, message);
            }
        }
    }

    /// Snap the fit window to the full lag-time range of the current MSD.
    fn reset_fit_window(&mut self) {
        let timestep = self.timestep_fs();
        self.fit_window = self
            .msd_result()
            .map(|result| FitWindow::full(result, timestep));
    }

    /// The current fit window clamped to the MSD lag-time range.
    pub fn fit_window_for(&self, result: &MsdResult) -> FitWindow {
        let timestep = self.timestep_fs();
        let full = FitWindow::full(result, timestep);
        match self.fit_window {
            Some(window) => window.clamped(full.end_fs),
            None => full,
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        view::view(self)
    }

    pub fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Run one metric's kernel over a freshly built system.
fn compute_metric(
    system: System,
    settings: &AnalysisSettings,
    metric: Metric,
) -> AnalysisResult<MetricResult> {
    match metric {
        Metric::Rdf => rdf::run(
            system,
            &RdfConfig {
                nbins: settings.rdf_nbins,
                r_min: settings.rdf_r_min,
                r_max: settings.rdf_r_max,
                exclusion_block: Some((1, 1)),
                solute_resid: Some(settings.solute_resid),
            },
        )
        .map(MetricResult::Rdf),
        Metric::LinearDensity => linear_density::run(
            &system,
            &LinearDensityConfig {
                binsize: settings.density_binsize,
            },
        )
        .map(MetricResult::LinearDensity),
        Metric::Msd => msd::run(&system).map(MetricResult::Msd),
        Metric::Dielectric => dielectric::run(
            system,
            &DielectricConfig {
                temperature_k: settings.temperature_k,
            },
        )
        .map(MetricResult::Dielectric),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const TOPOLOGY: &str = "\
@<TRIPOS>MOLECULE
water
3 2 1
SMALL
USER_CHARGES
@<TRIPOS>ATOM
1 O1  0.000 0.000 0.000 O.3 1 WAT1 -0.8340
2 H1  0.960 0.000 0.000 H   1 WAT1  0.4170
3 H2 -0.240 0.930 0.000 H   1 WAT1  0.4170
@<TRIPOS>BOND
1 1 2 1
2 1 3 1
";

    const TRAJECTORY: &str = "\
3
frame 1
O 1.0 1.0 1.0
H 1.96 1.0 1.0
H 0.76 1.93 1.0
3
frame 2
O 1.5 1.0 1.0
H 2.46 1.0 1.0
H 1.26 1.93 1.0
";

    fn write_inputs(dir: &Path) {
        fs::write(dir.join("traj.xyz"), TRAJECTORY).unwrap();
        fs::write(dir.join("topo.mol2"), TOPOLOGY).unwrap();
        fs::write(dir.join("box.pbc"), "18.0").unwrap();
    }

    fn app_with_inputs(dir: &Path) -> App {
        write_inputs(dir);
        let mut config = ConfigManager::new(dir.join("settings.toml"));
        config.load_or_create().unwrap();
        config.settings_mut().paths.data_root = dir.to_string_lossy().to_string();
        App::new(config)
    }

    #[test]
    fn startup_preselects_first_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_with_inputs(dir.path());
        assert!(app.selection().is_some());
        assert_eq!(
            app.selected_trajectory.as_ref().unwrap().to_string(),
            "traj.xyz"
        );
    }

    #[test]
    fn toggle_computes_once_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_inputs(dir.path());

        app.update(Message::ToggleMetric(Metric::LinearDensity, true));
        assert!(app.density_result().is_some());
        assert!(app.metric_error(Metric::LinearDensity).is_none());

        let before = app.density_result().unwrap().clone();
        app.update(Message::ToggleMetric(Metric::LinearDensity, false));
        app.update(Message::ToggleMetric(Metric::LinearDensity, true));
        assert_eq!(app.density_result().unwrap(), &before);
    }

    #[test]
    fn msd_toggle_sets_full_fit_window() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_inputs(dir.path());

        app.update(Message::ToggleMetric(Metric::Msd, true));
        let result = app.msd_result().unwrap();
        assert_eq!(result.n_frames(), 2);
        let window = app.fit_window.unwrap();
        assert_eq!(window.start_fs, 0.0);
        assert_eq!(window.end_fs, 100.0);
    }

    #[test]
    fn sliders_keep_window_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_inputs(dir.path());
        app.update(Message::ToggleMetric(Metric::Msd, true));

        app.update(Message::FitEndChanged(100.0));
        app.update(Message::FitStartChanged(400.0));
        let window = app.fit_window.unwrap();
        assert!(window.start_fs <= window.end_fs);
    }

    #[test]
    fn selection_change_marks_cache_stale() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_inputs(dir.path());
        // A second trajectory candidate to switch to.
        fs::write(dir.path().join("other.xyz"), TRAJECTORY).unwrap();
        app.update(Message::RefreshInputs);

        app.update(Message::ToggleMetric(Metric::Dielectric, true));
        assert!(!app.is_stale(Metric::Dielectric));

        let other = FileChoice(dir.path().join("other.xyz"));
        app.update(Message::InputSelected(InputKind::Trajectory, other));
        assert!(app.is_stale(Metric::Dielectric));
        // The snapshot is still there: flagged, not evicted.
        assert!(app.dielectric_result().is_some());
    }

    #[test]
    fn recalculate_clears_stale_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_inputs(dir.path());
        fs::write(dir.path().join("other.xyz"), TRAJECTORY).unwrap();
        app.update(Message::RefreshInputs);

        app.update(Message::ToggleMetric(Metric::Dielectric, true));
        let other = FileChoice(dir.path().join("other.xyz"));
        app.update(Message::InputSelected(InputKind::Trajectory, other));
        assert!(app.is_stale(Metric::Dielectric));

        app.update(Message::Recalculate(Metric::Dielectric));
        assert!(!app.is_stale(Metric::Dielectric));
    }

    #[test]
    fn malformed_box_file_surfaces_error_not_chart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_inputs(dir.path());
        fs::write(dir.path().join("box.pbc"), "not a number").unwrap();

        app.update(Message::ToggleMetric(Metric::LinearDensity, true));
        assert!(app.density_result().is_none());
        let error = app.metric_error(Metric::LinearDensity).unwrap();
        assert!(error.contains("invalid box edge"));
    }
}
