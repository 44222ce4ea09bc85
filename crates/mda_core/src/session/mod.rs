//! Session-scoped result cache with explicit recompute.
//!
//! One [`SessionStore`] lives in the application state and is passed by
//! reference to each analysis step. Keys are metrics, values are
//! immutable result snapshots plus a fresh/stale flag. First use runs the
//! computation and stores the snapshot; later reads return it untouched
//! until the user explicitly recomputes that one metric.
//!
//! Selection changes do NOT evict entries; they only mark them stale so
//! the UI can label results computed from a previous selection. That
//! staleness behavior mirrors the original dashboard and is recorded as
//! an open question in DESIGN.md.

use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::analysis::{AnalysisError, MetricResult};
use crate::models::Metric;

/// One cached analysis snapshot.
#[derive(Debug, Clone)]
pub struct CachedResult {
    /// The immutable result snapshot.
    pub result: MetricResult,
    /// When the snapshot was computed.
    pub computed_at: DateTime<Local>,
    /// Set when the input selection changed after this was computed.
    pub stale: bool,
}

/// In-process key-value store for analysis snapshots.
#[derive(Debug, Default)]
pub struct SessionStore {
    entries: HashMap<Metric, CachedResult>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached snapshot for a metric, if any.
    pub fn get(&self, metric: Metric) -> Option<&CachedResult> {
        self.entries.get(&metric)
    }

    /// Whether a metric has a cached snapshot.
    pub fn contains(&self, metric: Metric) -> bool {
        self.entries.contains_key(&metric)
    }

    /// Return the cached snapshot, computing and storing it on first use.
    ///
    /// The computation only runs when no snapshot exists; a stale
    /// snapshot is still returned untouched.
    pub fn run_or_cached<F>(&mut self, metric: Metric, compute: F) -> Result<&CachedResult, AnalysisError>
    where
        F: FnOnce() -> Result<MetricResult, AnalysisError>,
    {
        if !self.entries.contains_key(&metric) {
            let result = compute()?;
            debug_assert_eq!(result.metric(), metric);
            tracing::info!("computed {} for the first time this session", metric.key());
            self.entries.insert(metric, CachedResult {
                result,
                computed_at: Local::now(),
                stale: false,
            });
        }
        Ok(&self.entries[&metric])
    }

    /// Recompute one metric and overwrite its snapshot.
    pub fn recompute<F>(&mut self, metric: Metric, compute: F) -> Result<&CachedResult, AnalysisError>
    where
        F: FnOnce() -> Result<MetricResult, AnalysisError>,
    {
        let result = compute()?;
        debug_assert_eq!(result.metric(), metric);
        tracing::info!("recomputed {}", metric.key());
        self.entries.insert(metric, CachedResult {
            result,
            computed_at: Local::now(),
            stale: false,
        });
        Ok(&self.entries[&metric])
    }

    /// Mark every cached snapshot stale.
    ///
    /// Called when the input selection changes; entries stay readable.
    pub fn mark_all_stale(&mut self) {
        for entry in self.entries.values_mut() {
            entry.stale = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{DielectricResult, MsdResult};

    fn dielectric_snapshot(eps: f64) -> MetricResult {
        MetricResult::Dielectric(DielectricResult { eps_mean: eps })
    }

    #[test]
    fn first_use_computes_then_caches() {
        let mut store = SessionStore::new();
        let mut calls = 0;

        for _ in 0..3 {
            let entry = store
                .run_or_cached(Metric::Dielectric, || {
                    calls += 1;
                    Ok(dielectric_snapshot(78.4))
                })
                .unwrap();
            assert!(matches!(
                entry.result,
                MetricResult::Dielectric(DielectricResult { eps_mean }) if eps_mean == 78.4
            ));
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn recompute_overwrites_snapshot() {
        let mut store = SessionStore::new();
        store
            .run_or_cached(Metric::Dielectric, || Ok(dielectric_snapshot(78.4)))
            .unwrap();
        store
            .recompute(Metric::Dielectric, || Ok(dielectric_snapshot(80.1)))
            .unwrap();

        let entry = store.get(Metric::Dielectric).unwrap();
        assert!(matches!(
            entry.result,
            MetricResult::Dielectric(DielectricResult { eps_mean }) if eps_mean == 80.1
        ));
    }

    #[test]
    fn recompute_only_touches_one_metric() {
        let mut store = SessionStore::new();
        store
            .run_or_cached(Metric::Dielectric, || Ok(dielectric_snapshot(78.4)))
            .unwrap();
        store
            .run_or_cached(Metric::Msd, || {
                Ok(MetricResult::Msd(MsdResult {
                    timeseries: vec![0.0, 1.0],
                }))
            })
            .unwrap();

        store
            .recompute(Metric::Msd, || {
                Ok(MetricResult::Msd(MsdResult {
                    timeseries: vec![0.0, 2.0],
                }))
            })
            .unwrap();

        let dielectric = store.get(Metric::Dielectric).unwrap();
        assert!(matches!(
            dielectric.result,
            MetricResult::Dielectric(DielectricResult { eps_mean }) if eps_mean == 78.4
        ));
    }

    #[test]
    fn failed_compute_stores_nothing() {
        let mut store = SessionStore::new();
        let result = store.run_or_cached(Metric::Msd, || Err(AnalysisError::EmptyTrajectory));
        assert!(result.is_err());
        assert!(!store.contains(Metric::Msd));
    }

    #[test]
    fn selection_change_marks_stale_without_evicting() {
        let mut store = SessionStore::new();
        store
            .run_or_cached(Metric::Dielectric, || Ok(dielectric_snapshot(78.4)))
            .unwrap();

        store.mark_all_stale();

        let entry = store.get(Metric::Dielectric).unwrap();
        assert!(entry.stale);

        // A cached read still returns the stale snapshot untouched.
        let mut calls = 0;
        store
            .run_or_cached(Metric::Dielectric, || {
                calls += 1;
                Ok(dielectric_snapshot(0.0))
            })
            .unwrap();
        assert_eq!(calls, 0);

        // An explicit recompute clears the flag.
        store
            .recompute(Metric::Dielectric, || Ok(dielectric_snapshot(80.0)))
            .unwrap();
        assert!(!store.get(Metric::Dielectric).unwrap().stale);
    }
}
