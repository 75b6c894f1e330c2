use std::path::{Path, PathBuf};

use crate::analysis::metrics::{MetricsError, PressureMetrics};
use crate::color::SeriesColors;
use crate::config::Settings;
use crate::data::model::PressureDataset;
use crate::data::selection::{Selection, SelectionRange};
use crate::data::summary::{ColumnSummary, describe};
use crate::export;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<PressureDataset>,

    /// Per-column summary table (cached per dataset).
    pub summaries: Vec<(String, ColumnSummary)>,

    /// Slider positions.
    pub selection: SelectionRange,

    /// Metrics for the current selection (recomputed on every change).
    pub metrics: Option<Result<PressureMetrics, MetricsError>>,

    /// Line colours for the chart.
    pub series_colors: SeriesColors,

    pub settings: Settings,

    /// Save toggles.
    pub save_original: bool,
    pub save_results: bool,

    /// Writes owed by the save toggles, flushed by [`AppState::flush_saves`].
    pending_original: bool,
    pending_results: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Last successful save, shown as a confirmation.
    pub save_message: Option<String>,

    /// A previously saved analysis results file opened for comparison.
    pub loaded_results: Option<(PathBuf, Vec<(String, String)>)>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            dataset: None,
            summaries: Vec::new(),
            selection: SelectionRange { start: 0, end: 0 },
            metrics: None,
            series_colors: SeriesColors::default(),
            settings,
            save_original: false,
            save_results: false,
            pending_original: false,
            pending_results: false,
            status_message: None,
            save_message: None,
            loaded_results: None,
        }
    }

    /// Load `path` and make it the current dataset. On failure the previous
    /// dataset stays in place and the error goes to the status line.
    pub fn open_path(&mut self, path: &Path) {
        match crate::data::loader::load_file(path, &self.settings.schema()) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows with columns {:?} from {}",
                    dataset.len(),
                    dataset.column_names().collect::<Vec<_>>(),
                    path.display()
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Open a `Metric,Value` file written by an earlier session.
    pub fn open_results(&mut self, path: &Path) {
        match export::read_metrics(path) {
            Ok(pairs) => {
                log::info!("Loaded {} metrics from {}", pairs.len(), path.display());
                self.loaded_results = Some((path.to_path_buf(), pairs));
            }
            Err(e) => {
                log::error!("Failed to load analysis results: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, reset the sliders and recompute.
    pub fn set_dataset(&mut self, dataset: PressureDataset) {
        self.summaries = describe(&dataset);
        self.selection = SelectionRange::full(dataset.len());

        let pressure_idx = dataset
            .column_names()
            .position(|c| c == dataset.pressure_column_name());
        self.series_colors = SeriesColors::new(dataset.columns.len(), pressure_idx);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.pending_original = self.save_original;
        self.recompute();
    }

    /// Move the sliders. Out-of-range positions are clamped.
    pub fn set_selection(&mut self, range: SelectionRange) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let range = range.clamped(ds.len());
        if range != self.selection {
            self.selection = range;
            self.recompute();
        }
    }

    /// Recompute the metrics for the current selection and options.
    pub fn recompute(&mut self) {
        let Some(ds) = &self.dataset else {
            self.metrics = None;
            return;
        };
        let selection = Selection::new(ds, self.selection);
        let result = PressureMetrics::compute(&selection, &self.settings.metrics);
        match &result {
            Ok(m) => {
                log::debug!(
                    "Metrics for rows {}..{}: mean {:.3}, peak {:.3}",
                    self.selection.start,
                    self.selection.end,
                    m.mean_steady_state_pressure,
                    m.peak_pressure
                );
                self.pending_results = self.save_results;
            }
            Err(e) => log::warn!(
                "Metrics for rows {}..{} unavailable: {e}",
                self.selection.start,
                self.selection.end
            ),
        }
        self.metrics = Some(result);
    }

    pub fn set_save_original(&mut self, on: bool) {
        self.save_original = on;
        self.pending_original = on;
    }

    pub fn set_save_results(&mut self, on: bool) {
        self.save_results = on;
        self.pending_results = on;
    }

    /// Perform the writes owed by the save toggles. Errors go to the status
    /// line; the toggle stays on so the next change retries.
    ///
    /// Analysis results are held back while `pointer_down`, so dragging a
    /// slider writes one file on release instead of one per step.
    pub fn flush_saves(&mut self, pointer_down: bool) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let policy = self.settings.overwrite;

        if self.pending_original {
            self.pending_original = false;
            match export::save_dataset(ds, &self.settings.original_data_path(), policy) {
                Ok(path) => {
                    self.save_message = Some(format!("Original data saved as {}", path.display()));
                }
                Err(e) => {
                    log::error!("Saving original data failed: {e}");
                    self.status_message = Some(format!("Error: {e}"));
                }
            }
        }

        if self.pending_results && !pointer_down {
            self.pending_results = false;
            match &self.metrics {
                Some(Ok(metrics)) => {
                    match export::save_metrics(metrics, &self.settings.analysis_results_path(), policy) {
                        Ok(path) => {
                            self.save_message =
                                Some(format!("Analysis results saved as {}", path.display()));
                        }
                        Err(e) => {
                            log::error!("Saving analysis results failed: {e}");
                            self.status_message = Some(format!("Error: {e}"));
                        }
                    }
                }
                Some(Err(e)) => {
                    self.status_message = Some(format!("Analysis results not saved: {e}"));
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::metrics::{Edge, FallScan};
    use crate::data::model::dataset_from_series;
    use crate::export::OverwritePolicy;

    fn pulse_state(settings: Settings) -> AppState {
        let mut state = AppState::new(settings);
        let time: Vec<f64> = (0..8).map(f64::from).collect();
        state.set_dataset(dataset_from_series(
            &time,
            &[0.0, 5.0, 9.0, 10.0, 10.0, 9.0, 5.0, 0.0],
        ));
        state
    }

    #[test]
    fn loading_resets_sliders_and_computes() {
        let state = pulse_state(Settings::default());
        assert_eq!(state.selection, SelectionRange { start: 0, end: 7 });
        assert!(matches!(state.metrics, Some(Ok(_))));
        assert_eq!(state.summaries.len(), 2);
        assert!(state.series_colors.is_highlighted(1));
    }

    #[test]
    fn selection_change_recomputes_and_clamps() {
        let mut state = pulse_state(Settings::default());
        state.set_selection(SelectionRange { start: 4, end: 4 });
        assert!(matches!(
            state.metrics,
            Some(Err(MetricsError::EmptySelection { .. }))
        ));
        state.set_selection(SelectionRange { start: 0, end: 100 });
        assert_eq!(state.selection, SelectionRange { start: 0, end: 7 });
        assert!(matches!(state.metrics, Some(Ok(_))));
    }

    #[test]
    fn option_change_is_picked_up_on_recompute() {
        let mut state = pulse_state(Settings::default());
        // Rows 0..7 end at P2 = 5, so nothing after the peak falls to 10% of the mean.
        state.settings.metrics.fall_scan = FallScan::AfterPeak;
        state.recompute();
        assert!(matches!(
            state.metrics,
            Some(Err(MetricsError::NoThresholdCrossing { edge: Edge::Fall, .. }))
        ));

        state.settings.metrics.fall_scan = FallScan::FromStart;
        state.recompute();
        let Some(Ok(m)) = &state.metrics else {
            panic!("expected metrics");
        };
        assert_eq!(m.t10_row, 0);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = pulse_state(Settings::default());
        state.open_path(Path::new("/nonexistent/pressure.csv"));
        assert!(state.dataset.is_some());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error: "));
    }

    #[test]
    fn save_toggles_write_files() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let mut state = pulse_state(settings);
        state.set_save_original(true);
        state.set_save_results(true);
        state.flush_saves(false);
        assert!(dir.path().join("original_data.csv").exists());
        assert!(dir.path().join("analysis_results.csv").exists());
        assert!(state.status_message.is_none());

        // Selection change re-saves the results only.
        std::fs::remove_file(dir.path().join("original_data.csv")).unwrap();
        std::fs::remove_file(dir.path().join("analysis_results.csv")).unwrap();
        state.set_selection(SelectionRange { start: 0, end: 6 });
        state.flush_saves(false);
        assert!(!dir.path().join("original_data.csv").exists());
        assert!(dir.path().join("analysis_results.csv").exists());
    }

    #[test]
    fn deny_policy_reports_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("analysis_results.csv"), "old").unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            overwrite: OverwritePolicy::Deny,
            ..Settings::default()
        };
        let mut state = pulse_state(settings);
        state.set_save_results(true);
        state.flush_saves(false);
        assert!(state.status_message.as_deref().unwrap().contains("already exists"));
        assert!(state.save_results);
    }

    #[test]
    fn slider_drag_writes_results_once_on_release() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            overwrite: OverwritePolicy::Version,
            ..Settings::default()
        };
        let mut state = pulse_state(settings);
        state.set_save_results(true);
        state.flush_saves(false);

        for end in [6, 5, 4] {
            state.set_selection(SelectionRange { start: 0, end });
            state.flush_saves(true);
        }
        state.flush_saves(false);

        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 2);
        let latest = export::read_metrics(&dir.path().join("analysis_results_1.csv")).unwrap();
        let Some(Ok(m)) = &state.metrics else {
            panic!("expected metrics");
        };
        assert_eq!(latest[1].1, m.peak_pressure.to_string());
    }

    #[test]
    fn opens_saved_results() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().to_path_buf(),
            ..Settings::default()
        };
        let mut state = pulse_state(settings);
        state.set_save_results(true);
        state.flush_saves(false);

        let path = dir.path().join("analysis_results.csv");
        state.open_results(&path);
        let (opened, pairs) = state.loaded_results.as_ref().unwrap();
        assert_eq!(opened, &path);
        assert_eq!(pairs[0].0, "Mean Steady State Pressure");
        assert_eq!(pairs.len(), 6);

        state.open_results(&dir.path().join("missing.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error: "));
        assert!(state.loaded_results.is_some());
    }
}
