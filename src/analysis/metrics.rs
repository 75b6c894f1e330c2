use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::model::CellValue;
use crate::data::selection::Selection;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Where the T10 search starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FallScan {
    /// First sample of the selection.
    #[default]
    FromStart,
    /// First occurrence of the peak, so the trailing edge of a pulse is found.
    AfterPeak,
}

impl FallScan {
    pub fn label(&self) -> &'static str {
        match self {
            FallScan::FromStart => "From selection start",
            FallScan::AfterPeak => "After peak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricsOptions {
    /// Fraction of the steady-state mean that counts as "risen".
    pub rise_fraction: f64,
    /// Fraction of the steady-state mean that counts as "fallen".
    pub fall_fraction: f64,
    pub fall_scan: FallScan,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        Self {
            rise_fraction: 0.9,
            fall_fraction: 0.1,
            fall_scan: FallScan::FromStart,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rise,
    Fall,
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Edge::Rise => write!(f, "reaches"),
            Edge::Fall => write!(f, "falls to"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    #[error("selection is empty (start {start}, end {end})")]
    EmptySelection { start: usize, end: usize },

    #[error("standard deviation needs at least {required} samples, selection has {available}")]
    InsufficientSamples { required: usize, available: usize },

    #[error("mean is zero, roughness undefined")]
    ZeroMean,

    #[error("pressure values too large, mean or standard deviation overflows")]
    Overflow,

    #[error("no sample {edge} {:.0}% of steady-state mean (threshold {threshold:.2})", .fraction * 100.0)]
    NoThresholdCrossing {
        edge: Edge,
        fraction: f64,
        threshold: f64,
    },
}

// ---------------------------------------------------------------------------
// Result record
// ---------------------------------------------------------------------------

/// Display names, in export order.
pub const METRIC_NAMES: [&str; 6] = [
    "Mean Steady State Pressure",
    "Peak Pressure",
    "Pressure Standard Deviation",
    "Pressure Roughness",
    "T90 Pressure Rise Time",
    "T10 Pressure Fall Time",
];

#[derive(Debug, Clone, PartialEq)]
pub struct PressureMetrics {
    pub mean_steady_state_pressure: f64,
    pub peak_pressure: f64,
    pub pressure_std_deviation: f64,
    /// Coefficient of variation in percent.
    pub pressure_roughness: f64,
    pub t90_pressure_rise_time: CellValue,
    pub t10_pressure_fall_time: CellValue,
    /// Absolute dataset row of the rise crossing.
    pub t90_row: usize,
    /// Absolute dataset row of the fall crossing.
    pub t10_row: usize,
}

impl PressureMetrics {
    /// Compute all six metrics over the selected rows.
    pub fn compute(selection: &Selection<'_>, options: &MetricsOptions) -> Result<Self, MetricsError> {
        let p2 = selection.pressure();
        let time = selection.time();

        if p2.is_empty() {
            let range = selection.range();
            return Err(MetricsError::EmptySelection {
                start: range.start,
                end: range.end,
            });
        }
        if selection.len() < 2 {
            return Err(MetricsError::InsufficientSamples {
                required: 2,
                available: selection.len(),
            });
        }

        let mean = mean(p2);
        let (peak_idx, peak) = first_max(p2);
        let std = sample_std(p2, mean);

        if !mean.is_finite() || !std.is_finite() {
            return Err(MetricsError::Overflow);
        }
        if mean == 0.0 {
            return Err(MetricsError::ZeroMean);
        }
        let roughness = std / mean * 100.0;

        let rise_threshold = options.rise_fraction * mean;
        let t90_idx = first_crossing(p2, 0, |p| p >= rise_threshold).ok_or(
            MetricsError::NoThresholdCrossing {
                edge: Edge::Rise,
                fraction: options.rise_fraction,
                threshold: rise_threshold,
            },
        )?;

        let fall_threshold = options.fall_fraction * mean;
        let fall_from = match options.fall_scan {
            FallScan::FromStart => 0,
            FallScan::AfterPeak => peak_idx,
        };
        let t10_idx = first_crossing(p2, fall_from, |p| p <= fall_threshold).ok_or(
            MetricsError::NoThresholdCrossing {
                edge: Edge::Fall,
                fraction: options.fall_fraction,
                threshold: fall_threshold,
            },
        )?;

        Ok(PressureMetrics {
            mean_steady_state_pressure: mean,
            peak_pressure: peak,
            pressure_std_deviation: std,
            pressure_roughness: roughness,
            t90_pressure_rise_time: time[t90_idx].clone(),
            t10_pressure_fall_time: time[t10_idx].clone(),
            t90_row: selection.offset() + t90_idx,
            t10_row: selection.offset() + t10_idx,
        })
    }

    /// `(name, value)` pairs in export order. Numbers use the shortest
    /// representation that parses back to the same value.
    pub fn named_values(&self) -> [(&'static str, String); 6] {
        [
            (METRIC_NAMES[0], self.mean_steady_state_pressure.to_string()),
            (METRIC_NAMES[1], self.peak_pressure.to_string()),
            (METRIC_NAMES[2], self.pressure_std_deviation.to_string()),
            (METRIC_NAMES[3], self.pressure_roughness.to_string()),
            (METRIC_NAMES[4], self.t90_pressure_rise_time.to_string()),
            (METRIC_NAMES[5], self.t10_pressure_fall_time.to_string()),
        ]
    }

    /// Human-readable lines for the metrics panel.
    pub fn display_lines(&self, unit: &str) -> [String; 6] {
        [
            format!("{}: {:.2} {unit}", METRIC_NAMES[0], self.mean_steady_state_pressure),
            format!("{}: {:.2} {unit}", METRIC_NAMES[1], self.peak_pressure),
            format!("{}: {:.2} {unit}", METRIC_NAMES[2], self.pressure_std_deviation),
            format!("{}: {:.2}%", METRIC_NAMES[3], self.pressure_roughness),
            format!("{}: {}", METRIC_NAMES[4], self.t90_pressure_rise_time),
            format!("{}: {}", METRIC_NAMES[5], self.t10_pressure_fall_time),
        ]
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N - 1 denominator). Needs at least two values.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Index and value of the first maximum.
fn first_max(values: &[f64]) -> (usize, f64) {
    values
        .iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best })
}

/// Index of the first value at or after `from` that satisfies `pred`.
pub fn first_crossing(values: &[f64], from: usize, pred: impl Fn(f64) -> bool) -> Option<usize> {
    values
        .iter()
        .skip(from)
        .position(|&v| pred(v))
        .map(|i| i + from)
}
