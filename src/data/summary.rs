use std::collections::HashMap;

use super::model::{Column, PressureDataset};

// ---------------------------------------------------------------------------
// Per-column summary statistics
// ---------------------------------------------------------------------------

/// Distribution summary of a numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN with fewer than two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Frequency summary of a text/timestamp column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

impl ColumnSummary {
    pub fn of(column: &Column) -> Self {
        match column.as_f64_series() {
            Some(series) => {
                let values: Vec<f64> = series.into_iter().filter(|v| !v.is_nan()).collect();
                ColumnSummary::Numeric(NumericSummary::compute(&values))
            }
            None => ColumnSummary::Categorical(CategoricalSummary::compute(column)),
        }
    }
}

/// Summaries for every column of the dataset, in column order.
pub fn describe(dataset: &PressureDataset) -> Vec<(String, ColumnSummary)> {
    dataset
        .columns
        .iter()
        .map(|c| (c.name.clone(), ColumnSummary::of(c)))
        .collect()
}

impl NumericSummary {
    pub fn compute(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return NumericSummary {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        NumericSummary {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }
}

/// Linear interpolation between the order statistics around `q * (n - 1)`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl CategoricalSummary {
    pub fn compute(column: &Column) -> Self {
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        let mut count = 0;
        for (row, value) in column.values.iter().enumerate() {
            if value.is_null() {
                continue;
            }
            count += 1;
            counts.entry(value.to_string()).or_insert((0, row)).0 += 1;
        }
        // Ties go to the value seen first.
        let top = counts
            .iter()
            .max_by(|a, b| a.1.0.cmp(&b.1.0).then(b.1.1.cmp(&a.1.1)))
            .map(|(value, (freq, _))| (value.clone(), *freq));

        CategoricalSummary {
            count,
            unique: counts.len(),
            freq: top.as_ref().map_or(0, |(_, f)| *f),
            top: top.map(|(v, _)| v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    #[test]
    fn numeric_summary_matches_hand_computation() {
        let s = NumericSummary::compute(&[0.0, 5.0, 9.0, 10.0, 10.0, 9.0, 5.0, 0.0]);
        assert_eq!(s.count, 8);
        assert_eq!(s.mean, 6.0);
        assert_eq!(s.min, 0.0);
        assert_eq!(s.max, 10.0);
        // sorted: 0 0 5 5 9 9 10 10; q25 at pos 1.75, median at 3.5, q75 at 5.25
        assert_eq!(s.q25, 3.75);
        assert_eq!(s.median, 7.0);
        assert_eq!(s.q75, 9.25);
        assert!((s.std - (124.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn single_value_has_undefined_std() {
        let s = NumericSummary::compute(&[4.0]);
        assert_eq!(s.median, 4.0);
        assert!(s.std.is_nan());
    }

    #[test]
    fn numeric_column_skips_nulls() {
        let col = Column::new(
            "P1",
            vec![CellValue::Integer(1), CellValue::Null, CellValue::Float(3.0)],
        );
        let ColumnSummary::Numeric(s) = ColumnSummary::of(&col) else {
            panic!("expected numeric summary");
        };
        assert_eq!(s.count, 2);
        assert_eq!(s.mean, 2.0);
    }

    #[test]
    fn text_column_reports_top_value() {
        let col = Column::new(
            "Valve",
            vec![
                CellValue::Text("open".into()),
                CellValue::Text("closed".into()),
                CellValue::Text("closed".into()),
                CellValue::Null,
            ],
        );
        assert_eq!(
            ColumnSummary::of(&col),
            ColumnSummary::Categorical(CategoricalSummary {
                count: 3,
                unique: 2,
                top: Some("closed".into()),
                freq: 2,
            })
        );
    }

    #[test]
    fn describe_covers_every_column() {
        let ds = crate::data::model::dataset_from_series(&[0.0, 1.0], &[2.0, 4.0]);
        let summaries = describe(&ds);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[1].0, "P2");
    }
}
