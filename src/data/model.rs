use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a table column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes a sensor log carries.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Date/time kept in its source text form.
    Timestamp(String),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            // Shortest representation that parses back to the same f64.
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Text(s) | CellValue::Timestamp(s) => write!(f, "{s}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64` if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Names of the two columns every pressure dataset must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub time_column: String,
    pub pressure_column: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            time_column: "Time".to_string(),
            pressure_column: "P2".to_string(),
        }
    }
}

/// Reasons a loaded table is rejected as a pressure dataset.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("required column '{0}' not found")]
    MissingColumn(String),

    #[error("dataset has no rows")]
    NoRows,

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{column}', row {row}: missing value")]
    MissingValue { column: String, row: usize },

    #[error("column '{column}', row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("column '{column}' decreases at row {row}")]
    NotMonotonic { column: String, row: usize },
}

// ---------------------------------------------------------------------------
// Column / PressureDataset
// ---------------------------------------------------------------------------

/// One named column of the source table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Numeric view of the column, or `None` if any non-null cell is not a number.
    /// Null cells become NaN so the result stays row-aligned.
    pub fn as_f64_series(&self) -> Option<Vec<f64>> {
        self.values
            .iter()
            .map(|v| match v {
                CellValue::Null => Some(f64::NAN),
                other => other.as_f64(),
            })
            .collect()
    }
}

/// The full table after the schema check.
#[derive(Debug, Clone)]
pub struct PressureDataset {
    /// All columns in source order.
    pub columns: Vec<Column>,
    time_idx: usize,
    pressure_idx: usize,
    /// Validated pressure series.
    pressure: Vec<f64>,
}

impl PressureDataset {
    /// Validate `columns` against `schema` and build the dataset.
    pub fn from_columns(columns: Vec<Column>, schema: &Schema) -> Result<Self, SchemaError> {
        let position = |name: &str| {
            columns
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };
        let time_idx = position(&schema.time_column)?;
        let pressure_idx = position(&schema.pressure_column)?;

        let n_rows = columns[0].values.len();
        if let Some(col) = columns.iter().find(|c| c.values.len() != n_rows) {
            return Err(SchemaError::RaggedColumn {
                column: col.name.clone(),
                expected: n_rows,
                actual: col.values.len(),
            });
        }
        if n_rows == 0 {
            return Err(SchemaError::NoRows);
        }

        let pressure_col = &columns[pressure_idx];
        let pressure = pressure_col
            .values
            .iter()
            .enumerate()
            .map(|(row, cell)| match cell {
                CellValue::Null => Err(SchemaError::MissingValue {
                    column: pressure_col.name.clone(),
                    row,
                }),
                other => match other.as_f64() {
                    Some(v) if v.is_finite() => Ok(v),
                    Some(_) => Err(SchemaError::MissingValue {
                        column: pressure_col.name.clone(),
                        row,
                    }),
                    None => Err(SchemaError::NonNumeric {
                        column: pressure_col.name.clone(),
                        row,
                        value: other.to_string(),
                    }),
                },
            })
            .collect::<Result<Vec<f64>, _>>()?;

        check_time_column(&columns[time_idx])?;

        Ok(PressureDataset {
            columns,
            time_idx,
            pressure_idx,
            pressure,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.pressure.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn time(&self) -> &[CellValue] {
        &self.columns[self.time_idx].values
    }

    pub fn pressure(&self) -> &[f64] {
        &self.pressure
    }

    pub fn pressure_column_name(&self) -> &str {
        &self.columns[self.pressure_idx].name
    }
}

fn check_time_column(col: &Column) -> Result<(), SchemaError> {
    let mut previous: Option<f64> = None;
    for (row, cell) in col.values.iter().enumerate() {
        if cell.is_null() {
            return Err(SchemaError::MissingValue {
                column: col.name.clone(),
                row,
            });
        }
        // Text timestamps are taken in file order.
        if let Some(t) = cell.as_f64() {
            if !t.is_finite() {
                return Err(SchemaError::MissingValue {
                    column: col.name.clone(),
                    row,
                });
            }
            if previous.is_some_and(|p| t < p) {
                return Err(SchemaError::NotMonotonic {
                    column: col.name.clone(),
                    row,
                });
            }
            previous = Some(t);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) fn dataset_from_series(time: &[f64], p2: &[f64]) -> PressureDataset {
    let columns = vec![
        Column::new("Time", time.iter().map(|&t| CellValue::Float(t)).collect()),
        Column::new("P2", p2.iter().map(|&p| CellValue::Float(p)).collect()),
    ];
    PressureDataset::from_columns(columns, &Schema::default()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floats(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|&v| CellValue::Float(v)).collect()
    }

    #[test]
    fn accepts_valid_table() {
        let columns = vec![
            Column::new("Time", floats(&[0.0, 1.0, 2.0])),
            Column::new("P1", floats(&[1.0, 2.0, 3.0])),
            Column::new("P2", vec![CellValue::Integer(4), CellValue::Float(5.5), CellValue::Integer(6)]),
        ];
        let ds = PressureDataset::from_columns(columns, &Schema::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.pressure(), &[4.0, 5.5, 6.0]);
        assert_eq!(ds.column_names().collect::<Vec<_>>(), ["Time", "P1", "P2"]);
        assert_eq!(ds.time()[2], CellValue::Float(2.0));
    }

    #[test]
    fn missing_pressure_column_is_reported_by_name() {
        let columns = vec![Column::new("Time", floats(&[0.0]))];
        let err = PressureDataset::from_columns(columns, &Schema::default()).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn("P2".into()));
        assert_eq!(err.to_string(), "required column 'P2' not found");
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let columns = vec![
            Column::new("time", floats(&[0.0])),
            Column::new("P2", floats(&[1.0])),
        ];
        let err = PressureDataset::from_columns(columns, &Schema::default()).unwrap_err();
        assert_eq!(err, SchemaError::MissingColumn("Time".into()));
    }

    #[test]
    fn rejects_non_numeric_pressure() {
        let columns = vec![
            Column::new("Time", floats(&[0.0, 1.0])),
            Column::new("P2", vec![CellValue::Float(1.0), CellValue::Text("high".into())]),
        ];
        let err = PressureDataset::from_columns(columns, &Schema::default()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::NonNumeric {
                column: "P2".into(),
                row: 1,
                value: "high".into()
            }
        );
    }

    #[test]
    fn rejects_null_and_nan_pressure() {
        let columns = vec![
            Column::new("Time", floats(&[0.0, 1.0])),
            Column::new("P2", vec![CellValue::Null, CellValue::Float(1.0)]),
        ];
        assert!(matches!(
            PressureDataset::from_columns(columns, &Schema::default()),
            Err(SchemaError::MissingValue { row: 0, .. })
        ));

        let columns = vec![
            Column::new("Time", floats(&[0.0, 1.0])),
            Column::new("P2", floats(&[1.0, f64::NAN])),
        ];
        assert!(matches!(
            PressureDataset::from_columns(columns, &Schema::default()),
            Err(SchemaError::MissingValue { row: 1, .. })
        ));
    }

    #[test]
    fn rejects_decreasing_time() {
        let columns = vec![
            Column::new("Time", floats(&[0.0, 2.0, 1.0])),
            Column::new("P2", floats(&[1.0, 1.0, 1.0])),
        ];
        let err = PressureDataset::from_columns(columns, &Schema::default()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::NotMonotonic {
                column: "Time".into(),
                row: 2
            }
        );
    }

    #[test]
    fn rejects_nan_time() {
        // A NaN must not hide the decrease that follows it.
        let columns = vec![
            Column::new("Time", floats(&[0.0, f64::NAN, -5.0])),
            Column::new("P2", floats(&[1.0, 2.0, 3.0])),
        ];
        assert_eq!(
            PressureDataset::from_columns(columns, &Schema::default()).unwrap_err(),
            SchemaError::MissingValue {
                column: "Time".into(),
                row: 1
            }
        );

        let columns = vec![
            Column::new("Time", floats(&[0.0, f64::INFINITY])),
            Column::new("P2", floats(&[1.0, 2.0])),
        ];
        assert!(matches!(
            PressureDataset::from_columns(columns, &Schema::default()),
            Err(SchemaError::MissingValue { row: 1, .. })
        ));
    }

    #[test]
    fn accepts_repeated_and_text_timestamps() {
        let columns = vec![
            Column::new(
                "Time",
                vec![
                    CellValue::Timestamp("2024-01-01 00:00:00".into()),
                    CellValue::Timestamp("2024-01-01 00:00:01".into()),
                ],
            ),
            Column::new("P2", floats(&[1.0, 2.0])),
        ];
        assert!(PressureDataset::from_columns(columns, &Schema::default()).is_ok());

        let columns = vec![
            Column::new("Time", floats(&[0.0, 0.0])),
            Column::new("P2", floats(&[1.0, 2.0])),
        ];
        assert!(PressureDataset::from_columns(columns, &Schema::default()).is_ok());
    }

    #[test]
    fn rejects_empty_and_ragged_tables() {
        let columns = vec![Column::new("Time", vec![]), Column::new("P2", vec![])];
        assert_eq!(
            PressureDataset::from_columns(columns, &Schema::default()).unwrap_err(),
            SchemaError::NoRows
        );

        let columns = vec![
            Column::new("Time", floats(&[0.0, 1.0])),
            Column::new("P2", floats(&[1.0])),
        ];
        assert!(matches!(
            PressureDataset::from_columns(columns, &Schema::default()),
            Err(SchemaError::RaggedColumn { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn custom_schema_names() {
        let schema = Schema {
            time_column: "t".into(),
            pressure_column: "nozzle".into(),
        };
        let columns = vec![
            Column::new("t", floats(&[0.0])),
            Column::new("nozzle", floats(&[3.0])),
        ];
        let ds = PressureDataset::from_columns(columns, &schema).unwrap();
        assert_eq!(ds.pressure_column_name(), "nozzle");
    }

    #[test]
    fn display_keeps_native_form() {
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Float(0.1).to_string(), "0.1");
        assert_eq!(CellValue::Integer(7).to_string(), "7");
        assert_eq!(CellValue::Timestamp("12:00:01".into()).to_string(), "12:00:01");
        assert_eq!(CellValue::Null.to_string(), "");
    }
}
