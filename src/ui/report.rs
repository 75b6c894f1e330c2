use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::summary::ColumnSummary;
use crate::state::AppState;

const SUMMARY_HEADERS: [&str; 12] = [
    "", "count", "mean", "std", "min", "25%", "50%", "75%", "max", "unique", "top", "freq",
];

// ---------------------------------------------------------------------------
// Data distribution table
// ---------------------------------------------------------------------------

/// Summary statistics, one row per dataset column.
pub fn summary_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .columns(Column::auto().at_least(48.0), SUMMARY_HEADERS.len())
        .header(20.0, |mut header| {
            for title in SUMMARY_HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for (name, summary) in &state.summaries {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        ui.strong(name);
                    });
                    for cell in summary_cells(summary) {
                        row.col(|ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

fn summary_cells(summary: &ColumnSummary) -> [String; 11] {
    let num = |v: f64| if v.is_nan() { "NaN".to_string() } else { format!("{v:.4}") };
    match summary {
        ColumnSummary::Numeric(s) => [
            s.count.to_string(),
            num(s.mean),
            num(s.std),
            num(s.min),
            num(s.q25),
            num(s.median),
            num(s.q75),
            num(s.max),
            String::new(),
            String::new(),
            String::new(),
        ],
        ColumnSummary::Categorical(s) => {
            let mut cells: [String; 11] = Default::default();
            cells[0] = s.count.to_string();
            cells[8] = s.unique.to_string();
            cells[9] = s.top.clone().unwrap_or_default();
            cells[10] = s.freq.to_string();
            cells
        }
    }
}

// ---------------------------------------------------------------------------
// Column list / metrics
// ---------------------------------------------------------------------------

pub fn column_list(ui: &mut Ui, state: &AppState) {
    let Some(ds) = &state.dataset else {
        return;
    };
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for name in ds.column_names() {
            ui.monospace(name);
        }
    });
}

/// The six metric lines, or why they are unavailable.
pub fn metrics(ui: &mut Ui, state: &AppState) {
    match &state.metrics {
        Some(Ok(m)) => {
            for line in m.display_lines(&state.settings.pressure_unit) {
                ui.label(line);
            }
        }
        Some(Err(e)) => {
            ui.label(RichText::new(format!("Metrics unavailable: {e}")).color(Color32::RED));
        }
        None => {}
    }

    if let Some((path, pairs)) = &state.loaded_results {
        ui.add_space(8.0);
        egui::CollapsingHeader::new(format!("Saved results: {}", path.display()))
            .default_open(true)
            .show(ui, |ui: &mut Ui| {
                egui::Grid::new("loaded_results").striped(true).show(ui, |ui: &mut Ui| {
                    for (name, value) in pairs {
                        ui.label(name);
                        ui.monospace(value);
                        ui.end_row();
                    }
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::summary::{CategoricalSummary, NumericSummary};

    #[test]
    fn numeric_cells_are_formatted() {
        let cells = summary_cells(&ColumnSummary::Numeric(NumericSummary::compute(&[1.0])));
        assert_eq!(cells[0], "1");
        assert_eq!(cells[1], "1.0000");
        assert_eq!(cells[2], "NaN");
        assert!(cells[8].is_empty());
    }

    #[test]
    fn categorical_cells_fill_frequency_columns() {
        let cells = summary_cells(&ColumnSummary::Categorical(CategoricalSummary {
            count: 4,
            unique: 2,
            top: Some("open".into()),
            freq: 3,
        }));
        assert_eq!(cells[0], "4");
        assert!(cells[1].is_empty());
        assert_eq!(&cells[8..], ["2", "open", "3"]);
    }
}
