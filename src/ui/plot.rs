use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, VLine};

use crate::data::selection::Selection;
use crate::data::summary::ColumnSummary;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Pressure chart (central panel)
// ---------------------------------------------------------------------------

/// Line chart of every numeric column over the selected rows.
pub fn pressure_plot(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let selection = Selection::new(dataset, state.selection);
    if selection.is_empty() {
        ui.label("Selection is empty; move the sliders so that start is below end.");
        return;
    }

    let crossings = match &state.metrics {
        Some(Ok(m)) => Some((m.t90_row, m.t10_row)),
        _ => None,
    };

    Plot::new("pressure_plot")
        .height(340.0)
        .legend(Legend::default())
        .x_axis_label("Row")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (idx, (name, summary)) in state.summaries.iter().enumerate() {
                if !matches!(summary, ColumnSummary::Numeric(_)) {
                    continue;
                }

                let points: PlotPoints = selection
                    .column(idx)
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| {
                        let y = v.as_f64()?;
                        Some([(selection.offset() + i) as f64, y])
                    })
                    .collect();

                let highlighted = state.series_colors.is_highlighted(idx);
                let line = Line::new(points)
                    .name(name)
                    .color(state.series_colors.color_for(idx))
                    .width(if highlighted { 2.5 } else { 1.2 });

                plot_ui.line(line);
            }

            if let Some((t90_row, t10_row)) = crossings {
                plot_ui.vline(
                    VLine::new(t90_row as f64)
                        .name("T90")
                        .color(Color32::LIGHT_GREEN),
                );
                plot_ui.vline(
                    VLine::new(t10_row as f64)
                        .name("T10")
                        .color(Color32::LIGHT_RED),
                );
            }
        });
}
