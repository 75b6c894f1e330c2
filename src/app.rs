use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, report};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct PressureApp {
    pub state: AppState,
}

impl PressureApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Files dropped onto the window are opened like File → Open….
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<_> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if let Some(path) = dropped.last() {
            self.state.open_path(path);
        }
    }
}

impl eframe::App for PressureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: sliders and save toggles ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables, chart, metrics ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a pressure data file  (File → Open… or drop it here)");
                });
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                egui::CollapsingHeader::new("Data Distribution")
                    .default_open(true)
                    .show(ui, |ui| report::summary_table(ui, &self.state));

                ui.heading("Columns in the Dataset");
                report::column_list(ui, &self.state);
                ui.separator();

                ui.heading("Pressure Data Visualization");
                plot::pressure_plot(ui, &self.state);
                ui.separator();

                ui.heading("Calculated Metrics");
                report::metrics(ui, &self.state);
            });
        });

        let pointer_down = ctx.input(|i| i.pointer.any_down());
        self.state.flush_saves(pointer_down);
    }
}
