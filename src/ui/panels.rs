use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::metrics::FallScan;
use crate::data::selection::SelectionRange;
use crate::export::OverwritePolicy;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection, analysis options, saving
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(ds) = &state.dataset else {
        ui.heading("Region Selection");
        ui.separator();
        ui.label("No dataset loaded.");
        return;
    };
    let max = ds.len() - 1;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Slider pair ----
            ui.heading("Region Selection");
            ui.separator();
            let mut range = state.selection;
            ui.add(egui::Slider::new(&mut range.start, 0..=max).text("Start index"));
            ui.add(egui::Slider::new(&mut range.end, 0..=max).text("End index"));
            if range.is_empty() {
                ui.label(RichText::new("Start must be below end.").color(Color32::YELLOW));
            } else {
                ui.label(format!("{} rows selected", range.len()));
            }
            if ui.small_button("Reset").clicked() {
                range = SelectionRange::full(max + 1);
            }
            state.set_selection(range);

            ui.add_space(8.0);
            analysis_options(ui, state);

            ui.add_space(8.0);
            save_controls(ui, state);
        });
}

fn analysis_options(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Analysis");
    ui.separator();

    let current = state.settings.metrics.fall_scan;
    let mut chosen = current;
    ui.strong("T10 search starts");
    egui::ComboBox::from_id_salt("fall_scan")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for scan in [FallScan::FromStart, FallScan::AfterPeak] {
                ui.selectable_value(&mut chosen, scan, scan.label());
            }
        });
    if chosen != current {
        log::info!("T10 scan mode changed to {chosen:?}");
        state.settings.metrics.fall_scan = chosen;
        state.recompute();
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Pressure unit");
        ui.add(egui::TextEdit::singleline(&mut state.settings.pressure_unit).desired_width(60.0));
    });
}

fn save_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Save");
    ui.separator();

    let mut save_original = state.save_original;
    if ui.checkbox(&mut save_original, "Save Original Data").changed() {
        state.set_save_original(save_original);
    }
    let mut save_results = state.save_results;
    if ui.checkbox(&mut save_results, "Save Analysis Results").changed() {
        state.set_save_results(save_results);
    }

    ui.add_space(4.0);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Folder:");
        ui.label(state.settings.output_dir.display().to_string());
        if ui.small_button("Browse…").clicked() {
            if let Some(dir) = rfd::FileDialog::new()
                .set_title("Output folder")
                .set_directory(&state.settings.output_dir)
                .pick_folder()
            {
                state.settings.output_dir = dir;
            }
        }
    });

    egui::ComboBox::from_id_salt("overwrite_policy")
        .selected_text(state.settings.overwrite.label())
        .show_ui(ui, |ui: &mut Ui| {
            for policy in OverwritePolicy::ALL {
                ui.selectable_value(&mut state.settings.overwrite, policy, policy.label());
            }
        });

    if let Some(msg) = &state.save_message {
        ui.label(RichText::new(msg).color(Color32::LIGHT_GREEN));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open analysis results…").clicked() {
                open_results_dialog(state);
                ui.close_menu();
            }
            if ui.button("Save settings").clicked() {
                save_settings(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} selected",
                ds.len(),
                state.selection.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open pressure data")
        .add_filter("Supported files", &["csv", "xlsx", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

fn open_results_dialog(state: &mut AppState) {
    if let Some(path) = rfd::FileDialog::new()
        .set_title("Open analysis results")
        .set_directory(&state.settings.output_dir)
        .add_filter("CSV", &["csv"])
        .pick_file()
    {
        state.open_results(&path);
    }
}

fn save_settings(state: &mut AppState) {
    let path = crate::config::Settings::config_path();
    if let Err(e) = state.settings.save(&path) {
        log::error!("Failed to save settings: {e:#}");
        state.status_message = Some(format!("Error: {e:#}"));
    }
}
