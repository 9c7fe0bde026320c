// src/gui/components/export_bar.rs

use eframe::egui;
use crate::{
    config::options::{ExportFormat, ExportType},
    gui::{actions, app::App},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let page = app.current_page();

    {
        let export = &mut app.state.options.export;

        // --- Format + Include headers ---
        let prev_fmt = export.format;
        ui.horizontal(|ui| {
            ui.label("Format:");
            ui.selectable_value(&mut export.format, ExportFormat::Csv, "CSV");
            ui.selectable_value(&mut export.format, ExportFormat::Tsv, "TSV");
            ui.selectable_value(&mut export.format, ExportFormat::Json, "JSON");
        });
        if export.format != prev_fmt {
            logf!("UI: Export format → {:?}", export.format);
            if !app.out_path_dirty {
                app.out_path_text = export.out_path().to_string_lossy().into_owned();
            }
        }

        ui.horizontal(|ui| {
            let before_headers = export.include_headers;
            ui.add_enabled(
                export.format != ExportFormat::Json,
                egui::Checkbox::new(&mut export.include_headers, "Include headers"),
            );
            if export.include_headers != before_headers {
                logf!("UI: Include_headers → {}", export.include_headers);
            }
            ui.checkbox(&mut export.fill_na, "N/A for empty cells");
        });
    }

    // --- Page-specific controls ---
    if page.draw_controls(ui, &mut app.state) {
        app.recluster();
    }

    // --- Split toggle + Output field ---
    ui.horizontal(|ui| {
        let export = &mut app.state.options.export;
        if page.split_allowed() {
            let mut split = export.export_type == ExportType::SplitByEmail;
            if ui.checkbox(&mut split, "Split by email").changed() {
                export.export_type = if split { ExportType::SplitByEmail } else { ExportType::SingleFile };
                logf!("UI: export_type → {:?}", export.export_type);
            }
        }

        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text).font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_path_dirty = true;
            logd!("UI: out_path_text changed (dirty=true) → {}", app.out_path_text);
        }
    });

    // --- Actions ---
    ui.horizontal(|ui| {
        if ui.button("Copy").clicked() {
            actions::copy(app, ui.ctx());
        }
        if ui.button("Export").clicked() {
            actions::export(app);
        }
        ui.label(format!("Status: {}", app.status_text()));
    });
}
