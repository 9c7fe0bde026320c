// src/gui/actions/copy.rs
use eframe::egui;

use crate::{csv::to_export_string, file::to_json_string, gui::app::App};

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    let Some(view) = super::current_view(app) else {
        app.status("Nothing to copy (no data yet)");
        logd!("Copy: Clicked, but there's no cached dataset");
        return;
    };
    if view.rows.is_empty() {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but there's nothing to copy");
        return;
    }

    let export = &app.state.options.export;
    let txt = match export.format.delimiter() {
        Some(sep) => to_export_string(&view.headers, &view.rows, export.include_headers, export.fill_na, sep),
        None => match to_json_string(&view.headers, &view.rows, export.fill_na) {
            Ok(t) => t,
            Err(e) => {
                loge!("Copy: JSON failed: {}", e);
                return app.status(format!("Copy error: {e}"));
            }
        },
    };
    logf!("Copy: page={:?}, rows={}", app.current_page_kind(), view.row_count());

    ui_ctx.copy_text(txt);
    app.status("Copied to clipboard");
}
