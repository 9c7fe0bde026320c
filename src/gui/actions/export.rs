// src/gui/actions/export.rs
use crate::{config::options::ExportType, file, gui::app::App};

pub fn export(app: &mut App) {
    // normalize out_path first (mutates app) before any &app borrows
    if app.out_path_dirty {
        app.state.options.export.set_path(&app.out_path_text);
        logf!("Export: Out path set → {}", app.state.options.export.out_path().display());
        app.out_path_dirty = false;
    }

    let Some(view) = super::current_view(app) else {
        logd!("Export: Clicked, but there's no cached dataset");
        return app.status("Nothing to export (no data yet)");
    };
    if view.rows.is_empty() {
        logd!("Export: Clicked, but there's nothing to export");
        return app.status("Nothing to export");
    }

    let page = app.current_page();
    let mut export = app.state.options.export.clone();
    if !page.split_allowed() {
        export.export_type = ExportType::SingleFile;
    }

    logf!(
        "Export: Begin page={:?}, rows={}, headers={}, type={:?}",
        page.kind(),
        view.row_count(),
        view.header_count(),
        export.export_type
    );

    let msg = match file::export_dataset(&export, &view.headers, &view.rows) {
        Ok(paths) => match paths.last() {
            Some(last) => {
                logf!("Export: OK count={} last={}", paths.len(), last.display());
                format!("Exported {} file(s). Last: {}", paths.len(), last.display())
            }
            None => s!("Export done"),
        },
        Err(e) => {
            loge!("Export: Error: {}", e);
            format!("Export error: {e}")
        }
    };
    app.status(msg);
}
