// src/gui/components/data_table.rs
//
// Draws the live table for the current page. Purely a view.

use eframe::egui::{self, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

const DEFAULT_WIDTH: f32 = 140.0;
const ROW_HEIGHT: f32 = 18.0;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let page = app.current_page();
    let kind = page.kind();

    let headers: Vec<String> = app
        .current_dataset()
        .and_then(|ds| ds.headers.clone())
        .unwrap_or_else(|| page.default_headers().iter().map(|s| s!(*s)).collect());
    let rows_ix: Vec<usize> = app
        .current_dataset()
        .map(|ds| page.visible_rows(&app.state, ds))
        .unwrap_or_default();
    let empty = Vec::new();
    let rows = app.current_dataset().map(|ds| &ds.rows).unwrap_or(&empty);
    let widths = page.preferred_column_widths().unwrap_or(&[]);

    // Reserve space for the scroll bars instead of floating over content
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    let avail_h = ui.available_height();
    egui::ScrollArea::horizontal()
        .id_salt("inner_table_hscroll")
        .max_height(avail_h)
        .show(ui, |ui| {
            let mut table = TableBuilder::new(ui)
                .id_salt(("table_state", kind))
                .striped(true)
                .min_scrolled_height(0.0)
                .max_scroll_height(avail_h);
            for ci in 0..headers.len() {
                let w = widths.get(ci).copied().unwrap_or(DEFAULT_WIDTH);
                table = table.column(Column::initial(w).resizable(true).clip(true).at_least(30.0));
            }

            table
                .header(24.0, |mut header| {
                    for h in &headers {
                        header.col(|ui| {
                            ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                            ui.label(RichText::new(h).strong());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, rows_ix.len(), |mut row| {
                        let Some(cells) = rows_ix.get(row.index()).and_then(|&ix| rows.get(ix)) else {
                            return;
                        };
                        for ci in 0..headers.len() {
                            row.col(|ui| {
                                let text = cells.get(ci).map(String::as_str).unwrap_or("");
                                ui.label(text).on_hover_text(text);
                            });
                        }
                    });
                });
        });
}
