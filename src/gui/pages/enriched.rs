// src/gui/pages/enriched.rs
use std::sync::OnceLock;

use eframe::egui;

use crate::{
    config::{options::PageKind, state::AppState},
    enrich::ENRICH_COLUMNS,
    model::COMPANY_COLUMNS,
};

pub struct EnrichedPage;
pub static PAGE: EnrichedPage = EnrichedPage;

fn headers() -> &'static [&'static str] {
    static HEADERS: OnceLock<Vec<&'static str>> = OnceLock::new();
    HEADERS.get_or_init(|| COMPANY_COLUMNS.iter().chain(ENRICH_COLUMNS.iter()).copied().collect())
}

impl super::Page for EnrichedPage {
    fn title(&self) -> &'static str { "Enriched" }
    fn kind(&self) -> PageKind { PageKind::Enriched }

    fn default_headers(&self) -> &'static [&'static str] { headers() }

    fn preferred_column_widths(&self) -> Option<&'static [f32]> {
        Some(&[200.0, 220.0, 130.0, 180.0, 200.0, 260.0, 70.0, 90.0, 70.0, 70.0, 70.0, 60.0])
    }

    fn draw_controls(&self, ui: &mut egui::Ui, state: &mut AppState) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            ui.label("Clusters:");
            changed = ui
                .add(egui::DragValue::new(&mut state.gui.clusters).range(1..=12))
                .changed();
        });
        if changed {
            logf!("UI: clusters → {}", state.gui.clusters);
        }
        changed
    }
}
