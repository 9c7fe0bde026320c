// src/gui/pages/emails.rs
use eframe::egui;

use crate::{
    config::{options::PageKind, state::AppState},
    model::EMAIL_COLUMNS,
    store::DataSet,
};

pub struct EmailsPage;
pub static PAGE: EmailsPage = EmailsPage;

impl super::Page for EmailsPage {
    fn title(&self) -> &'static str { "Emails" }
    fn kind(&self) -> PageKind { PageKind::Emails }

    fn default_headers(&self) -> &'static [&'static str] { &EMAIL_COLUMNS }

    fn preferred_column_widths(&self) -> Option<&'static [f32]> {
        Some(&[240.0, 200.0, 90.0, 300.0])
    }

    fn draw_controls(&self, ui: &mut egui::Ui, state: &mut AppState) -> bool {
        let before = state.gui.hide_role_addresses;
        ui.checkbox(&mut state.gui.hide_role_addresses, "Hide role addresses (info@, sales@, …)");
        if before != state.gui.hide_role_addresses {
            logf!("UI: hide_role_addresses → {}", state.gui.hide_role_addresses);
        }
        false
    }

    fn visible_rows(&self, state: &AppState, ds: &DataSet) -> Vec<usize> {
        let role_col = ds.column("Role Address");
        ds.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| {
                !state.gui.hide_role_addresses
                    || role_col.and_then(|c| r.get(c)).is_none_or(|v| v != "yes")
            })
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::pages::Page;

    #[test]
    fn hides_role_rows_when_asked() {
        let ds = DataSet {
            headers: Some(EMAIL_COLUMNS.iter().map(|s| s!(*s)).collect()),
            rows: vec![
                strings!["info@a.de", "A", "yes", "u"],
                strings!["jane@a.de", "A", "no", "u"],
            ],
        };
        let mut state = AppState::default();
        assert_eq!(PAGE.visible_rows(&state, &ds), vec![0, 1]);
        state.gui.hide_role_addresses = true;
        assert_eq!(PAGE.visible_rows(&state, &ds), vec![1]);
        assert_eq!(PAGE.view_for_export(&state, &ds).rows[0][0], "jane@a.de");
    }
}
