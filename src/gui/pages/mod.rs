// src/gui/pages/mod.rs
use eframe::egui;

use crate::{
    config::{options::PageKind, state::AppState},
    store::DataSet,
};

pub mod companies;
pub mod emails;
pub mod enriched;

/// One tab. Pages never scrape on their own; they only shape how their
/// cached dataset is shown and exported.
pub trait Page: Send + Sync + 'static {
    fn title(&self) -> &'static str;
    fn kind(&self) -> PageKind;

    /// Headers shown before anything has been scraped.
    fn default_headers(&self) -> &'static [&'static str];

    /// Per-column widths in px; missing entries fall back to the table default.
    fn preferred_column_widths(&self) -> Option<&'static [f32]> { None }

    /// Page-specific controls in the export bar. Returns true when a change
    /// needs the dataset rebuilt (e.g. a new cluster count).
    fn draw_controls(&self, _ui: &mut egui::Ui, _state: &mut AppState) -> bool { false }

    /// Only the Companies table has an Email column worth splitting on.
    fn split_allowed(&self) -> bool { false }

    /// Reject cache files written by an older column layout.
    fn validate_cache(&self, ds: &DataSet) -> bool {
        match &ds.headers {
            Some(h) => h.iter().map(String::as_str).eq(self.default_headers().iter().copied()),
            None => false,
        }
    }

    /// Indices of the rows to show (and export). Default: all of them.
    fn visible_rows(&self, _state: &AppState, ds: &DataSet) -> Vec<usize> {
        (0..ds.rows.len()).collect()
    }

    /// Headers + visible rows, cloned for export/copy.
    fn view_for_export(&self, state: &AppState, ds: &DataSet) -> DataSet {
        let rows = self
            .visible_rows(state, ds)
            .into_iter()
            .filter_map(|ix| ds.rows.get(ix).cloned())
            .collect();
        DataSet { headers: ds.headers.clone(), rows }
    }
}
