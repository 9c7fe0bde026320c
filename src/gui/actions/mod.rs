// src/gui/actions/mod.rs
//
// Folder module facade: re-export public entrypoints.
// Submodules stay private; consumers only see actions::{copy,export,scrape}.

mod copy;    // src/gui/actions/copy.rs
mod export;  // src/gui/actions/export.rs
mod scrape;  // src/gui/actions/scrape.rs

pub use copy::copy;
pub use export::export;
pub use scrape::{scrape, ScrapeOutcome, ScrapeResult};

use crate::{gui::app::App, store::DataSet};

/// Current page's rows as shown (filters applied), ready for export.
pub(super) fn current_view(app: &App) -> Option<DataSet> {
    let page = app.current_page();
    app.current_dataset().map(|ds| page.view_for_export(&app.state, ds))
}
