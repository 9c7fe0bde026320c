// src/config/state.rs
use super::options::AppOptions;

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Active tab index into router::PAGES
    pub current_page_index: usize,

    /// Text fields mirror options until the user hits Scrape
    pub query_text: String,
    pub url_text: String,

    /// Enriched page -> number of k-means clusters
    pub clusters: usize,

    /// Emails page -> hide rows whose address is a role mailbox (info@, noreply@, ...)
    pub hide_role_addresses: bool,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1100,
            window_h: 700,
            current_page_index: 0,
            query_text: s!(),
            url_text: s!(),
            clusters: crate::config::consts::CLUSTERS,
            hide_role_addresses: false,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AppState {
    pub options: AppOptions,
    pub gui: GuiState,
}
