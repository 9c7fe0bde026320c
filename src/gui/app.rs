// src/gui/app.rs
use std::{
    collections::HashMap,
    error::Error,
    path::Path,
    sync::{mpsc::Receiver, Arc, Mutex},
    time::Duration,
};

use eframe::egui;

use crate::{
    config::{
        consts::SETTINGS_FILE,
        options::PageKind,
        settings,
        state::AppState,
    },
    enrich::enrich_dataset,
    model::Company,
    store::{self, DataSet},
};

use super::{actions::ScrapeOutcome, pages::Page, router};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "Contact Scraper",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // canonical per-page data (mirrors .store/<kind>.csv)
    pub datasets: HashMap<PageKind, DataSet>,

    // status/progress (the scrape thread writes here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub(super) pending: Option<Receiver<ScrapeOutcome>>,
}

impl App {
    pub fn new(mut state: AppState) -> Self {
        match settings::load(Path::new(SETTINGS_FILE)) {
            Ok(cfg) => cfg.apply(&mut state.options),
            Err(e) => logw!("Settings: {SETTINGS_FILE} unreadable ({e}), using defaults"),
        }
        state.gui.query_text = state.options.scrape.query.clone();
        state.gui.url_text = state.options.scrape.start_url.clone();

        let mut status = s!("Idle");
        let out_path_text = state.options.export.out_path().to_string_lossy().into();

        let mut datasets: HashMap<PageKind, DataSet> = HashMap::new();
        for p in router::all_pages() {
            let k = p.kind();
            match store::load_dataset(&k) {
                Ok(ds) if ds.rows.is_empty() => logd!("Cache: {:?} is empty, skipping", k),
                Ok(ds) if p.validate_cache(&ds) => {
                    logf!("Cache: Loaded {:?} (rows={}, headers={})", k, ds.row_count(), ds.header_count());
                    datasets.insert(k, ds);
                    status = s!("Loaded local data");
                }
                Ok(_) => loge!("Cache: Invalid shape for {:?}, ignoring", k),
                Err(e) => logd!("Cache: Missing {:?} ({})", k, e),
            }
        }

        logf!("Init: {} cached dataset(s), source={}", datasets.len(), state.options.scrape.source.label());

        Self {
            state,
            out_path_text,
            out_path_dirty: false,
            datasets,
            status: Arc::new(Mutex::new(status)),
            running: false,
            pending: None,
        }
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn current_index(&self) -> usize { self.state.gui.current_page_index }

    #[inline]
    pub fn set_current_index(&mut self, idx: usize) {
        self.state.gui.current_page_index = idx.min(router::all_pages().len() - 1);
    }

    #[inline]
    pub fn current_page(&self) -> &'static dyn Page {
        let pages = router::all_pages();
        pages[self.current_index().min(pages.len() - 1)]
    }

    #[inline]
    pub fn current_page_kind(&self) -> PageKind { self.current_page().kind() }

    #[inline]
    pub fn current_dataset(&self) -> Option<&DataSet> {
        self.datasets.get(&self.current_page_kind())
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        *self.status.lock().unwrap_or_else(|p| p.into_inner()) = msg.into();
    }

    pub fn status_text(&self) -> String {
        self.status.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Replace one page's data in memory and in the store cache.
    pub fn put_dataset(&mut self, kind: PageKind, ds: DataSet) {
        match store::save_dataset(&kind, &ds) {
            Ok(p) => logf!("Cache: Saved {:?} → {}", kind, p.display()),
            Err(e) => loge!("Cache: Save failed {:?}: {}", kind, e),
        }
        self.datasets.insert(kind, ds);
    }

    /// Rebuild the Enriched table from the cached Companies table.
    pub fn recluster(&mut self) {
        let Some(ds) = self.datasets.get(&PageKind::Companies) else {
            self.status("Nothing to cluster yet");
            return;
        };
        let source = self.state.options.scrape.source;
        let companies: Vec<Company> = ds
            .rows
            .iter()
            .filter_map(|r| Company::from_row(r, source))
            .collect();
        let enriched = enrich_dataset(&companies, self.state.gui.clusters);
        self.put_dataset(PageKind::Enriched, enriched);
        self.status(format!("Clustered {} record(s) into {} group(s)", companies.len(), self.state.gui.clusters));
    }

    /// Apply a finished background scrape.
    fn receive(&mut self, outcome: ScrapeOutcome) {
        self.running = false;
        self.pending = None;

        match outcome {
            Ok(result) => {
                let n = result.companies.len();
                let emails = result.emails.row_count();
                self.put_dataset(PageKind::Companies, crate::model::companies_dataset(&result.companies));
                self.put_dataset(PageKind::Emails, result.emails);
                self.put_dataset(PageKind::Enriched, enrich_dataset(&result.companies, self.state.gui.clusters));

                let export = &mut self.state.options.export;
                if !self.out_path_dirty {
                    export.set_stem(&result.stem);
                    self.out_path_text = export.out_path().to_string_lossy().into_owned();
                }

                logf!("Scrape: OK companies={n} emails={emails}");
                self.status(format!("Ready: {n} company record(s), {emails} email(s)"));
            }
            Err(e) => {
                loge!("Scrape: Error: {}", e);
                self.status(format!("Error: {e}"));
            }
        }
    }

    fn poll_scrape(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.pending else { return };
        match rx.try_recv() {
            Ok(outcome) => self.receive(outcome),
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                ctx.request_repaint_after(Duration::from_millis(100));
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                loge!("Scrape: worker thread ended without a result");
                self.running = false;
                self.pending = None;
                self.status("Error: scrape thread stopped unexpectedly");
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_scrape(ctx);

        egui::SidePanel::left("query")
            .resizable(false)
            .min_width(220.0)
            .show(ctx, |ui| {
                crate::gui::components::query_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::tabs::draw(ui, self);

            ui.separator();

            crate::gui::components::export_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::data_table::draw(ui, self);
        });
    }
}
