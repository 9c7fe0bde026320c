// src/gui/actions/scrape.rs
use std::{error::Error, sync::mpsc, thread};

use crate::{
    config::options::ScrapeOptions,
    core::net::HttpClient,
    file::default_stem,
    gui::{app::App, progress::GuiProgress},
    model::{emails_dataset, Company, Source},
    progress::Progress,
    scrape,
    store::DataSet,
};

pub struct ScrapeResult {
    pub companies: Vec<Company>,
    pub emails: DataSet,
    /// Default export file stem for this run.
    pub stem: String,
}

/// `Box<dyn Error>` is not `Send`, so errors cross the channel as text.
pub type ScrapeOutcome = Result<ScrapeResult, String>;

fn run_scrape(opts: &ScrapeOptions, progress: &mut dyn Progress) -> Result<ScrapeResult, Box<dyn Error>> {
    let client = HttpClient::new(opts)?;
    let stem = default_stem(opts.source, &opts.query_key());

    if opts.source == Source::Website {
        let (company, emails) = scrape::scrape_website(&client, opts, Some(progress))?;
        return Ok(ScrapeResult { companies: vec![company], emails, stem });
    }

    let companies = scrape::scrape_companies(&client, opts, Some(progress))?;
    let emails = emails_dataset(&companies);
    Ok(ScrapeResult { companies, emails, stem })
}

/// Copy the text fields into the options and start a background scrape.
/// The result is picked up by `App` on a later frame.
pub fn scrape(app: &mut App) {
    if app.running {
        logd!("Scrape: already running, ignoring click");
        return;
    }

    let sc = &mut app.state.options.scrape;
    sc.query = app.state.gui.query_text.trim().to_string();
    sc.start_url = app.state.gui.url_text.trim().to_string();

    if let Err(e) = sc.validate() {
        logw!("Scrape: invalid input: {e}");
        app.status(e);
        return;
    }

    let opts = sc.clone();
    logf!(
        "Scrape: Begin source={} query='{}' pages={} follow_websites={}",
        opts.source.label(),
        if opts.source == Source::Website { &opts.start_url } else { &opts.query },
        opts.max_pages,
        opts.follow_websites
    );

    let (tx, rx) = mpsc::channel::<ScrapeOutcome>();
    let status = app.status.clone();
    app.status("Starting…");
    app.running = true;
    app.pending = Some(rx);

    thread::spawn(move || {
        let mut prog = GuiProgress::new(status);
        let outcome = run_scrape(&opts, &mut prog).map_err(|e| e.to_string());
        if tx.send(outcome).is_err() {
            logw!("Scrape: window closed before the result arrived");
        }
    });
}
