// src/scrape/directory.rs
//
// Directory sources: search pages → profile links → company records.

use std::{
    collections::HashMap,
    path::Path,
    sync::{mpsc, atomic::{AtomicUsize, Ordering}},
    thread,
    time::Duration,
};

use url::Url;

use crate::{
    config::{consts::AUTOSAVE_EVERY, options::ScrapeOptions},
    core::net::{get_with_retry, Fetch},
    model::{Company, Source},
    progress::Progress,
    specs::{europages, exportbureau, SearchPage},
    store::{self, CrawlState},
};

pub(crate) fn retry_pause(opts: &ScrapeOptions) -> Duration {
    Duration::from_millis(opts.retry_pause_ms)
}

/// Pause after request `i`: base pause plus a deterministic jitter.
pub(crate) fn polite_pause(opts: &ScrapeOptions, i: usize) -> Duration {
    let jitter = if opts.jitter_ms == 0 { 0 } else { (i as u64 * 37) % opts.jitter_ms };
    Duration::from_millis(opts.pause_ms + jitter)
}

fn autosave(save_to: Option<&Path>, state: &CrawlState) {
    if let Some(path) = save_to {
        if let Err(e) = store::save_state(path, state) {
            loge!("Autosave to {} failed: {e}", path.display());
        }
    }
}

fn fetch_search(fetch: &dyn Fetch, opts: &ScrapeOptions, url: &str) -> Result<SearchPage, String> {
    let parsed = Url::parse(url).map_err(|e| format!("Bad search URL {url}: {e}"))?;
    let body = get_with_retry(fetch, &parsed, opts.retries, retry_pause(opts)).map_err(|e| e.to_string())?;
    Ok(match opts.source {
        Source::ExportBureau => exportbureau::parse_search(&body),
        _ => europages::parse_search(&body),
    })
}

/// Walk search result pages and append profile links to `state`.
/// Returns the number of new links. A failing page ends the walk.
pub fn collect_links(
    fetch: &dyn Fetch,
    opts: &ScrapeOptions,
    state: &mut CrawlState,
    save_to: Option<&Path>,
    mut progress: Option<&mut dyn Progress>,
) -> usize {
    let before = state.links.len();
    if state.exhausted {
        logd!("Search results for '{}' already exhausted", opts.query);
        return 0;
    }
    match opts.source {
        Source::Europages => {
            for page in 1..=opts.max_pages {
                let url = europages::search_url(&opts.query, page);
                if state.is_page_done(&url) {
                    logd!("Search page {page} already done, skipping");
                    continue;
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Search page {page}/{}", opts.max_pages));
                }
                let found = match fetch_search(fetch, opts, &url) {
                    Ok(found) => found,
                    Err(e) => {
                        loge!("Search page {page}: {e}");
                        break;
                    }
                };
                let n = state.add_links(found.links.iter().cloned());
                state.mark_page(&url);
                state.exhausted = found.links.is_empty() || !found.has_next;
                autosave(save_to, state);
                logf!("Search page {page}: {} links ({n} new)", found.links.len());

                if state.exhausted {
                    break;
                }
                thread::sleep(polite_pause(opts, page as usize));
            }
        }
        Source::ExportBureau => {
            let mut url = state
                .next_page
                .clone()
                .unwrap_or_else(|| exportbureau::search_url(&opts.query));
            for page in 1..=opts.max_pages {
                if state.is_page_done(&url) {
                    logd!("Search chain already walked to {url}");
                    break;
                }
                if let Some(p) = progress.as_deref_mut() {
                    p.log(&format!("Search page {page}/{}", opts.max_pages));
                }
                let found = match fetch_search(fetch, opts, &url) {
                    Ok(found) => found,
                    Err(e) => {
                        loge!("Search page {url}: {e}");
                        break;
                    }
                };
                let n = state.add_links(found.links.iter().cloned());
                state.mark_page(&url);
                state.next_page = found.next_url.clone();
                state.exhausted = found.links.is_empty() || found.next_url.is_none();
                autosave(save_to, state);
                logf!("Search page {url}: {} links ({n} new)", found.links.len());

                match found.next_url {
                    Some(next) if !found.links.is_empty() => url = next,
                    _ => break,
                }
                thread::sleep(polite_pause(opts, page as usize));
            }
        }
        Source::Website => {}
    }
    state.links.len() - before
}

fn fetch_company(fetch: &dyn Fetch, opts: &ScrapeOptions, link: &str) -> Result<Company, String> {
    let url = Url::parse(link).map_err(|e| format!("Bad profile URL: {e}"))?;
    let body = get_with_retry(fetch, &url, opts.retries, retry_pause(opts)).map_err(|e| e.to_string())?;
    Ok(match opts.source {
        Source::ExportBureau => exportbureau::parse_company(&body, link),
        _ => europages::parse_company(&body, link),
    })
}

/// Fetch every pending profile on a small worker pool.
/// Returns how many companies were added. Failures are reported, not fatal.
pub fn collect_companies(
    fetch: &dyn Fetch,
    opts: &ScrapeOptions,
    state: &mut CrawlState,
    save_to: Option<&Path>,
    mut progress: Option<&mut dyn Progress>,
) -> usize {
    let pending = state.pending_links();
    if pending.is_empty() {
        return 0;
    }
    if let Some(p) = progress.as_deref_mut() {
        p.begin(pending.len());
    }

    let first_new = state.companies.len();
    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<(usize, Result<Company, String>)>();
    let workers = opts.workers.min(pending.len()).max(1);
    logf!("Profiles: {} pending, {workers} worker(s)", pending.len());

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let pending = &pending;
            let counter = &counter;
            scope.spawn(move || loop {
                let i = counter.fetch_add(1, Ordering::Relaxed);
                if i >= pending.len() {
                    break;
                }
                let result = fetch_company(fetch, opts, &pending[i]);
                if tx.send((i, result)).is_err() {
                    break;
                }
                thread::sleep(polite_pause(opts, i)); // be polite
            });
        }
        drop(res_tx); // collector is the sole receiver now

        let mut since_save = 0;
        for (i, result) in res_rx {
            match result {
                Ok(company) => {
                    let label = if company.name.is_empty() { pending[i].clone() } else { company.name.clone() };
                    state.upsert_company(company);
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(i, &label);
                    }
                    since_save += 1;
                    if since_save >= AUTOSAVE_EVERY {
                        autosave(save_to, state);
                        since_save = 0;
                    }
                }
                Err(msg) => {
                    loge!("Profile {}: {msg}", pending[i]);
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(i, &pending[i]);
                    }
                }
            }
        }
    });

    // Arrival order → link order for this run's additions.
    let order: HashMap<&str, usize> = pending.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect();
    state.companies[first_new..].sort_by_key(|c| order.get(c.profile_url.as_str()).copied().unwrap_or(usize::MAX));

    autosave(save_to, state);
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    state.companies.len() - first_new
}
