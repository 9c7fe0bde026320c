// src/scrape/site.rs
//
// Bounded breadth-first crawl of one website, harvesting emails.

use std::{
    collections::{HashSet, VecDeque},
    thread,
};

use url::Url;

use super::directory::{polite_pause, retry_pause};
use crate::{
    config::options::ScrapeOptions,
    core::net::{get_with_retry, Fetch},
    model::Company,
    progress::Progress,
    specs::website,
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteReport {
    /// `(email, page it was first seen on)`, discovery order.
    pub emails: Vec<(String, String)>,
    pub pages_fetched: usize,
    pub pages_failed: usize,
}

impl SiteReport {
    pub fn email_list(&self) -> Vec<String> {
        self.emails.iter().map(|(e, _)| e.clone()).collect()
    }
}

/// BFS from `start`: at most `opts.depth` hops and `opts.max_site_pages`
/// fetches, same site only. Failing pages are logged and skipped.
pub fn crawl_site(
    fetch: &dyn Fetch,
    start: &Url,
    opts: &ScrapeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> SiteReport {
    let max_pages = opts.max_site_pages.max(1);
    let mut report = SiteReport::default();
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut visited: HashSet<String> = HashSet::from([s!(start.as_str())]);
    let mut queue: VecDeque<(Url, u32)> = VecDeque::from([(start.clone(), 0)]);

    while let Some((url, depth)) = queue.pop_front() {
        let attempted = report.pages_fetched + report.pages_failed;
        if attempted >= max_pages {
            logd!("Site page budget ({max_pages}) reached at {url}");
            break;
        }
        if attempted > 0 {
            thread::sleep(polite_pause(opts, attempted));
        }

        let body = match get_with_retry(fetch, &url, opts.retries, retry_pause(opts)) {
            Ok(b) => b,
            Err(e) => {
                loge!("Site page {url}: {e}");
                report.pages_failed += 1;
                continue;
            }
        };
        report.pages_fetched += 1;

        let page = website::parse_page(&body, &url);
        for e in page.emails {
            if seen_emails.insert(e.clone()) {
                report.emails.push((e, s!(url.as_str())));
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("{url}: {} email(s) so far", report.emails.len()));
        }

        if depth < opts.depth {
            for link in page.links {
                if visited.insert(s!(link.as_str())) {
                    queue.push_back((link, depth + 1));
                }
            }
        }
    }

    logf!(
        "Crawl {start}: {} page(s), {} failed, {} email(s)",
        report.pages_fetched,
        report.pages_failed,
        report.emails.len()
    );
    report
}

/// Crawl each company's own website and merge the emails found.
/// With `opts.only_missing`, companies that already have an email are skipped.
/// Returns the number of emails added.
pub fn enrich_with_websites(
    fetch: &dyn Fetch,
    opts: &ScrapeOptions,
    companies: &mut [Company],
    mut progress: Option<&mut dyn Progress>,
) -> usize {
    let targets: Vec<usize> = companies
        .iter()
        .enumerate()
        .filter(|(_, c)| c.website.is_some() && !(opts.only_missing && c.has_email()))
        .map(|(i, _)| i)
        .collect();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(targets.len());
    }

    let mut added = 0;
    for i in targets {
        let company = &mut companies[i];
        let Some(site) = company.website.as_deref() else { continue };
        let Ok(start) = Url::parse(site) else {
            logw!("Website for {}: unparseable URL {site:?}", company.name);
            if let Some(p) = progress.as_deref_mut() {
                p.item_failed(i, &company.name);
            }
            continue;
        };

        let report = crawl_site(fetch, &start, opts, None);
        let n = company.add_emails(report.email_list());
        added += n;
        logd!("Website for {}: {n} new email(s)", company.name);
        if let Some(p) = progress.as_deref_mut() {
            if report.pages_fetched == 0 {
                p.item_failed(i, &company.name);
            } else {
                p.item_done(i, &company.name);
            }
        }
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    added
}
