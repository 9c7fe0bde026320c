// src/scrape/pipeline.rs
//
// End-to-end scrape for one `ScrapeOptions`.

use std::error::Error;

use url::Url;

use super::{
    directory::{collect_companies, collect_links},
    site::{crawl_site, enrich_with_websites, SiteReport},
};
use crate::{
    config::options::ScrapeOptions,
    core::{email::is_role_address, net::Fetch},
    model::{companies_dataset, Company, Source, EMAIL_COLUMNS},
    progress::Progress,
    store::{self, DataSet},
};

fn start_url(opts: &ScrapeOptions) -> Result<Url, Box<dyn Error>> {
    Ok(Url::parse(opts.start_url.trim())?)
}

fn site_company(start: &Url, report: &SiteReport) -> Company {
    Company {
        name: s!(start.host_str().unwrap_or_default()),
        emails: report.email_list(),
        website: Some(s!(start.as_str())),
        profile_url: s!(start.as_str()),
        source: Source::Website,
        ..Company::default()
    }
}

/// One row per email with the page it was found on.
pub fn site_dataset(start: &Url, report: &SiteReport) -> DataSet {
    let host = start.host_str().unwrap_or_default();
    DataSet {
        headers: Some(EMAIL_COLUMNS.iter().map(|s| s!(*s)).collect()),
        rows: report
            .emails
            .iter()
            .map(|(email, page)| {
                vec![
                    email.clone(),
                    s!(host),
                    s!(if is_role_address(email) { "yes" } else { "no" }),
                    page.clone(),
                ]
            })
            .collect(),
    }
}

/// Crawl `opts.start_url`. Returns the site as one record plus the
/// per-page email rows.
pub fn scrape_website(
    fetch: &dyn Fetch,
    opts: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<(Company, DataSet), Box<dyn Error>> {
    opts.validate()?;
    let start = start_url(opts)?;
    let report = crawl_site(fetch, &start, opts, progress);
    Ok((site_company(&start, &report), site_dataset(&start, &report)))
}

/// Directory: resume state, collect links, fetch profiles, optionally follow
/// websites, save. Website: a single record for the crawled site.
pub fn scrape_companies(
    fetch: &dyn Fetch,
    opts: &ScrapeOptions,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Vec<Company>, Box<dyn Error>> {
    opts.validate()?;

    if opts.source == Source::Website {
        let (company, _) = scrape_website(fetch, opts, progress)?;
        return Ok(vec![company]);
    }

    let key = opts.query_key();
    let path = store::state_path_in(&opts.store_dir, opts.source, &key);
    let mut state = store::load_state(&path, opts.source, &opts.query)?;

    let new_links = collect_links(
        fetch,
        opts,
        &mut state,
        Some(&path),
        progress.as_mut().map(|p| &mut **p as &mut dyn Progress),
    );
    logf!("{} '{}': {new_links} new link(s), {} total", opts.source.label(), opts.query, state.links.len());

    let added = collect_companies(
        fetch,
        opts,
        &mut state,
        Some(&path),
        progress.as_mut().map(|p| &mut **p as &mut dyn Progress),
    );
    logf!("{} '{}': {added} new company record(s), {} total", opts.source.label(), opts.query, state.companies.len());

    if opts.follow_websites {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Following company websites…");
        }
        let n = enrich_with_websites(
            fetch,
            opts,
            &mut state.companies,
            progress.as_mut().map(|p| &mut **p as &mut dyn Progress),
        );
        logf!("Websites: {n} email(s) added");
    }

    store::save_state(&path, &state)?;
    Ok(state.companies)
}

/// Scrape and shape for display/export.
pub fn run(
    fetch: &dyn Fetch,
    opts: &ScrapeOptions,
    progress: Option<&mut dyn Progress>,
) -> Result<DataSet, Box<dyn Error>> {
    if opts.source == Source::Website {
        let (_, emails) = scrape_website(fetch, opts, progress)?;
        return Ok(emails);
    }
    let companies = scrape_companies(fetch, opts, progress)?;
    Ok(companies_dataset(&companies))
}
