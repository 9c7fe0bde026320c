// tests/common/mod.rs
//
// Canned `Fetch` for crawl tests: a URL → response table plus a hit log.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::Mutex,
};

use contact_scrape::config::options::ScrapeOptions;
use contact_scrape::core::net::{classify, Fetch, FetchError};
use contact_scrape::model::Source;
use url::Url;

pub struct Canned {
    pages: HashMap<String, (u16, String)>,
    pub hits: Mutex<Vec<String>>,
}

fn key(url: &str) -> String {
    Url::parse(url).map(|u| u.to_string()).unwrap_or_else(|_| url.to_string())
}

impl Canned {
    pub fn new() -> Self {
        Self { pages: HashMap::new(), hits: Mutex::new(Vec::new()) }
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(key(url), (200, body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(key(url), (status, body.to_string()));
        self
    }

    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self, url: &str) -> usize {
        let k = key(url);
        self.hits().iter().filter(|h| **h == k).count()
    }
}

impl Fetch for Canned {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        self.hits.lock().unwrap().push(url.to_string());
        match self.pages.get(url.as_str()) {
            Some((status, body)) => classify(url, *status, body.clone()),
            None => Err(FetchError::Status { status: 404, url: url.to_string() }),
        }
    }
}

/// Fresh, empty directory under the system temp dir.
pub fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("contact_scrape_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

/// No sleeping, one retry, state under `store`.
pub fn fast_options(source: Source, store: PathBuf) -> ScrapeOptions {
    ScrapeOptions {
        source,
        workers: 2,
        pause_ms: 0,
        jitter_ms: 0,
        retries: 1,
        retry_pause_ms: 0,
        respect_robots: false,
        store_dir: store,
        ..ScrapeOptions::default()
    }
}
