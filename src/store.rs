// src/store.rs
//
// On-disk state under `.store/`:
//   <source>/<query>/state.json   resumable crawl state
//   <kind>.csv                    last dataset shown per GUI tab, header row first

use std::{
    error::Error,
    fs,
    io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::config::consts::{STATE_FILE, STORE_DIR};
use crate::config::options::PageKind;
use crate::core::sanitize::slug;
use crate::csv::{parse_rows, write_row};
use crate::model::{Company, Source};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn header_count(&self) -> usize {
        self.headers.as_ref().map_or(0, |h| h.len())
    }

    /// Index of a header, case-insensitive.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .as_ref()?
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }
}

/* ---------------- Resumable crawl state ---------------- */

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlState {
    pub source: Source,
    pub query: String,
    #[serde(default)]
    pub pages_done: Vec<String>,
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Where a linked ("Next" anchor) search walk resumes.
    #[serde(default)]
    pub next_page: Option<String>,
    /// Set once a search page had no links or no next page.
    #[serde(default)]
    pub exhausted: bool,
}

impl CrawlState {
    pub fn new(source: Source, query: &str) -> Self {
        Self { source, query: s!(query), ..Self::default() }
    }

    /// Append unseen links in order. Returns how many were new.
    pub fn add_links<I>(&mut self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let before = self.links.len();
        for l in links {
            if !self.links.contains(&l) {
                self.links.push(l);
            }
        }
        self.links.len() - before
    }

    pub fn mark_page(&mut self, url: &str) {
        if !self.is_page_done(url) {
            self.pages_done.push(s!(url));
        }
    }

    pub fn is_page_done(&self, url: &str) -> bool {
        self.pages_done.iter().any(|p| p == url)
    }

    pub fn has_company(&self, profile_url: &str) -> bool {
        self.companies.iter().any(|c| c.profile_url == profile_url)
    }

    /// Collected links with no company record yet, in collection order.
    pub fn pending_links(&self) -> Vec<String> {
        self.links
            .iter()
            .filter(|l| !self.has_company(l))
            .cloned()
            .collect()
    }

    /// Insert or replace by `profile_url`. Returns true when it was new.
    pub fn upsert_company(&mut self, company: Company) -> bool {
        match self.companies.iter_mut().find(|c| c.profile_url == company.profile_url) {
            Some(existing) => {
                *existing = company;
                false
            }
            None => {
                self.companies.push(company);
                true
            }
        }
    }
}

pub fn state_path_in(root: &Path, source: Source, query: &str) -> PathBuf {
    root.join(source.slug()).join(slug(query)).join(STATE_FILE)
}

pub fn state_path(source: Source, query: &str) -> PathBuf {
    state_path_in(Path::new(STORE_DIR), source, query)
}

/// Missing file → fresh state for `(source, query)`.
pub fn load_state(path: &Path, source: Source, query: &str) -> Result<CrawlState, Box<dyn Error>> {
    if !path.exists() {
        logd!("State: none at {}, starting fresh", path.display());
        return Ok(CrawlState::new(source, query));
    }
    let text = fs::read_to_string(path)?;
    let state: CrawlState = serde_json::from_str(&text)
        .map_err(|e| format!("Corrupt state file {}: {e}", path.display()))?;
    logf!(
        "State: resumed {} (pages={}, links={}, companies={})",
        path.display(),
        state.pages_done.len(),
        state.links.len(),
        state.companies.len()
    );
    Ok(state)
}

/// Write `<file>.tmp` then rename over the real file.
pub fn save_state(path: &Path, state: &CrawlState) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(state)?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/* ---------------- GUI dataset cache ---------------- */

fn dataset_path_in(root: &Path, kind: &PageKind) -> PathBuf {
    root.join(format!("{}.csv", kind.slug()))
}

pub fn save_dataset_in(root: &Path, kind: &PageKind, ds: &DataSet) -> io::Result<PathBuf> {
    fs::create_dir_all(root)?;
    let path = dataset_path_in(root, kind);
    let mut buf: Vec<u8> = Vec::new();
    if let Some(h) = &ds.headers {
        write_row(&mut buf, h, ',')?;
    }
    for r in &ds.rows {
        write_row(&mut buf, r, ',')?;
    }
    fs::write(&path, buf)?;
    Ok(path)
}

pub fn load_dataset_in(root: &Path, kind: &PageKind) -> io::Result<DataSet> {
    let text = fs::read_to_string(dataset_path_in(root, kind))?;
    let mut rows = parse_rows(&text, ',');
    if rows.is_empty() {
        return Ok(DataSet::default());
    }
    let headers = Some(rows.remove(0));
    Ok(DataSet { headers, rows })
}

pub fn save_dataset(kind: &PageKind, ds: &DataSet) -> io::Result<PathBuf> {
    save_dataset_in(Path::new(STORE_DIR), kind, ds)
}

pub fn load_dataset(kind: &PageKind) -> io::Result<DataSet> {
    load_dataset_in(Path::new(STORE_DIR), kind)
}
