// src/config/options.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::consts::*;
use crate::core::sanitize::slug;
use crate::model::Source;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub export: ExportOptions,
}

/// GUI tabs / cached dataset kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Companies,
    Emails,
    Enriched,
}

impl PageKind {
    pub fn slug(&self) -> &'static str {
        match self {
            PageKind::Companies => "companies",
            PageKind::Emails => "emails",
            PageKind::Enriched => "enriched",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    pub source: Source,
    /// Niche / search term for directory sources.
    pub query: String,
    /// Start URL for `Source::Website`.
    pub start_url: String,
    pub max_pages: u32,
    /// Link hops from the start page when crawling a website.
    pub depth: u32,
    pub max_site_pages: usize,
    /// After a directory scrape, crawl each company's own website for emails.
    pub follow_websites: bool,
    /// Only follow websites of companies that have no email yet.
    pub only_missing: bool,
    pub workers: usize,
    pub pause_ms: u64,
    pub jitter_ms: u64,
    pub retries: u32,
    pub retry_pause_ms: u64,
    pub timeout_secs: u64,
    pub respect_robots: bool,
    /// Root of the resumable state tree.
    pub store_dir: PathBuf,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            source: Source::Europages,
            query: s!(),
            start_url: s!(),
            max_pages: MAX_PAGES,
            depth: CRAWL_DEPTH,
            max_site_pages: MAX_SITE_PAGES,
            follow_websites: false,
            only_missing: true,
            workers: WORKERS,
            pause_ms: REQUEST_PAUSE_MS,
            jitter_ms: JITTER_MS,
            retries: RETRIES,
            retry_pause_ms: RETRY_PAUSE_MS,
            timeout_secs: TIMEOUT_SECS,
            respect_robots: RESPECT_ROBOTS,
            store_dir: PathBuf::from(STORE_DIR),
        }
    }
}

impl ScrapeOptions {
    /// Key used for the store directory and default file names.
    pub fn query_key(&self) -> String {
        match self.source {
            Source::Website => {
                let host = url::Url::parse(self.start_url.trim())
                    .ok()
                    .and_then(|u| u.host_str().map(|h| h.to_string()))
                    .unwrap_or_else(|| self.start_url.clone());
                slug(&host)
            }
            _ => slug(&self.query),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self.source {
            Source::Website => {
                let raw = self.start_url.trim();
                let parsed = url::Url::parse(raw).map_err(|e| format!("Invalid URL '{raw}': {e}"))?;
                if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                    return Err(format!("Invalid URL '{raw}': expected http(s)://host/..."));
                }
            }
            _ => {
                if self.query.trim().is_empty() {
                    return Err(s!("Query cannot be empty"));
                }
                if self.max_pages == 0 {
                    return Err(s!("Pages must be at least 1"));
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportType {
    SingleFile,
    /// `<stem>_with_emails` + `<stem>_without_emails`
    SplitByEmail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
        }
    }

    /// Field separator; JSON has none.
    pub fn delimiter(&self) -> Option<char> {
        match self {
            ExportFormat::Csv => Some(','),
            ExportFormat::Tsv => Some('\t'),
            ExportFormat::Json => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "tsv" => Some(ExportFormat::Tsv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub export_type: ExportType,
    out_path: OutputPath,
    pub include_headers: bool,
    /// Write `N/A` into empty cells.
    pub fill_na: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Csv,
            export_type: ExportType::SingleFile,
            out_path: OutputPath::default(),
            include_headers: true,
            fill_na: true,
        }
    }
}

impl ExportOptions {
    /// Full path for single-file exports: `<dir>/<stem>.<ext>`.
    /// An extension typed by the user wins over the format's.
    pub fn out_path(&self) -> PathBuf {
        let ext = self
            .out_path
            .user_ext
            .as_ref()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_else(|| s!(self.format.ext()));
        let stem = self.out_path.file_stem.to_string_lossy();
        self.out_path.dir.join(join!(stem, ".", &ext))
    }

    /// Paths for the split export, `(with_emails, without_emails)`.
    pub fn split_paths(&self) -> (PathBuf, PathBuf) {
        let ext = self.format.ext();
        let stem = self.out_path.file_stem.to_string_lossy();
        (
            self.out_path.dir.join(format!("{stem}_with_emails.{ext}")),
            self.out_path.dir.join(format!("{stem}_without_emails.{ext}")),
        )
    }

    pub fn dir(&self) -> &Path {
        &self.out_path.dir
    }

    pub fn stem(&self) -> String {
        self.out_path.file_stem.to_string_lossy().into_owned()
    }

    /// Parse GUI/CLI text into dir + stem (+ extension if one was typed).
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if s.is_empty() {
            return;
        }
        let p = Path::new(s);
        if s.ends_with('/') || s.ends_with('\\') || p.is_dir() {
            self.out_path.dir = p.to_path_buf();
            return;
        }
        if let Some(parent) = p.parent() {
            self.out_path.dir = parent.to_path_buf();
        }
        if let Some(stem) = p.file_stem() {
            self.out_path.file_stem = stem.to_os_string();
        }
        self.out_path.user_ext = p
            .extension()
            .filter(|e| ExportFormat::parse(&e.to_string_lossy()).is_none())
            .map(|e| e.to_os_string());
    }

    /// Replace only the stem; dir and extension policy stay.
    pub fn set_stem(&mut self, stem: &str) {
        self.out_path.file_stem = OsString::from(stem);
    }

    pub fn set_dir(&mut self, dir: impl Into<PathBuf>) {
        self.out_path.dir = dir.into();
    }

    pub fn is_default_stem(&self) -> bool {
        self.out_path.file_stem == OsString::from(DEFAULT_STEM)
    }
}

const DEFAULT_STEM: &str = "companies";

#[derive(Clone, Debug, PartialEq, Eq)]
struct OutputPath {
    dir: PathBuf,
    file_stem: OsString,       // without extension
    user_ext: Option<OsString>, // non-format extension typed by the user
}

impl Default for OutputPath {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUT_DIR),
            file_stem: OsString::from(DEFAULT_STEM),
            user_ext: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_controls_known_extensions() {
        let mut e = ExportOptions::default();
        e.set_path("out/x/plumbing.csv");
        e.format = ExportFormat::Tsv;
        assert!(e.out_path().to_string_lossy().ends_with("plumbing.tsv"));
    }

    #[test]
    fn user_extension_survives_format_change() {
        let mut e = ExportOptions::default();
        e.set_path("out/x/plumbing.txt");
        e.format = ExportFormat::Json;
        assert!(e.out_path().to_string_lossy().ends_with("plumbing.txt"));
    }

    #[test]
    fn split_paths_use_stem() {
        let mut e = ExportOptions::default();
        e.set_path("out/mining.csv");
        let (a, b) = e.split_paths();
        assert!(a.to_string_lossy().ends_with("mining_with_emails.csv"));
        assert!(b.to_string_lossy().ends_with("mining_without_emails.csv"));
    }

    #[test]
    fn website_query_key_uses_host() {
        let o = ScrapeOptions {
            source: Source::Website,
            start_url: s!("https://www.Example.com/contact"),
            ..ScrapeOptions::default()
        };
        assert_eq!(o.query_key(), "wwwexamplecom");
        assert!(o.validate().is_ok());
    }

    #[test]
    fn directory_sources_need_a_query() {
        let o = ScrapeOptions::default();
        assert!(o.validate().is_err());
    }
}
