// src/config/consts.rs

// Net config
pub const USER_AGENT: &str = "contact_scrape/0.4 (+https://github.com/Imsvale/contact_scrape)";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const TIMEOUT_SECS: u64 = 10;
pub const RETRIES: u32 = 3;
pub const RETRY_PAUSE_MS: u64 = 2_000;
pub const RESPECT_ROBOTS: bool = true;

// Directories
pub const EUROPAGES_ROOT: &str = "https://www.europages.co.uk";
pub const EXPORTBUREAU_ROOT: &str = "https://www.exportbureau.com/";

// Local cache
pub const STORE_DIR: &str = ".store";
pub const STATE_FILE: &str = "state.json";
pub const LOG_FILE: &str = "debug.log";
pub const USERS_FILE: &str = "approved_users.json";
pub const QUEUE_FILE: &str = "scraping_queue.json";
pub const SETTINGS_FILE: &str = "contact_scrape.cfg";

// Scrape
pub const MAX_PAGES: u32 = 5;
pub const CRAWL_DEPTH: u32 = 1;
pub const MAX_SITE_PAGES: usize = 25;
pub const AUTOSAVE_EVERY: usize = 5;

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const NA: &str = "N/A";

// Enrich
pub const CLUSTERS: usize = 4;
pub const KMEANS_MAX_ITER: usize = 100;

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 750; // be polite
pub const JITTER_MS: u64 = 250; // extra 0..250 ms
