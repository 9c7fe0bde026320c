// src/core/net.rs
//
// HTTP layer. Everything above this talks to `Fetch`, so crawls can run
// against canned pages in tests.

use std::{
    collections::HashMap,
    error::Error,
    fmt,
    sync::Mutex,
    thread,
    time::Duration,
};

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use thiserror::Error;
use url::Url;

use crate::config::consts;
use crate::config::options::ScrapeOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Cloudflare,
    Recaptcha,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Cloudflare => write!(f, "Cloudflare"),
            BlockKind::Recaptcha => write!(f, "reCAPTCHA"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{kind} challenge at {url}")]
    Blocked { kind: BlockKind, url: String },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to {url} failed: {msg}")]
    Transport { url: String, msg: String },

    #[error("robots.txt disallows {0}")]
    Robots(String),
}

impl FetchError {
    /// Worth another attempt: network trouble or a server-side 5xx.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::Blocked { .. } | FetchError::Robots(_) => false,
        }
    }
}

pub trait Fetch: Send + Sync {
    fn get(&self, url: &Url) -> Result<String, FetchError>;
}

/// Challenge detection over a response body.
/// reCAPTCHA widgets are common on ordinary contact forms, so on a 2xx they
/// only count when the page title itself is about the captcha.
pub fn challenge_kind(status: u16, body: &str) -> Option<BlockKind> {
    let lc = body.to_lowercase();
    if lc.contains("checking your browser") || lc.contains("cf-browser-verification") {
        return Some(BlockKind::Cloudflare);
    }
    let refused = matches!(status, 403 | 429 | 503);
    if refused && lc.contains("cloudflare") {
        return Some(BlockKind::Cloudflare);
    }
    if lc.contains("g-recaptcha") || lc.contains("recaptcha") {
        if refused || title_mentions_captcha(&lc) {
            return Some(BlockKind::Recaptcha);
        }
    }
    None
}

fn title_mentions_captcha(lc: &str) -> bool {
    let Some(start) = lc.find("<title") else { return false };
    let rest = &lc[start..];
    let end = rest.find("</title>").unwrap_or(rest.len());
    let title = &rest[..end];
    title.contains("captcha") || title.contains("robot") || title.contains("verif")
}

/// Map status + body to the caller's view of a response.
pub fn classify(url: &Url, status: u16, body: String) -> Result<String, FetchError> {
    if let Some(kind) = challenge_kind(status, &body) {
        return Err(FetchError::Blocked { kind, url: url.to_string() });
    }
    if !(200..300).contains(&status) {
        return Err(FetchError::Status { status, url: url.to_string() });
    }
    Ok(body)
}

/// `attempts` tries (0 counts as 1), sleeping `pause` between them.
/// Challenges, robots refusals and 4xx fail immediately.
pub fn get_with_retry(
    fetch: &dyn Fetch,
    url: &Url,
    attempts: u32,
    pause: Duration,
) -> Result<String, FetchError> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match fetch.get(url) {
            Ok(body) => return Ok(body),
            Err(e) if e.is_retryable() && attempt < attempts => {
                logw!("Attempt {attempt}/{attempts} failed: {e}");
                attempt += 1;
                if !pause.is_zero() {
                    thread::sleep(pause);
                }
            }
            Err(e) => {
                loge!("Giving up on {url} after {attempt} attempt(s): {e}");
                return Err(e);
            }
        }
    }
}

pub struct HttpClient {
    client: Client,
    respect_robots: bool,
    /// origin → robots.txt body ("" when missing)
    robots: Mutex<HashMap<String, String>>,
}

impl HttpClient {
    pub fn new(opts: &ScrapeOptions) -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(consts::ACCEPT_LANGUAGE));

        let client = Client::builder()
            .user_agent(consts::USER_AGENT)
            .default_headers(headers)
            .cookie_store(true)
            .timeout(Duration::from_secs(opts.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            respect_robots: opts.respect_robots,
            robots: Mutex::new(HashMap::new()),
        })
    }

    fn robots_allow(&self, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();

        let cached = self
            .robots
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(&origin)
            .cloned();

        let body = match cached {
            Some(b) => b,
            None => {
                let b = self.fetch_robots(url).unwrap_or_default();
                self.robots
                    .lock()
                    .unwrap_or_else(|p| p.into_inner())
                    .insert(origin, b.clone());
                b
            }
        };

        if body.trim().is_empty() {
            return true;
        }
        let mut matcher = robotstxt::DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&body, consts::USER_AGENT, url.as_str())
    }

    fn fetch_robots(&self, url: &Url) -> Option<String> {
        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        let resp = self.client.get(robots_url).send().ok()?;
        if !resp.status().is_success() {
            logd!("No robots.txt for {} ({})", url.origin().ascii_serialization(), resp.status());
            return None;
        }
        resp.text().ok()
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &Url) -> Result<String, FetchError> {
        if self.respect_robots && !self.robots_allow(url) {
            logw!("robots.txt: skipping {url}");
            return Err(FetchError::Robots(url.to_string()));
        }

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            msg: e.to_string(),
        };

        let resp = self.client.get(url.clone()).send().map_err(transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(transport)?;
        logd!("GET {url} -> {status} ({} bytes)", body.len());
        classify(url, status, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Flaky {
        calls: AtomicU32,
        fail_first: u32,
        err: fn(&Url) -> FetchError,
    }

    impl Fetch for Flaky {
        fn get(&self, url: &Url) -> Result<String, FetchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.fail_first { Err((self.err)(url)) } else { Ok(s!("ok")) }
        }
    }

    fn url() -> Url {
        Url::parse("https://acme.test/contact").unwrap()
    }

    #[test]
    fn retries_transport_errors_until_success() {
        let f = Flaky {
            calls: AtomicU32::new(0),
            fail_first: 2,
            err: |u| FetchError::Transport { url: u.to_string(), msg: s!("reset") },
        };
        assert_eq!(get_with_retry(&f, &url(), 3, Duration::ZERO).unwrap(), "ok");
        assert_eq!(f.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn client_errors_and_challenges_are_not_retried() {
        let f = Flaky {
            calls: AtomicU32::new(0),
            fail_first: 5,
            err: |u| FetchError::Status { status: 404, url: u.to_string() },
        };
        assert!(get_with_retry(&f, &url(), 5, Duration::ZERO).is_err());
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);

        let f = Flaky {
            calls: AtomicU32::new(0),
            fail_first: 5,
            err: |u| FetchError::Blocked { kind: BlockKind::Cloudflare, url: u.to_string() },
        };
        assert!(get_with_retry(&f, &url(), 5, Duration::ZERO).is_err());
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let f = Flaky {
            calls: AtomicU32::new(0),
            fail_first: 0,
            err: |u| FetchError::Robots(u.to_string()),
        };
        assert!(get_with_retry(&f, &url(), 0, Duration::ZERO).is_ok());
        assert_eq!(f.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn challenge_detection() {
        assert_eq!(
            challenge_kind(200, "<p>Checking your browser before accessing</p>"),
            Some(BlockKind::Cloudflare)
        );
        assert_eq!(challenge_kind(503, "Attention Required! | Cloudflare"), Some(BlockKind::Cloudflare));
        assert_eq!(challenge_kind(200, "Powered by Cloudflare"), None);
        assert_eq!(
            challenge_kind(200, "<title>Captcha check</title><div class=\"g-recaptcha\">"),
            Some(BlockKind::Recaptcha)
        );
        assert_eq!(
            challenge_kind(200, "<title>Contact us</title><form><div class=\"g-recaptcha\">"),
            None
        );
        assert_eq!(challenge_kind(429, "<div class=\"g-recaptcha\">"), Some(BlockKind::Recaptcha));
        assert_eq!(challenge_kind(200, "<title>Are you a robot?</title>recaptcha"), Some(BlockKind::Recaptcha));
    }

    #[test]
    fn classify_maps_status() {
        let u = url();
        assert_eq!(classify(&u, 200, s!("body")).unwrap(), "body");
        match classify(&u, 404, s!("nope")) {
            Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("unexpected {other:?}"),
        }
    }
}
