// src/config/settings.rs
//
// Plain `key=value` settings file shared by CLI and GUI.
// Lines starting with '#' are comments; unknown keys are ignored.

use std::{fs, io, path::Path};

use super::options::{AppOptions, ExportFormat, ExportType};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub workers: Option<usize>,
    pub pause_ms: Option<u64>,
    pub retries: Option<u32>,
    pub timeout_secs: Option<u64>,
    pub max_pages: Option<u32>,
    pub depth: Option<u32>,
    pub max_site_pages: Option<usize>,
    pub respect_robots: Option<bool>,
    pub follow_websites: Option<bool>,
    pub format: Option<ExportFormat>,
    pub split: Option<bool>,
    pub include_headers: Option<bool>,
    pub out_path: Option<String>,
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn parse(text: &str) -> Settings {
    let mut cfg = Settings::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        let Some(eq) = line.find('=') else {
            logw!("Settings: ignoring line without '=': {line}");
            continue;
        };
        let key = line[..eq].trim();
        let val = line[eq + 1..].trim();
        match key {
            "workers"         => cfg.workers = val.parse().ok(),
            "pause_ms"        => cfg.pause_ms = val.parse().ok(),
            "retries"         => cfg.retries = val.parse().ok(),
            "timeout_secs"    => cfg.timeout_secs = val.parse().ok(),
            "max_pages"       => cfg.max_pages = val.parse().ok(),
            "depth"           => cfg.depth = val.parse().ok(),
            "max_site_pages"  => cfg.max_site_pages = val.parse().ok(),
            "respect_robots"  => cfg.respect_robots = parse_bool(val),
            "follow_websites" => cfg.follow_websites = parse_bool(val),
            "format"          => cfg.format = ExportFormat::parse(val),
            "split"           => cfg.split = parse_bool(val),
            "include_headers" => cfg.include_headers = parse_bool(val),
            "out_path"        => cfg.out_path = Some(s!(val)).filter(|v| !v.is_empty()),
            other => logd!("Settings: unknown key '{other}'"),
        }
    }
    cfg
}

/// Missing file → defaults. Unreadable file is an error.
pub fn load(path: &Path) -> io::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(path)?;
    Ok(parse(&text))
}

pub fn save(path: &Path, cfg: &Settings) -> io::Result<()> {
    let mut s = s!("# contact_scrape settings\n");
    let mut put = |k: &str, v: Option<String>| {
        if let Some(v) = v { s.push_str(&format!("{k}={v}\n")); }
    };
    put("workers", cfg.workers.map(|v| v.to_string()));
    put("pause_ms", cfg.pause_ms.map(|v| v.to_string()));
    put("retries", cfg.retries.map(|v| v.to_string()));
    put("timeout_secs", cfg.timeout_secs.map(|v| v.to_string()));
    put("max_pages", cfg.max_pages.map(|v| v.to_string()));
    put("depth", cfg.depth.map(|v| v.to_string()));
    put("max_site_pages", cfg.max_site_pages.map(|v| v.to_string()));
    put("respect_robots", cfg.respect_robots.map(|v| v.to_string()));
    put("follow_websites", cfg.follow_websites.map(|v| v.to_string()));
    put("format", cfg.format.map(|f| s!(f.ext())));
    put("split", cfg.split.map(|v| v.to_string()));
    put("include_headers", cfg.include_headers.map(|v| v.to_string()));
    put("out_path", cfg.out_path.clone());
    fs::write(path, s)
}

impl Settings {
    /// Overlay present keys onto `opts`.
    pub fn apply(&self, opts: &mut AppOptions) {
        let sc = &mut opts.scrape;
        if let Some(v) = self.workers { sc.workers = v.max(1); }
        if let Some(v) = self.pause_ms { sc.pause_ms = v; }
        if let Some(v) = self.retries { sc.retries = v; }
        if let Some(v) = self.timeout_secs { sc.timeout_secs = v; }
        if let Some(v) = self.max_pages { sc.max_pages = v; }
        if let Some(v) = self.depth { sc.depth = v; }
        if let Some(v) = self.max_site_pages { sc.max_site_pages = v; }
        if let Some(v) = self.respect_robots { sc.respect_robots = v; }
        if let Some(v) = self.follow_websites { sc.follow_websites = v; }

        let ex = &mut opts.export;
        if let Some(f) = self.format { ex.format = f; }
        if let Some(split) = self.split {
            ex.export_type = if split { ExportType::SplitByEmail } else { ExportType::SingleFile };
        }
        if let Some(v) = self.include_headers { ex.include_headers = v; }
        if let Some(p) = &self.out_path { ex.set_path(p); }
    }

    /// Snapshot of the options worth persisting from the GUI.
    pub fn from_options(opts: &AppOptions) -> Self {
        Self {
            workers: Some(opts.scrape.workers),
            pause_ms: Some(opts.scrape.pause_ms),
            retries: Some(opts.scrape.retries),
            timeout_secs: Some(opts.scrape.timeout_secs),
            max_pages: Some(opts.scrape.max_pages),
            depth: Some(opts.scrape.depth),
            max_site_pages: Some(opts.scrape.max_site_pages),
            respect_robots: Some(opts.scrape.respect_robots),
            follow_websites: Some(opts.scrape.follow_websites),
            format: Some(opts.export.format),
            split: Some(opts.export.export_type == ExportType::SplitByEmail),
            include_headers: Some(opts.export.include_headers),
            out_path: Some(opts.export.out_path().to_string_lossy().into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_keys_and_skips_noise() {
        let text = "\
# comment
workers = 8
respect_robots=off
format=tsv
bogus=1
no equals sign here
split=yes
";
        let cfg = parse(text);
        assert_eq!(cfg.workers, Some(8));
        assert_eq!(cfg.respect_robots, Some(false));
        assert_eq!(cfg.format, Some(ExportFormat::Tsv));
        assert_eq!(cfg.split, Some(true));
        assert_eq!(cfg.retries, None);
    }

    #[test]
    fn apply_overrides_only_present_keys() {
        let mut opts = AppOptions::default();
        let before_retries = opts.scrape.retries;
        let cfg = parse("workers=0\nmax_pages=9\n");
        cfg.apply(&mut opts);
        assert_eq!(opts.scrape.workers, 1);
        assert_eq!(opts.scrape.max_pages, 9);
        assert_eq!(opts.scrape.retries, before_retries);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = std::env::temp_dir().join("contact_scrape_settings_unit");
        let _ = fs::create_dir_all(&dir);
        let path = dir.join("s.cfg");
        let cfg = Settings { depth: Some(3), include_headers: Some(false), ..Settings::default() };
        save(&path, &cfg).unwrap();
        assert_eq!(load(&path).unwrap(), cfg);
    }
}
