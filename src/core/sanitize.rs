// src/core/sanitize.rs
use crate::config::consts::NA;

pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&#64;", "@")
        .replace("&commat;", "@")
        .replace("%40", "@")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// File/dir-safe form of a search term: word chars, '-' and '_' survive,
/// whitespace becomes '_', everything is lowercased.
pub fn slug(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.trim().chars() {
        if ch.is_alphanumeric() || ch == '_' || ch == '-' {
            out.extend(ch.to_lowercase());
        } else if ch.is_whitespace() {
            out.push('_');
        }
    }
    if out.is_empty() { s!("query") } else { out }
}

/// Empty → "N/A"; for exports only, the stored record keeps the empty string.
pub fn or_na(s: &str) -> String {
    if s.trim().is_empty() { s!(NA) } else { s!(s) }
}

pub fn is_na(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.eq_ignore_ascii_case(NA)
}

pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() { out.push(ch); last_us = false; }
        else if ch.is_whitespace() { if !last_us { out.push('_'); last_us = true; } }
        else if ch == '-' || ch == '_' || ch == '.' || ch == '@' {
            if !(last_us && ch == '_') { out.push(ch); }
            last_us = ch == '_';
        }
    }
    let out = out.trim_matches('_').to_string();
    if out.is_empty() { s!("unnamed") } else { out }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_matches_search_term_rules() {
        assert_eq!(slug("Mining Equipment"), "mining_equipment");
        assert_eq!(slug("  steel & iron! "), "steel__iron");
        assert_eq!(slug("bio-fuel_x"), "bio-fuel_x");
        assert_eq!(slug("!!!"), "query");
    }

    #[test]
    fn entities_decode_obfuscated_at() {
        assert_eq!(normalize_entities("sales&#64;acme.de"), "sales@acme.de");
        assert_eq!(normalize_entities("a%40b.com&nbsp;x"), "a@b.com x");
    }

    #[test]
    fn na_helpers() {
        assert_eq!(or_na("  "), "N/A");
        assert_eq!(or_na("x"), "x");
        assert!(is_na("n/a"));
        assert!(!is_na("a@b.co"));
    }

    #[test]
    fn filename_sanitizing() {
        assert_eq!(sanitize_filename("  Jane  Doe / Co "), "Jane_Doe_Co");
        assert_eq!(sanitize_filename("ops@acme"), "ops@acme");
        assert_eq!(sanitize_filename("///"), "unnamed");
    }
}
