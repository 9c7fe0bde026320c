// src/specs/website.rs
//
// Any company website: harvest emails, list same-site links to follow.

use scraper::Html;
use url::Url;

use crate::core::email::extract_emails;
use crate::core::html::{self, absolutize};

const SKIP_EXTS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".ico", ".pdf", ".zip", ".gz", ".rar",
    ".css", ".js", ".json", ".xml", ".mp4", ".mp3", ".doc", ".docx", ".xls", ".xlsx",
];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SitePage {
    pub emails: Vec<String>,
    /// Same-site page links, document order, no duplicates.
    pub links: Vec<Url>,
}

fn bare_host(u: &Url) -> Option<String> {
    let h = u.host_str()?.to_ascii_lowercase();
    Some(h.strip_prefix("www.").map(|s| s.to_string()).unwrap_or(h))
}

pub fn same_site(a: &Url, b: &Url) -> bool {
    match (bare_host(a), bare_host(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn is_asset(u: &Url) -> bool {
    let path = u.path().to_ascii_lowercase();
    SKIP_EXTS.iter().any(|ext| path.ends_with(ext))
}

pub fn parse_page(doc_html: &str, page_url: &Url) -> SitePage {
    let doc = Html::parse_document(doc_html);

    let mut links: Vec<Url> = Vec::new();
    for href in html::select_all_attr(&doc, "a[href]", "href") {
        let Some(u) = absolutize(page_url, &href) else { continue };
        if !same_site(page_url, &u) || is_asset(&u) || links.contains(&u) {
            continue;
        }
        links.push(u);
    }

    SitePage { emails: extract_emails(doc_html), links }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_same_site_pages_only() {
        let page = Url::parse("https://www.acme.test/").unwrap();
        let html = r#"
            <a href="/contact#form">Contact</a>
            <a href="https://acme.test/about">About</a>
            <a href="/contact">Contact again</a>
            <a href="/brochure.PDF">Brochure</a>
            <a href="https://facebook.com/acme">fb</a>
            <a href="mailto:hi@acme.test">hi@acme.test</a>
        "#;
        let p = parse_page(html, &page);
        let links: Vec<&str> = p.links.iter().map(|u| u.as_str()).collect();
        assert_eq!(links, vec!["https://www.acme.test/contact", "https://acme.test/about"]);
        assert_eq!(p.emails, vec!["hi@acme.test"]);
    }
}
