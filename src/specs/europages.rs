// src/specs/europages.rs
//
// Europages search results and company profile pages.
//
// Search:  /en/search?cserpRedirect=1&q=<q>, /en/search/page/<n>?cserpRedirect=1&q=<q>
// Profile: /en/company/<slug>
//
// Result cards carry `a[data-test='company-name']`; older layouts only expose
// plain anchors into /en/company/, which is the fallback.

use scraper::Html;
use url::Url;

use super::SearchPage;
use crate::config::consts::EUROPAGES_ROOT;
use crate::core::email::extract_emails;
use crate::core::html::{self, absolutize, select_first_text};
use crate::model::{Company, Source};

const COMPANY_LINK: &str = "a[data-test='company-name']";
const PROFILE_PATH: &str = "/en/company/";
const NEXT_LINK: &str = "a[data-test='pagination-next'], a[aria-label='Next']";

fn root() -> Option<Url> {
    Url::parse(EUROPAGES_ROOT).ok()
}

fn encode(q: &str) -> String {
    url::form_urlencoded::byte_serialize(q.trim().as_bytes()).collect()
}

/// Search URL for 1-based `page`.
pub fn search_url(query: &str, page: u32) -> String {
    let q = encode(query);
    if page <= 1 {
        format!("{EUROPAGES_ROOT}/en/search?cserpRedirect=1&q={q}")
    } else {
        format!("{EUROPAGES_ROOT}/en/search/page/{page}?cserpRedirect=1&q={q}")
    }
}

pub fn parse_search(doc_html: &str) -> SearchPage {
    let doc = Html::parse_document(doc_html);
    let Some(base) = root() else { return SearchPage::default() };

    let mut hrefs = html::select_all_attr(&doc, COMPANY_LINK, "href");
    if hrefs.is_empty() {
        logd!("Europages: no company-name anchors, falling back to {PROFILE_PATH} links");
        hrefs = html::select_all_attr(&doc, "a[href]", "href")
            .into_iter()
            .filter(|h| h.contains(PROFILE_PATH))
            .collect();
    }

    let mut links: Vec<String> = Vec::new();
    for h in hrefs {
        let Some(u) = absolutize(&base, &h) else { continue };
        let u = s!(u.as_str());
        if !links.contains(&u) {
            links.push(u);
        }
    }

    SearchPage {
        links,
        has_next: html::exists(&doc, NEXT_LINK),
        next_url: None,
    }
}

fn is_europages_host(u: &Url) -> bool {
    u.host_str().is_some_and(|h| h.to_ascii_lowercase().contains("europages."))
}

/// Company website behind the "Visit site" button, never a Europages URL.
fn website(doc: &Html) -> Option<String> {
    html::links_by_text(doc, "visit site")
        .iter()
        .filter_map(|h| Url::parse(h).ok())
        .find(|u| matches!(u.scheme(), "http" | "https") && !is_europages_host(u))
        .map(|u| s!(u.as_str()))
}

pub fn parse_company(doc_html: &str, profile_url: &str) -> Company {
    let doc = Html::parse_document(doc_html);
    Company {
        name: select_first_text(&doc, "h1").unwrap_or_default(),
        emails: extract_emails(doc_html),
        phone: select_first_text(&doc, ".tel-number").unwrap_or_default(),
        location: select_first_text(&doc, ".company-card__info--address").unwrap_or_default(),
        website: website(&doc),
        profile_url: s!(profile_url),
        source: Source::Europages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_urls() {
        assert_eq!(
            search_url("mining equipment", 1),
            "https://www.europages.co.uk/en/search?cserpRedirect=1&q=mining+equipment"
        );
        assert_eq!(
            search_url("steel", 3),
            "https://www.europages.co.uk/en/search/page/3?cserpRedirect=1&q=steel"
        );
    }

    #[test]
    fn fallback_links_when_no_cards() {
        let html = r#"
            <a href="/en/company/a-1">A</a>
            <a href="/en/about">About</a>
            <a href="/en/company/a-1">A again</a>
        "#;
        let page = parse_search(html);
        assert_eq!(page.links, vec!["https://www.europages.co.uk/en/company/a-1"]);
        assert!(!page.has_next);
    }

    #[test]
    fn website_skips_europages_hosts() {
        let html = r#"
            <h1>Acme</h1>
            <a href="/en/company/acme/site">Visit site</a>
            <a href="https://www.europages.co.uk/x">Visit site</a>
            <a href="https://acme.example/">Visit Site</a>
        "#;
        let c = parse_company(html, "https://www.europages.co.uk/en/company/acme");
        assert_eq!(c.website.as_deref(), Some("https://acme.example/"));
        assert_eq!(c.source, Source::Europages);
    }
}
