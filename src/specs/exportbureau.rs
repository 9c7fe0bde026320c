// src/specs/exportbureau.rs
//
// ExportBureau search and `companyinfo.html` profile pages.
// Pagination is a plain "Next" anchor; profiles are two-column label tables.

use scraper::Html;
use url::Url;

use super::SearchPage;
use crate::config::consts::EXPORTBUREAU_ROOT;
use crate::core::email::extract_emails;
use crate::core::html::{self, absolutize, label_value, select_first_text};
use crate::model::{Company, Source};

pub fn search_url(query: &str) -> String {
    let q: String = url::form_urlencoded::byte_serialize(query.trim().as_bytes()).collect();
    format!("{EXPORTBUREAU_ROOT}search.html?search={q}&country=all&submit=Search")
}

pub fn parse_search(doc_html: &str) -> SearchPage {
    let doc = Html::parse_document(doc_html);
    let Ok(base) = Url::parse(EXPORTBUREAU_ROOT) else { return SearchPage::default() };

    let mut links: Vec<String> = Vec::new();
    for h in html::select_all_attr(&doc, "a[href]", "href") {
        if !h.contains("companyinfo.html") {
            continue;
        }
        if let Some(u) = absolutize(&base, &h) {
            let u = s!(u.as_str());
            if !links.contains(&u) {
                links.push(u);
            }
        }
    }

    let next_url = html::find_link_by_exact_text(&doc, "Next")
        .and_then(|h| absolutize(&base, &h))
        .map(|u| s!(u.as_str()));

    SearchPage { links, has_next: next_url.is_some(), next_url }
}

pub fn parse_company(doc_html: &str, profile_url: &str) -> Company {
    let doc = Html::parse_document(doc_html);
    Company {
        name: select_first_text(&doc, "h1").unwrap_or_default(),
        emails: extract_emails(doc_html),
        phone: label_value(&doc, "Phone:").unwrap_or_default(),
        location: label_value(&doc, "Country:").unwrap_or_default(),
        website: None,
        profile_url: s!(profile_url),
        source: Source::ExportBureau,
    }
}
