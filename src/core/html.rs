// src/core/html.rs
//
// Thin helpers over `scraper` so the page specs read as selectors, not DOM walking.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::sanitize::normalize_ws;

/// Parse a CSS selector; a bad selector is logged and treated as "matches nothing".
pub fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(s) => Some(s),
        Err(e) => {
            loge!("Selector {css:?} rejected: {e:?}");
            None
        }
    }
}

/// Visible text of an element, whitespace-collapsed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text of the first match that isn't blank.
pub fn select_first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = selector(css)?;
    doc.select(&sel)
        .map(text_of)
        .find(|t| !t.is_empty())
}

/// Attribute values of all matches, in document order.
pub fn select_all_attr(doc: &Html, css: &str, attr: &str) -> Vec<String> {
    let Some(sel) = selector(css) else { return Vec::new() };
    doc.select(&sel)
        .filter_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

pub fn exists(doc: &Html, css: &str) -> bool {
    selector(css).is_some_and(|sel| doc.select(&sel).next().is_some())
}

/// Resolve `href` against `base`. Non-navigational hrefs (fragments,
/// mailto:, tel:, javascript:, data:) and non-http(s) results yield None.
pub fn absolutize(base: &Url, href: &str) -> Option<Url> {
    let h = href.trim();
    if h.is_empty() || h.starts_with('#') {
        return None;
    }
    let lc = h.to_ascii_lowercase();
    if ["mailto:", "tel:", "javascript:", "data:"].iter().any(|p| lc.starts_with(p)) {
        return None;
    }
    let mut url = base.join(h).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// hrefs of anchors whose text contains `needle` (case-insensitive), in document order.
pub fn links_by_text(doc: &Html, needle: &str) -> Vec<String> {
    let Some(sel) = selector("a[href]") else {
        return Vec::new();
    };
    let needle = needle.to_lowercase();
    doc.select(&sel)
        .filter(|a| text_of(*a).to_lowercase().contains(&needle))
        .filter_map(|a| a.value().attr("href"))
        .map(|h| h.trim().to_string())
        .collect()
}

/// href of the first anchor whose trimmed text is exactly `text`.
pub fn find_link_by_exact_text(doc: &Html, text: &str) -> Option<String> {
    let sel = selector("a[href]")?;
    doc.select(&sel)
        .find(|a| text_of(*a) == text)
        .and_then(|a| a.value().attr("href"))
        .map(|h| h.trim().to_string())
}

/// Value cell of a two-column label table:
/// `<td>Phone:</td><td>+44 1234</td>` → "+44 1234".
pub fn label_value(doc: &Html, label: &str) -> Option<String> {
    let sel = selector("td")?;
    let cell = doc.select(&sel).find(|td| text_of(*td) == label)?;
    cell.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name().eq_ignore_ascii_case("td"))
        .map(text_of)
        .filter(|t| !t.is_empty())
}
