// src/core/email.rs
//
// Email harvesting from raw page source.
// Scans the whole source, so `mailto:` hrefs and visible text are both covered.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use super::sanitize::normalize_entities;

pub const EMAIL_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}";

/// Matches that are really file names (`logo@2x.png`) end in one of these.
const ASSET_EXTS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "css", "js", "woff", "woff2",
];

/// Template filler seen on contact pages.
const PLACEHOLDER_DOMAINS: &[&str] = &["domain.com", "yourdomain.com", "yourcompany.com"];

const ROLE_LOCALS: &[&str] = &[
    "info", "contact", "sales", "admin", "support", "office", "hello", "mail", "enquiries",
];

fn email_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| match Regex::new(EMAIL_PATTERN) {
        Ok(re) => Some(re),
        Err(e) => {
            loge!("Email pattern failed to compile: {e}");
            None
        }
    })
    .as_ref()
}

/// All plausible addresses in `source`, lowercased, first-seen order, no duplicates.
pub fn extract_emails(source: &str) -> Vec<String> {
    let Some(re) = email_re() else { return Vec::new() };
    let decoded = normalize_entities(source);

    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();
    for m in re.find_iter(&decoded) {
        let Some(email) = clean(m.as_str()) else { continue };
        if seen.insert(email.clone()) {
            out.push(email);
        }
    }
    out
}

/// First address found, if any.
pub fn first_email(source: &str) -> Option<String> {
    extract_emails(source).into_iter().next()
}

fn clean(raw: &str) -> Option<String> {
    let mut e = raw.to_ascii_lowercase();
    // "mailto:%20name@..." leaves an encoded space glued to the local part
    while let Some(rest) = e.strip_prefix("%20") {
        e = s!(rest);
    }
    let e = e.trim_matches(|c| c == '.' || c == '-').to_string();

    let (local, domain) = e.split_once('@')?;
    if local.is_empty() || domain.starts_with('.') || domain.starts_with('-') || domain.contains("..") {
        return None;
    }
    let tld = domain.rsplit('.').next().unwrap_or("");
    if ASSET_EXTS.contains(&tld) {
        return None;
    }
    if PLACEHOLDER_DOMAINS.contains(&domain) {
        return None;
    }
    Some(e)
}

/// Shared mailboxes (`info@`, `noreply@`, ...) rather than a person.
pub fn is_role_address(email: &str) -> bool {
    let local = email
        .split_once('@')
        .map(|(l, _)| l)
        .unwrap_or(email)
        .to_ascii_lowercase();
    if local.starts_with("noreply") || local.starts_with("no-reply") || local.starts_with("donotreply") {
        return true;
    }
    ROLE_LOCALS.contains(&local.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_mailto_and_text_addresses_once() {
        let html = r#"
            <a href="mailto:Sales@Acme-Tools.de">Sales@Acme-Tools.de</a>
            <p>Write to j.doe+rfq@acme-tools.de.</p>
            <p>sales@acme-tools.de</p>
        "#;
        assert_eq!(
            extract_emails(html),
            vec!["sales@acme-tools.de", "j.doe+rfq@acme-tools.de"]
        );
    }

    #[test]
    fn rejects_retina_assets_and_placeholders() {
        let html = r#"<img src="/img/logo@2x.png"> name@domain.com real@firm.co.uk"#;
        assert_eq!(extract_emails(html), vec!["real@firm.co.uk"]);
    }

    #[test]
    fn decodes_obfuscated_at_and_encoded_space() {
        assert_eq!(extract_emails("office&#64;bau.at"), vec!["office@bau.at"]);
        assert_eq!(
            extract_emails(r#"<a href="mailto:%20ops@plant.io">"#),
            vec!["ops@plant.io"]
        );
    }

    #[test]
    fn first_email_is_document_order() {
        assert_eq!(first_email("b@x.io then a@x.io").as_deref(), Some("b@x.io"));
        assert_eq!(first_email("nothing here"), None);
    }

    #[test]
    fn role_addresses() {
        assert!(is_role_address("info@acme.de"));
        assert!(is_role_address("no-reply@acme.de"));
        assert!(is_role_address("NoReply-Billing@acme.de"));
        assert!(!is_role_address("jane.doe@acme.de"));
        assert!(!is_role_address("information.desk@acme.de"));
    }
}
