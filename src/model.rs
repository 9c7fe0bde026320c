// src/model.rs
//
// Records shared by scraping, storage, export and the GUI.

use serde::{Deserialize, Serialize};

use crate::core::email::is_role_address;
use crate::store::DataSet;

pub const COMPANY_COLUMNS: [&str; 6] = ["Name", "Email", "Phone", "Location", "Website", "Profile URL"];
pub const EMAIL_COLUMNS: [&str; 4] = ["Email", "Name", "Role Address", "Found On"];

/// Separator for several addresses in one `Email` cell.
pub const EMAIL_SEP: &str = ", ";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[default]
    Europages,
    ExportBureau,
    Website,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Europages, Source::ExportBureau, Source::Website];

    pub fn label(&self) -> &'static str {
        match self {
            Source::Europages => "Europages",
            Source::ExportBureau => "ExportBureau",
            Source::Website => "Website",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Source::Europages => "europages",
            Source::ExportBureau => "exportbureau",
            Source::Website => "website",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "europages" | "ep" => Some(Source::Europages),
            "exportbureau" | "eb" => Some(Source::ExportBureau),
            "website" | "site" | "web" => Some(Source::Website),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub emails: Vec<String>,
    pub phone: String,
    pub location: String,
    pub website: Option<String>,
    pub profile_url: String,
    pub source: Source,
}

impl Company {
    pub fn primary_email(&self) -> Option<&str> {
        self.emails.first().map(|s| s.as_str())
    }

    pub fn has_email(&self) -> bool {
        !self.emails.is_empty()
    }

    /// Append addresses not already present. Returns how many were new.
    pub fn add_emails<I>(&mut self, emails: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut added = 0;
        for e in emails {
            if !self.emails.contains(&e) {
                self.emails.push(e);
                added += 1;
            }
        }
        added
    }

    /// Row in `COMPANY_COLUMNS` order. Empty cells stay empty.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.emails.join(EMAIL_SEP),
            self.phone.clone(),
            self.location.clone(),
            self.website.clone().unwrap_or_default(),
            self.profile_url.clone(),
        ]
    }

    /// Inverse of `to_row` for cached tables. Short rows yield `None`.
    pub fn from_row(row: &[String], source: Source) -> Option<Self> {
        if row.len() < COMPANY_COLUMNS.len() {
            return None;
        }
        let cell = |i: usize| -> String {
            let v = row[i].trim();
            if crate::core::sanitize::is_na(v) { s!() } else { s!(v) }
        };
        let emails = cell(1)
            .split(',')
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        let website = Some(cell(4)).filter(|w| !w.is_empty());
        Some(Self {
            name: cell(0),
            emails,
            phone: cell(2),
            location: cell(3),
            website,
            profile_url: cell(5),
            source,
        })
    }
}

pub fn company_headers() -> Vec<String> {
    COMPANY_COLUMNS.iter().map(|s| s!(*s)).collect()
}

pub fn companies_dataset(companies: &[Company]) -> DataSet {
    DataSet {
        headers: Some(company_headers()),
        rows: companies.iter().map(Company::to_row).collect(),
    }
}

/// One row per address, across all companies, first occurrence wins.
pub fn emails_dataset(companies: &[Company]) -> DataSet {
    let mut seen = std::collections::HashSet::new();
    let mut rows = Vec::new();
    for c in companies {
        for e in &c.emails {
            if !seen.insert(e.clone()) {
                continue;
            }
            rows.push(vec![
                e.clone(),
                c.name.clone(),
                s!(if is_role_address(e) { "yes" } else { "no" }),
                c.profile_url.clone(),
            ]);
        }
    }
    DataSet {
        headers: Some(EMAIL_COLUMNS.iter().map(|s| s!(*s)).collect()),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acme() -> Company {
        Company {
            name: s!("Acme GmbH"),
            emails: strings!["sales@acme.de", "jane@acme.de"],
            phone: s!("+49 30 1234"),
            location: s!("Berlin, Germany"),
            website: Some(s!("https://acme.de")),
            profile_url: s!("https://www.europages.co.uk/en/company/acme"),
            source: Source::Europages,
        }
    }

    #[test]
    fn row_joins_emails_and_round_trips() {
        let c = acme();
        let row = c.to_row();
        assert_eq!(row[1], "sales@acme.de, jane@acme.de");
        assert_eq!(Company::from_row(&row, Source::Europages), Some(c));
    }

    #[test]
    fn from_row_treats_na_as_empty() {
        let row = strings!["Foo", "N/A", "N/A", "", "N/A", "https://x/p"];
        let c = Company::from_row(&row, Source::ExportBureau).unwrap();
        assert!(c.emails.is_empty());
        assert_eq!(c.website, None);
        assert_eq!(c.phone, "");
        assert!(Company::from_row(&strings!["too", "short"], Source::Website).is_none());
    }

    #[test]
    fn add_emails_skips_known() {
        let mut c = acme();
        assert_eq!(c.add_emails(strings!["jane@acme.de", "ops@acme.de"]), 1);
        assert_eq!(c.primary_email(), Some("sales@acme.de"));
        assert_eq!(c.emails.len(), 3);
    }

    #[test]
    fn emails_dataset_flags_role_addresses() {
        let ds = emails_dataset(&[acme(), acme()]);
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0][2], "yes");
        assert_eq!(ds.rows[1][2], "no");
    }

    #[test]
    fn source_parse_and_slug() {
        assert_eq!(Source::parse("ExportBureau"), Some(Source::ExportBureau));
        assert_eq!(Source::parse("nope"), None);
        assert_eq!(Source::Website.slug(), "website");
        assert_eq!(Source::parse(" eb "), Some(Source::ExportBureau));
    }
}
