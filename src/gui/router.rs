// src/gui/router.rs
use super::pages::{self, Page};

pub static PAGES: &[&'static dyn Page] = &[
    &pages::companies::PAGE,
    &pages::emails::PAGE,
    &pages::enriched::PAGE,
];

pub fn all_pages() -> &'static [&'static dyn Page] {
    PAGES
}
