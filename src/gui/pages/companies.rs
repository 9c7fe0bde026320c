// src/gui/pages/companies.rs
use crate::{config::options::PageKind, model::COMPANY_COLUMNS};

pub struct CompaniesPage;
pub static PAGE: CompaniesPage = CompaniesPage;

impl super::Page for CompaniesPage {
    fn title(&self) -> &'static str { "Companies" }
    fn kind(&self) -> PageKind { PageKind::Companies }

    fn default_headers(&self) -> &'static [&'static str] { &COMPANY_COLUMNS }

    fn preferred_column_widths(&self) -> Option<&'static [f32]> {
        Some(&[200.0, 220.0, 130.0, 180.0, 200.0, 260.0])
    }

    fn split_allowed(&self) -> bool { true }
}
