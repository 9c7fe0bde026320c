// src/scrape/mod.rs
mod directory;
mod pipeline;
mod site;

pub use directory::collect_companies;
pub use directory::collect_links;
pub use pipeline::run;
pub use pipeline::scrape_companies;
pub use pipeline::scrape_website;
pub use pipeline::site_dataset;
pub use site::crawl_site;
pub use site::enrich_with_websites;
pub use site::SiteReport;
