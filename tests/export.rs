// tests/export.rs
//
// File exports end to end: single file, split by email, JSON, options.

mod common;

use std::fs;

use common::tmp_dir;
use contact_scrape::config::options::{ExportFormat, ExportOptions, ExportType};
use contact_scrape::csv::parse_rows;
use contact_scrape::file::{default_stem, export_dataset};
use contact_scrape::model::{companies_dataset, Company, Source};

fn sample() -> Vec<Company> {
    vec![
        Company {
            name: "Acme, Inc".into(),
            emails: vec!["sales@acme.de".into(), "jane@acme.de".into()],
            phone: "+49 30 1234".into(),
            location: "Berlin".into(),
            website: Some("https://acme.example/".into()),
            profile_url: "https://www.europages.co.uk/en/company/acme".into(),
            source: Source::Europages,
        },
        Company {
            name: "Gamma SA".into(),
            profile_url: "https://www.europages.co.uk/en/company/gamma".into(),
            ..Company::default()
        },
    ]
}

fn options_in(dir: &std::path::Path, stem: &str) -> ExportOptions {
    let mut export = ExportOptions::default();
    export.set_dir(dir);
    export.set_stem(stem);
    export
}

#[test]
fn single_csv_has_headers_and_na_cells() {
    let dir = tmp_dir("export_single");
    let stem = default_stem(Source::Europages, "mining equipment");
    let export = options_in(&dir, &stem);
    let ds = companies_dataset(&sample());

    let written = export_dataset(&export, &ds.headers, &ds.rows).unwrap();
    assert_eq!(written, vec![dir.join("mining_equipment_europages_companies.csv")]);

    let rows = parse_rows(&fs::read_to_string(&written[0]).unwrap(), ',');
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["Name", "Email", "Phone", "Location", "Website", "Profile URL"]);
    assert_eq!(rows[1][0], "Acme, Inc");
    assert_eq!(rows[1][1], "sales@acme.de, jane@acme.de");
    assert_eq!(rows[2][1], "N/A");
    assert_eq!(rows[2][4], "N/A");
}

#[test]
fn split_export_separates_rows_without_email() {
    let dir = tmp_dir("export_split");
    let mut export = options_in(&dir, "steel");
    export.export_type = ExportType::SplitByEmail;
    export.format = ExportFormat::Tsv;
    let ds = companies_dataset(&sample());

    let written = export_dataset(&export, &ds.headers, &ds.rows).unwrap();
    assert_eq!(
        written,
        vec![dir.join("steel_with_emails.tsv"), dir.join("steel_without_emails.tsv")]
    );

    let with = parse_rows(&fs::read_to_string(&written[0]).unwrap(), '\t');
    assert_eq!(with.len(), 2);
    assert_eq!(with[1][0], "Acme, Inc");

    let without = parse_rows(&fs::read_to_string(&written[1]).unwrap(), '\t');
    assert_eq!(without, vec![
        vec!["Name".to_string(), "Profile URL".to_string()],
        vec!["Gamma SA".to_string(), "https://www.europages.co.uk/en/company/gamma".to_string()],
    ]);
}

#[test]
fn json_export_is_array_of_objects() {
    let dir = tmp_dir("export_json");
    let mut export = options_in(&dir, "steel");
    export.format = ExportFormat::Json;
    export.fill_na = false;
    let ds = companies_dataset(&sample());

    let written = export_dataset(&export, &ds.headers, &ds.rows).unwrap();
    assert!(written[0].to_string_lossy().ends_with("steel.json"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&written[0]).unwrap()).unwrap();
    let items = v.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["Website"], "https://acme.example/");
    assert_eq!(items[1]["Email"], "");
}

#[test]
fn headers_can_be_left_out() {
    let dir = tmp_dir("export_noheaders");
    let mut export = options_in(&dir, "plain");
    export.include_headers = false;
    let ds = companies_dataset(&sample());

    let written = export_dataset(&export, &ds.headers, &ds.rows).unwrap();
    let rows = parse_rows(&fs::read_to_string(&written[0]).unwrap(), ',');
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "Acme, Inc");
}

#[test]
fn typed_path_sets_dir_stem_and_extension() {
    let dir = tmp_dir("export_path");
    let mut export = ExportOptions::default();
    export.set_path(&dir.join("leads.txt").to_string_lossy());
    let ds = companies_dataset(&sample());

    let written = export_dataset(&export, &ds.headers, &ds.rows).unwrap();
    assert_eq!(written, vec![dir.join("leads.txt")]);
}
