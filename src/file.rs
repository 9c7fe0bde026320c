// src/file.rs

use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::config::options::{ExportOptions, ExportType};
use crate::core::sanitize::{is_na, slug};
use crate::csv::{build_export_row, to_export_string};
use crate::model::Source;

/// `<query-slug>_<source-slug>_companies`
pub fn default_stem(source: Source, query: &str) -> String {
    format!("{}_{}_companies", slug(query), source.slug())
}

/// Write according to `export.export_type`. Returns every path written.
pub fn export_dataset(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    match export.export_type {
        ExportType::SingleFile => Ok(vec![write_export_single(export, headers, rows)?]),
        ExportType::SplitByEmail => write_export_split(export, headers, rows),
    }
}

/// Whole dataset to `export.out_path()`.
pub fn write_export_single(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = export.out_path();
    write_contents(&path, &render(export, headers, rows)?)?;
    logf!("Export: {} row(s) → {}", rows.len(), path.display());
    Ok(path)
}

/// Rows with an email to `<stem>_with_emails`, the rest (Name + Profile URL
/// only) to `<stem>_without_emails`.
pub fn write_export_split(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let hs = headers.as_ref().ok_or("Split export needs a header row")?;
    let col = |name: &str| hs.iter().position(|h| h.eq_ignore_ascii_case(name));
    let email_ix = col("Email").ok_or("Split export needs an Email column")?;

    let (with, without): (Vec<Vec<String>>, Vec<Vec<String>>) = rows
        .iter()
        .cloned()
        .partition(|r| r.get(email_ix).is_some_and(|e| !is_na(e)));

    // Name + Profile URL when both exist, otherwise keep the full shape.
    let (without_headers, without_rows) = match (col("Name"), col("Profile URL")) {
        (Some(n), Some(p)) => (
            Some(vec![hs[n].clone(), hs[p].clone()]),
            without
                .iter()
                .map(|r| vec![r.get(n).cloned().unwrap_or_default(), r.get(p).cloned().unwrap_or_default()])
                .collect(),
        ),
        _ => (headers.clone(), without),
    };

    let (with_path, without_path) = export.split_paths();
    write_contents(&with_path, &render(export, headers, &with)?)?;
    write_contents(&without_path, &render(export, &without_headers, &without_rows)?)?;
    logf!(
        "Export: {} with email → {}, {} without → {}",
        with.len(),
        with_path.display(),
        without_rows.len(),
        without_path.display()
    );
    Ok(vec![with_path, without_path])
}

fn render(
    export: &ExportOptions,
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
) -> Result<String, Box<dyn Error>> {
    match export.format.delimiter() {
        Some(sep) => Ok(to_export_string(headers, rows, export.include_headers, export.fill_na, sep)),
        None => to_json_string(headers, rows, export.fill_na),
    }
}

/// Array of objects keyed by header; array of arrays when there are no headers.
pub fn to_json_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    fill_na: bool,
) -> Result<String, Box<dyn Error>> {
    let items: Vec<Value> = rows
        .iter()
        .map(|r| build_export_row(r, fill_na))
        .map(|r| match headers {
            Some(hs) => {
                let mut obj = Map::new();
                for (h, v) in hs.iter().zip(r) {
                    obj.insert(h.clone(), Value::String(v));
                }
                Value::Object(obj)
            }
            None => Value::Array(r.into_iter().map(Value::String).collect()),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&items)?)
}

fn write_contents(path: &Path, contents: &str) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

pub fn ensure_directory(dir: &Path) -> Result<(), Box<dyn Error>> {
    if dir.exists() && !dir.is_dir() {
        return Err(format!("Path exists but is not a directory: {}", dir.display()).into());
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stem_shape() {
        assert_eq!(default_stem(Source::Europages, "Mining Equipment"), "mining_equipment_europages_companies");
    }

    #[test]
    fn json_objects_follow_headers() {
        let headers = Some(strings!["Name", "Email"]);
        let rows = vec![strings!["Acme", ""]];
        let text = to_json_string(&headers, &rows, true).unwrap();
        let v: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v[0]["Name"], "Acme");
        assert_eq!(v[0]["Email"], "N/A");
    }
}
