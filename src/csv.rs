// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::core::sanitize::or_na;

/* ---------------- Parsing ---------------- */

/// Minimal CSV/TSV parser (quotes + CRLF tolerant).
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // doubled quote
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Trailing row without newline, even with an unterminated quote.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV/TSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            write!(w, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/* ---------------- Export-time transforms (base rows untouched) ---------------- */

pub fn build_export_row(base_row: &[String], fill_na: bool) -> Vec<String> {
    if fill_na {
        base_row.iter().map(|c| or_na(c)).collect()
    } else {
        base_row.to_owned()
    }
}

/// Full export text for Copy/Export.
/// - `include_headers`: emit the header line when headers exist
/// - `fill_na`: empty cells become `N/A`
pub fn to_export_string(
    headers: &Option<Vec<String>>,
    rows: &[Vec<String>],
    include_headers: bool,
    fill_na: bool,
    sep: char,
) -> String {
    let mut buf: Vec<u8> = Vec::new();

    if include_headers {
        if let Some(h) = headers {
            let _ = write_row(&mut buf, h, sep);
        }
    }
    for r in rows {
        let _ = write_row(&mut buf, &build_export_row(r, fill_na), sep);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quotes_and_crlf() {
        let text = "Name,Email\r\n\"Acme, Inc\",\"a@b.de, c@b.de\"\r\n\"Say \"\"hi\"\"\",x\n";
        let rows = parse_rows(text, ',');
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1], strings!["Acme, Inc", "a@b.de, c@b.de"]);
        assert_eq!(rows[2][0], "Say \"hi\"");
    }

    #[test]
    fn writer_quotes_only_when_needed() {
        let mut buf = Vec::new();
        write_row(&mut buf, &strings!["plain", "a,b", "q\"q"], ',').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "plain,\"a,b\",\"q\"\"q\"\n");

        let mut buf = Vec::new();
        write_row(&mut buf, &strings!["a,b", "c\td"], '\t').unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "a,b\t\"c\td\"\n");
    }

    #[test]
    fn export_string_fills_na() {
        let headers = Some(strings!["Name", "Email"]);
        let rows = vec![strings!["Acme", ""]];
        assert_eq!(to_export_string(&headers, &rows, true, true, ','), "Name,Email\nAcme,N/A\n");
        assert_eq!(to_export_string(&headers, &rows, false, false, ','), "Acme,\n");
    }
}
