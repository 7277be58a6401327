// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

use crate::model::{RawRow, Record};
use crate::store::DataSet;

pub const SEP: char = ',';

/* ---------------- Parsing ---------------- */

/// Quote-aware parser: two states, inside and outside quotes.
///
/// Outside quotes `sep` ends a field and LF / CRLF (or a lone CR) ends a row.
/// Inside quotes everything is literal except `""` (a quote) and a lone `"`
/// (back outside). Blank lines are skipped; a line holding only `""` is a
/// row with one empty cell. A last row without a terminator is
/// kept, even when its quotes were never closed.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    let mut dirty = false; // anything consumed since the last row break
    let mut quoted = false; // the current row opened a quoted field
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if matches!(chars.peek(), Some('"')) => {
                    chars.next(); // double-quote escape
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => { in_quotes = true; quoted = true; dirty = true; }
            c if c == sep => {
                // move the field without cloning
                row.push(take(&mut field));
                dirty = true;
            }
            '\n' | '\r' => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if quoted || !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
                dirty = false;
                quoted = false;
            }
            _ => { field.push(ch); dirty = true; }
        }
    }

    // Flush the trailing row if the text did not end on a terminator.
    if dirty || in_quotes {
        row.push(field);
        rows.push(row);
    }

    rows
}

/// Whole document as a table: first row is the header.
pub fn decode(text: &str) -> DataSet {
    let mut rows = parse_rows(text, SEP);
    if rows.is_empty() {
        return DataSet::default();
    }
    let headers = rows.remove(0);
    DataSet { headers, rows }
}

/// Header list plus one keyed row per data row.
/// Short rows map their missing columns to empty strings; extra cells are dropped.
pub fn decode_keyed(text: &str) -> (Vec<String>, Vec<RawRow>) {
    let ds = decode(text);
    let rows = ds.rows
        .into_iter()
        .map(|cells| {
            let pairs = ds.headers
                .iter()
                .enumerate()
                .map(|(ix, h)| (h.clone(), cells.get(ix).cloned().unwrap_or_default()))
                .collect();
            RawRow::Keyed(pairs)
        })
        .collect();
    (ds.headers, rows)
}

/// Typed records from an artifact written by [`encode_records`].
/// Positional: the header row is skipped, not interpreted.
pub fn decode_records<R: Record>(text: &str) -> Vec<R> {
    decode(text).rows.iter().map(|r| R::from_row(r)).collect()
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single row, newline-terminated, to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    // A lone empty cell would be a blank line, which the parser skips.
    if let [only] = row {
        if only.is_empty() {
            return writeln!(w, "\"\"");
        }
    }
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

/// Header row then data rows, one line each.
pub fn encode(ds: &DataSet) -> String {
    let mut buf: Vec<u8> = Vec::new();

    // Writing into a Vec cannot fail.
    let _ = write_row(&mut buf, &ds.headers, SEP);
    for r in &ds.rows {
        let _ = write_row(&mut buf, r, SEP);
    }

    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Artifact text for one batch, with the kind's fixed header row.
pub fn encode_records<R: Record>(records: &[R]) -> String {
    encode(&DataSet::from_records(records))
}
