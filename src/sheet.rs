// src/sheet.rs
//
// External spreadsheet ingestion. The sheet is hand-maintained, so its headers
// are whatever the editors typed; everything goes through `SchemaMapper`.
//
// Two inputs:
// - a published CSV export, fetched with the same `Fetch` as the pages
// - a JSON array of row objects (what a sheets API hands back)

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::core::net::Fetch;
use crate::csv;
use crate::error::SheetError;
use crate::model::{Assignment, RawRow};
use crate::schema::SchemaMapper;

/// Headers in column order plus one keyed row per data row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl SheetTable {
    pub fn from_csv(text: &str) -> Self {
        let (headers, rows) = csv::decode_keyed(text);
        Self { headers, rows }
    }

    /// Header order is the key order of the first object, then any new keys in
    /// order of first appearance. Nulls read as empty; other non-strings as
    /// their JSON text.
    pub fn from_json(text: &str) -> Result<Self, SheetError> {
        let value: Value = serde_json::from_str(text)?;
        let Value::Array(items) = value else {
            return Err(SheetError::Shape(s!(json_kind(&value))));
        };

        let mut headers: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(items.len());
        for (ix, item) in items.into_iter().enumerate() {
            let Value::Object(obj) = item else {
                return Err(SheetError::Shape(format!("element {ix} is {}", json_kind(&item))));
            };
            let mut pairs = Vec::with_capacity(obj.len());
            for (key, v) in obj {
                if !headers.contains(&key) {
                    headers.push(key.clone());
                }
                pairs.push((key, cell(v)));
            }
            rows.push(RawRow::Keyed(pairs));
        }
        Ok(Self { headers, rows })
    }

    pub fn assignments(&self, mapper: &SchemaMapper) -> Vec<Assignment> {
        mapper.assignments(&self.headers, &self.rows)
    }
}

fn cell(v: Value) -> String {
    match v {
        Value::Null => s!(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// JSON row objects saved to disk.
pub fn read_json_file(path: &Path) -> Result<SheetTable, SheetError> {
    let text = fs::read_to_string(path)?;
    SheetTable::from_json(&text)
}

/// Fetch a published CSV export and decode it.
pub fn fetch_table<F: Fetch>(fetcher: &F, url: &str) -> Result<SheetTable, SheetError> {
    let text = fetcher.fetch(url)?;
    let table = SheetTable::from_csv(&text);
    logf!("Sheet: {} rows, {} columns from {url}", table.rows.len(), table.headers.len());
    Ok(table)
}

/// Assignments from a published CSV export.
pub fn fetch_assignments<F: Fetch>(fetcher: &F, url: &str, mapper: &SchemaMapper) -> Result<Vec<Assignment>, SheetError> {
    Ok(fetch_table(fetcher, url)?.assignments(mapper))
}
