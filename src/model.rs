// src/model.rs
//
// Raw rows as they come off a page or a spreadsheet, and the three canonical
// record shapes they are normalized into.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::consts::*;

/// One unmapped row. Carries no meaning until a normalizer or the schema
/// mapper decides which cell is which field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawRow {
    /// Ordered cells: an HTML table row (cell markup) or a headerless file line.
    Positional(Vec<String>),
    /// (header, value) pairs in source column order, as produced by a
    /// spreadsheet export. A repeated header resolves to its first pair.
    Keyed(Vec<(String, String)>),
}

impl RawRow {
    /// Cell by position. Keyed rows have no positions.
    pub fn at(&self, ix: usize) -> Option<&str> {
        match self {
            RawRow::Positional(cells) => cells.get(ix).map(String::as_str),
            RawRow::Keyed(_) => None,
        }
    }

    /// Cell by header, given the row's position of that header in `headers`.
    pub fn column(&self, headers: &[String], ix: usize) -> Option<&str> {
        match self {
            RawRow::Positional(cells) => cells.get(ix).map(String::as_str),
            RawRow::Keyed(_) => headers.get(ix).and_then(|h| self.get(h)),
        }
    }

    /// Cell by header name. Positional rows have no names.
    pub fn get(&self, header: &str) -> Option<&str> {
        match self {
            RawRow::Positional(_) => None,
            RawRow::Keyed(pairs) => pairs.iter().find(|(h, _)| h == header).map(|(_, v)| v.as_str()),
        }
    }

    /// Headers of a keyed row in column order; empty for positional rows.
    pub fn keys(&self) -> Vec<String> {
        match self {
            RawRow::Positional(_) => Vec::new(),
            RawRow::Keyed(pairs) => pairs.iter().map(|(h, _)| h.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RawRow::Positional(cells) => cells.len(),
            RawRow::Keyed(pairs) => pairs.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// The three record types, each persisted to its own artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Assignments,
    Announcements,
    PublicAnnouncements,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::Assignments,
        RecordKind::Announcements,
        RecordKind::PublicAnnouncements,
    ];

    /// Fixed header row of the persisted artifact.
    pub fn headers(self) -> &'static [&'static str] {
        match self {
            RecordKind::Assignments => &[
                "ID", "Corporate Debtor", "Resolution Professional", "Date", "Status", "Form G Link", "Scraped At",
            ],
            RecordKind::Announcements => &["ID", "Title", "Date", "Link", "Scraped At"],
            RecordKind::PublicAnnouncements => &["ID", "Title", "Date", "Link", "Category", "Scraped At"],
        }
    }

    pub fn header_row(self) -> Vec<String> {
        self.headers().iter().map(|h| s!(*h)).collect()
    }

    pub fn file_name(self) -> &'static str {
        match self {
            RecordKind::Assignments => ASSIGNMENTS_FILE,
            RecordKind::Announcements => ANNOUNCEMENTS_FILE,
            RecordKind::PublicAnnouncements => PUBLIC_ANNOUNCEMENTS_FILE,
        }
    }

    /// Prefix of synthetic ids.
    pub fn id_prefix(self) -> &'static str {
        match self {
            RecordKind::Assignments => "assign",
            RecordKind::Announcements => "ann",
            RecordKind::PublicAnnouncements => "pub",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecordKind::Assignments => "assignments",
            RecordKind::Announcements => "announcements",
            RecordKind::PublicAnnouncements => "public announcements",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A canonical record that knows its artifact row layout.
///
/// `to_row` and `from_row` are exact inverses over the kind's header order;
/// cells missing from a short row read as empty strings.
pub trait Record: Sized {
    const KIND: RecordKind;
    fn id(&self) -> &str;
    fn to_row(&self) -> Vec<String>;
    fn from_row(row: &[String]) -> Self;
}

fn cell(row: &[String], ix: usize) -> String {
    row.get(ix).cloned().unwrap_or_default()
}

/// A corporate insolvency case with its assigned resolution professional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub corporate_debtor: String,
    pub resolution_professional: String,
    pub date: String,
    pub status: String,
    pub form_g_link: String,
    pub scraped_at: String,
}

impl Record for Assignment {
    const KIND: RecordKind = RecordKind::Assignments;

    fn id(&self) -> &str { &self.id }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.corporate_debtor.clone(),
            self.resolution_professional.clone(),
            self.date.clone(),
            self.status.clone(),
            self.form_g_link.clone(),
            self.scraped_at.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Self {
        Self {
            id: cell(row, 0),
            corporate_debtor: cell(row, 1),
            resolution_professional: cell(row, 2),
            date: cell(row, 3),
            status: cell(row, 4),
            form_g_link: cell(row, 5),
            scraped_at: cell(row, 6),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub date: String,
    pub link: String,
    pub scraped_at: String,
}

impl Record for Announcement {
    const KIND: RecordKind = RecordKind::Announcements;

    fn id(&self) -> &str { &self.id }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.date.clone(),
            self.link.clone(),
            self.scraped_at.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Self {
        Self {
            id: cell(row, 0),
            title: cell(row, 1),
            date: cell(row, 2),
            link: cell(row, 3),
            scraped_at: cell(row, 4),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAnnouncement {
    pub id: String,
    pub title: String,
    pub date: String,
    pub link: String,
    pub category: String,
    pub scraped_at: String,
}

impl Record for PublicAnnouncement {
    const KIND: RecordKind = RecordKind::PublicAnnouncements;

    fn id(&self) -> &str { &self.id }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.title.clone(),
            self.date.clone(),
            self.link.clone(),
            self.category.clone(),
            self.scraped_at.clone(),
        ]
    }

    fn from_row(row: &[String]) -> Self {
        Self {
            id: cell(row, 0),
            title: cell(row, 1),
            date: cell(row, 2),
            link: cell(row, 3),
            category: cell(row, 4),
            scraped_at: cell(row, 5),
        }
    }
}

/// Any one canonical record, tagged by kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CanonicalRecord {
    Assignment(Assignment),
    Announcement(Announcement),
    PublicAnnouncement(PublicAnnouncement),
}

impl CanonicalRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            CanonicalRecord::Assignment(_) => RecordKind::Assignments,
            CanonicalRecord::Announcement(_) => RecordKind::Announcements,
            CanonicalRecord::PublicAnnouncement(_) => RecordKind::PublicAnnouncements,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            CanonicalRecord::Assignment(r) => r.id(),
            CanonicalRecord::Announcement(r) => r.id(),
            CanonicalRecord::PublicAnnouncement(r) => r.id(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        match self {
            CanonicalRecord::Assignment(r) => r.to_row(),
            CanonicalRecord::Announcement(r) => r.to_row(),
            CanonicalRecord::PublicAnnouncement(r) => r.to_row(),
        }
    }
}

impl From<Assignment> for CanonicalRecord {
    fn from(r: Assignment) -> Self { CanonicalRecord::Assignment(r) }
}

impl From<Announcement> for CanonicalRecord {
    fn from(r: Announcement) -> Self { CanonicalRecord::Announcement(r) }
}

impl From<PublicAnnouncement> for CanonicalRecord {
    fn from(r: PublicAnnouncement) -> Self { CanonicalRecord::PublicAnnouncement(r) }
}
