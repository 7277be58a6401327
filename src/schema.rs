// src/schema.rs
//
// Column resolution for tables whose headers are not under our control: a
// hand-kept spreadsheet, or one of our own artifacts read back after its
// header row was edited.
//
// Every canonical field owns an ordered keyword list. Headers are scanned in
// column order and the first header matching any keyword wins that field.
// Unresolved fields fall back to a default; rows whose primary field ends up
// empty or "Unknown" are dropped. Nothing here returns an error.

use std::collections::{HashMap, HashSet};

use crate::config::consts::{CATEGORY_DEFAULT, STATUS_DEFAULT, UNKNOWN};
use crate::core::links::absolutize;
use crate::core::sanitize::normalize_ws;
use crate::model::{Announcement, Assignment, CanonicalRecord, PublicAnnouncement, RawRow, RecordKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    /// Debtor for assignments, title for announcements.
    Primary,
    ResolutionProfessional,
    Date,
    Status,
    Link,
    Category,
    ScrapedAt,
}

/// Header test, applied to the lowercased, trimmed header.
#[derive(Clone, Copy, Debug)]
pub enum Pattern {
    Contains(&'static str),
    Exact(&'static str),
}

impl Pattern {
    fn matches(self, header_lc: &str) -> bool {
        match self {
            Pattern::Contains(k) => header_lc.contains(k),
            Pattern::Exact(k) => header_lc == k,
        }
    }
}

use Pattern::{Contains, Exact};

pub struct FieldRule {
    pub field: Field,
    pub patterns: &'static [Pattern],
    /// Used when no column resolves or the resolved cell is blank.
    pub default: &'static str,
}

const ID: FieldRule = FieldRule { field: Field::Id, patterns: &[Exact("id")], default: "" };
const SCRAPED_AT: FieldRule = FieldRule { field: Field::ScrapedAt, patterns: &[Contains("scraped")], default: "" };
const DATE: FieldRule = FieldRule { field: Field::Date, patterns: &[Contains("date"), Contains("order")], default: "" };

const ASSIGNMENT_RULES: &[FieldRule] = &[
    ID,
    FieldRule {
        field: Field::Primary,
        patterns: &[Contains("corporate debtor"), Contains("company"), Contains("name of corporate")],
        default: UNKNOWN,
    },
    FieldRule {
        field: Field::ResolutionProfessional,
        patterns: &[
            Contains("resolution professional"),
            Exact("rp"),
            Contains("name of ip"),
            Contains("insolvency professional"),
        ],
        default: "",
    },
    DATE,
    FieldRule { field: Field::Status, patterns: &[Contains("status")], default: STATUS_DEFAULT },
    FieldRule { field: Field::Link, patterns: &[Contains("form g"), Contains("link")], default: "" },
    SCRAPED_AT,
];

const TITLE: FieldRule = FieldRule {
    field: Field::Primary,
    patterns: &[Contains("title"), Contains("subject"), Contains("particulars"), Contains("description")],
    default: UNKNOWN,
};
const LINK: FieldRule = FieldRule { field: Field::Link, patterns: &[Contains("link"), Contains("url")], default: "" };

const ANNOUNCEMENT_RULES: &[FieldRule] = &[ID, TITLE, DATE, LINK, SCRAPED_AT];

const PUBLIC_ANNOUNCEMENT_RULES: &[FieldRule] = &[
    ID,
    TITLE,
    DATE,
    LINK,
    FieldRule { field: Field::Category, patterns: &[Contains("category"), Contains("type")], default: CATEGORY_DEFAULT },
    SCRAPED_AT,
];

pub fn rules(kind: RecordKind) -> &'static [FieldRule] {
    match kind {
        RecordKind::Assignments => ASSIGNMENT_RULES,
        RecordKind::Announcements => ANNOUNCEMENT_RULES,
        RecordKind::PublicAnnouncements => PUBLIC_ANNOUNCEMENT_RULES,
    }
}

/// Field → column index for one header set.
#[derive(Clone, Debug)]
pub struct Mapping {
    kind: RecordKind,
    headers: Vec<String>,
    columns: HashMap<Field, usize>,
}

impl Mapping {
    pub fn resolve(kind: RecordKind, headers: &[String]) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| normalize_ws(h).to_lowercase()).collect();
        let mut columns = HashMap::new();

        for rule in rules(kind) {
            let hit = lowered
                .iter()
                .position(|h| rule.patterns.iter().any(|p| p.matches(h)));
            if let Some(ix) = hit {
                columns.insert(rule.field, ix);
            }
        }

        Self { kind, headers: headers.to_vec(), columns }
    }

    pub fn kind(&self) -> RecordKind { self.kind }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Source header that won `field`, if any.
    pub fn header(&self, field: Field) -> Option<&str> {
        self.column(field).and_then(|ix| self.headers.get(ix)).map(String::as_str)
    }

    /// Cleaned cell for `field`, or the field's default.
    pub fn value(&self, row: &RawRow, field: Field) -> String {
        let raw = self
            .column(field)
            .and_then(|ix| row.column(&self.headers, ix))
            .map(normalize_ws)
            .unwrap_or_default();
        if raw.is_empty() {
            s!(self.default_for(field))
        } else {
            raw
        }
    }

    fn default_for(&self, field: Field) -> &'static str {
        rules(self.kind)
            .iter()
            .find(|r| r.field == field)
            .map(|r| r.default)
            .unwrap_or("")
    }
}

/// Rows whose primary field is missing are not records.
pub fn is_valid_primary(value: &str) -> bool {
    let v = value.trim();
    !v.is_empty() && !v.eq_ignore_ascii_case(UNKNOWN)
}

/// Maps drifted tables onto canonical records. `origin` makes relative links absolute.
#[derive(Clone, Debug)]
pub struct SchemaMapper {
    origin: String,
}

impl SchemaMapper {
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into() }
    }

    /// Map every row of one table. Positional rows are read by column index,
    /// keyed rows by header name; both go through the same resolution.
    pub fn map(&self, kind: RecordKind, headers: &[String], rows: &[RawRow]) -> Vec<CanonicalRecord> {
        match kind {
            RecordKind::Assignments => self.assignments(headers, rows).into_iter().map(Into::into).collect(),
            RecordKind::Announcements => self.announcements(headers, rows).into_iter().map(Into::into).collect(),
            RecordKind::PublicAnnouncements => {
                self.public_announcements(headers, rows).into_iter().map(Into::into).collect()
            }
        }
    }

    pub fn assignments(&self, headers: &[String], rows: &[RawRow]) -> Vec<Assignment> {
        let m = Mapping::resolve(RecordKind::Assignments, headers);
        let mut ids = IdAllocator::new(RecordKind::Assignments);
        let out: Vec<_> = rows
            .iter()
            .enumerate()
            .filter_map(|(ix, row)| {
                let debtor = m.value(row, Field::Primary);
                if !is_valid_primary(&debtor) {
                    return None;
                }
                Some(Assignment {
                    id: ids.take(ix, &m.value(row, Field::Id)),
                    corporate_debtor: debtor,
                    resolution_professional: m.value(row, Field::ResolutionProfessional),
                    date: m.value(row, Field::Date),
                    status: m.value(row, Field::Status),
                    form_g_link: absolutize(&m.value(row, Field::Link), &self.origin),
                    scraped_at: m.value(row, Field::ScrapedAt),
                })
            })
            .collect();
        logd!("Mapped {} of {} assignment rows (debtor column: {:?})", out.len(), rows.len(), m.header(Field::Primary));
        out
    }

    pub fn announcements(&self, headers: &[String], rows: &[RawRow]) -> Vec<Announcement> {
        let m = Mapping::resolve(RecordKind::Announcements, headers);
        let mut ids = IdAllocator::new(RecordKind::Announcements);
        let out: Vec<_> = rows
            .iter()
            .enumerate()
            .filter_map(|(ix, row)| {
                let title = m.value(row, Field::Primary);
                if !is_valid_primary(&title) {
                    return None;
                }
                Some(Announcement {
                    id: ids.take(ix, &m.value(row, Field::Id)),
                    title,
                    date: m.value(row, Field::Date),
                    link: absolutize(&m.value(row, Field::Link), &self.origin),
                    scraped_at: m.value(row, Field::ScrapedAt),
                })
            })
            .collect();
        logd!("Mapped {} of {} announcement rows", out.len(), rows.len());
        out
    }

    pub fn public_announcements(&self, headers: &[String], rows: &[RawRow]) -> Vec<PublicAnnouncement> {
        let m = Mapping::resolve(RecordKind::PublicAnnouncements, headers);
        let mut ids = IdAllocator::new(RecordKind::PublicAnnouncements);
        let out: Vec<_> = rows
            .iter()
            .enumerate()
            .filter_map(|(ix, row)| {
                let title = m.value(row, Field::Primary);
                if !is_valid_primary(&title) {
                    return None;
                }
                Some(PublicAnnouncement {
                    id: ids.take(ix, &m.value(row, Field::Id)),
                    title,
                    date: m.value(row, Field::Date),
                    link: absolutize(&m.value(row, Field::Link), &self.origin),
                    category: m.value(row, Field::Category),
                    scraped_at: m.value(row, Field::ScrapedAt),
                })
            })
            .collect();
        logd!("Mapped {} of {} public announcement rows", out.len(), rows.len());
        out
    }
}

/// Keeps source ids where usable; blank or repeated ones get `<prefix>_<row>`.
struct IdAllocator {
    prefix: &'static str,
    seen: HashSet<String>,
}

impl IdAllocator {
    fn new(kind: RecordKind) -> Self {
        Self { prefix: kind.id_prefix(), seen: HashSet::new() }
    }

    fn take(&mut self, ix: usize, source: &str) -> String {
        let id = if source.is_empty() || self.seen.contains(source) {
            format!("{}_{}", self.prefix, ix)
        } else {
            s!(source)
        };
        self.seen.insert(id.clone());
        id
    }
}
