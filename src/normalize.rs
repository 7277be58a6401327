// src/normalize.rs
//
// Raw page rows → canonical records.
//
// Positional rows follow the page layouts in `specs`; their cells are markup,
// so text is read through `core::html` and links through `core::links`.
// Keyed rows have no layout and are read through a `schema::Mapping` built
// from their own keys.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::consts::{CATEGORY_DEFAULT, STATUS_DEFAULT};
use crate::core::html::{cell_link, cell_text};
use crate::core::links::{self, absolutize};
use crate::core::sanitize::or_default;
use crate::model::{Announcement, Assignment, PublicAnnouncement, RawRow, RecordKind};
use crate::schema::{is_valid_primary, Field, Mapping};
use crate::specs::{announcements as ann, assignments as asg, public_announcements as pub_ann};

/// One extraction run of one source: fixes the id stem and the timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Batch {
    pub kind: RecordKind,
    pub started: DateTime<Utc>,
}

impl Batch {
    pub fn new(kind: RecordKind, started: DateTime<Utc>) -> Self {
        Self { kind, started }
    }

    /// `<prefix>_<batch ms>_<row>`: unique within the batch only.
    pub fn id(&self, row_ix: usize) -> String {
        format!("{}_{}_{}", self.kind.id_prefix(), self.started.timestamp_millis(), row_ix)
    }

    /// ISO-8601, millisecond precision, `Z` suffix.
    pub fn scraped_at(&self) -> String {
        self.started.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

pub struct Normalizer<'a> {
    origin: &'a str,
    batch: Batch,
}

impl<'a> Normalizer<'a> {
    pub fn new(origin: &'a str, batch: Batch) -> Self {
        Self { origin, batch }
    }

    pub fn batch(&self) -> &Batch { &self.batch }

    fn text(row: &RawRow, ix: usize) -> String {
        row.at(ix).map(cell_text).unwrap_or_default()
    }

    /// Link in a cell: anchor href, then inline handler, then bare URL text.
    fn link(&self, row: &RawRow, ix: usize) -> String {
        let Some(markup) = row.at(ix) else { return s!() };
        match cell_link(markup) {
            Some(l) => links::resolve(l.href.as_deref(), l.handler.as_deref(), self.origin),
            None => {
                let text = cell_text(markup);
                links::script_target(&text)
                    .map(|t| absolutize(&t, self.origin))
                    .unwrap_or_else(|| if looks_like_url(&text) { absolutize(&text, self.origin) } else { s!() })
            }
        }
    }

    /// Resolution over the row's own headers, in their column order.
    fn keyed(&self, row: &RawRow) -> Mapping {
        Mapping::resolve(self.batch.kind, &row.keys())
    }

    pub fn assignment(&self, row_ix: usize, row: &RawRow) -> Option<Assignment> {
        let (debtor, rp, date, status, form_g_link) = match row {
            RawRow::Positional(_) => (
                Self::text(row, asg::DEBTOR),
                Self::text(row, asg::RESOLUTION_PROFESSIONAL),
                Self::text(row, asg::DATE),
                or_default(&Self::text(row, asg::STATUS), STATUS_DEFAULT),
                self.link(row, asg::FORM_G),
            ),
            RawRow::Keyed(_) => {
                let m = self.keyed(row);
                (
                    m.value(row, Field::Primary),
                    m.value(row, Field::ResolutionProfessional),
                    m.value(row, Field::Date),
                    m.value(row, Field::Status),
                    absolutize(&m.value(row, Field::Link), self.origin),
                )
            }
        };
        if !is_valid_primary(&debtor) {
            return None;
        }
        Some(Assignment {
            id: self.batch.id(row_ix),
            corporate_debtor: debtor,
            resolution_professional: rp,
            date,
            status,
            form_g_link,
            scraped_at: self.batch.scraped_at(),
        })
    }

    pub fn announcement(&self, row_ix: usize, row: &RawRow) -> Option<Announcement> {
        let (title, date, link) = match row {
            RawRow::Positional(_) => (
                self.title(row, ann::TITLE),
                Self::text(row, ann::DATE),
                self.link(row, ann::TITLE),
            ),
            RawRow::Keyed(_) => {
                let m = self.keyed(row);
                (
                    m.value(row, Field::Primary),
                    m.value(row, Field::Date),
                    absolutize(&m.value(row, Field::Link), self.origin),
                )
            }
        };
        if !is_valid_primary(&title) {
            return None;
        }
        Some(Announcement {
            id: self.batch.id(row_ix),
            title,
            date,
            link,
            scraped_at: self.batch.scraped_at(),
        })
    }

    pub fn public_announcement(&self, row_ix: usize, row: &RawRow) -> Option<PublicAnnouncement> {
        let (title, date, link, category) = match row {
            RawRow::Positional(_) => (
                self.title(row, pub_ann::TITLE),
                Self::text(row, pub_ann::DATE),
                self.link(row, pub_ann::TITLE),
                or_default(&Self::text(row, pub_ann::CATEGORY), CATEGORY_DEFAULT),
            ),
            RawRow::Keyed(_) => {
                let m = self.keyed(row);
                (
                    m.value(row, Field::Primary),
                    m.value(row, Field::Date),
                    absolutize(&m.value(row, Field::Link), self.origin),
                    m.value(row, Field::Category),
                )
            }
        };
        if !is_valid_primary(&title) {
            return None;
        }
        Some(PublicAnnouncement {
            id: self.batch.id(row_ix),
            title,
            date,
            link,
            category,
            scraped_at: self.batch.scraped_at(),
        })
    }

    /// Anchor text when the cell has a non-empty anchor, else the whole cell's text.
    fn title(&self, row: &RawRow, ix: usize) -> String {
        let anchor_text = row
            .at(ix)
            .and_then(cell_link)
            .map(|l| l.text)
            .filter(|t| !t.is_empty());
        anchor_text.unwrap_or_else(|| Self::text(row, ix))
    }

    pub fn assignments(&self, rows: &[(usize, RawRow)]) -> Vec<Assignment> {
        rows.iter().filter_map(|(ix, r)| self.assignment(*ix, r)).collect()
    }

    pub fn announcements(&self, rows: &[(usize, RawRow)]) -> Vec<Announcement> {
        rows.iter().filter_map(|(ix, r)| self.announcement(*ix, r)).collect()
    }

    pub fn public_announcements(&self, rows: &[(usize, RawRow)]) -> Vec<PublicAnnouncement> {
        rows.iter().filter_map(|(ix, r)| self.public_announcement(*ix, r)).collect()
    }
}

fn looks_like_url(s: &str) -> bool {
    let lc = s.to_ascii_lowercase();
    lc.starts_with("http://") || lc.starts_with("https://") || lc.starts_with('/')
}
