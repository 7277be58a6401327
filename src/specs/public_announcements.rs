//! Spec for the public-announcement page.
//!
//! Layout: `title (anchor) | category | date`.

use crate::config::consts::PUBLIC_ANNOUNCEMENTS_PATH;
use crate::model::{RawRow, RecordKind};

use super::PageSpec;

pub const TITLE: usize = 0;
pub const CATEGORY: usize = 1;
pub const DATE: usize = 2;

pub const SPEC: PageSpec = PageSpec {
    kind: RecordKind::PublicAnnouncements,
    path: PUBLIC_ANNOUNCEMENTS_PATH,
    min_cells: 3,
    primary_col: TITLE,
};

pub fn extract(doc: &str) -> Vec<(usize, RawRow)> {
    super::extract_rows(doc, &SPEC)
}
