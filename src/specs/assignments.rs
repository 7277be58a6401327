//! Spec for the resolution-plans page (assignments).
//!
//! Layout, one `<tr>` per case:
//! `debtor | resolution professional | (unused) | date | status | Form G`
//!
//! The Form G cell is optional (five-cell rows are valid) and often carries
//! its URL only in an `onclick` handler next to a `#` href.

use crate::config::consts::ASSIGNMENTS_PATH;
use crate::model::{RawRow, RecordKind};

use super::PageSpec;

pub const DEBTOR: usize = 0;
pub const RESOLUTION_PROFESSIONAL: usize = 1;
pub const DATE: usize = 3;
pub const STATUS: usize = 4;
pub const FORM_G: usize = 5;

pub const SPEC: PageSpec = PageSpec {
    kind: RecordKind::Assignments,
    path: ASSIGNMENTS_PATH,
    min_cells: 5,
    primary_col: DEBTOR,
};

pub fn extract(doc: &str) -> Vec<(usize, RawRow)> {
    super::extract_rows(doc, &SPEC)
}
