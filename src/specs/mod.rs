//! # Page specs
//!
//! One module per source page. Each spec encodes *where the rows live in the
//! HTML* and *which cells must be present* for a row to count.
//!
//! ## What lives here
//! - The page path, the minimum cell count and the column layout.
//! - **Tolerant row location** via `core::html::locate_rows` (tbody rows, then
//!   any table rows, then any rows at all).
//! - Emitting positional `RawRow`s whose cells are the `<td>` inner markup, so
//!   the normalizer can still see anchors and inline handlers.
//!
//! ## What does **not** live here
//! - **Fetching** (`core::net`) and **normalization** (`normalize`).
//! - **Persistence** (`store`).
//!
//! ## Typical call chain
//! ```text
//! scrape::Scraper::assignments → Fetch::fetch → specs::assignments::extract
//!                              ↘ normalize::Normalizer::assignments
//! ```
//!
//! ## Conventions
//! - Rows short of `min_cells` are page padding, not errors: skipped silently.
//! - Rows whose primary cell has no text are skipped the same way.
//! - Row indices are positions in the located row list and feed record ids.
pub mod announcements;
pub mod assignments;
pub mod public_announcements;

use scraper::Html;

use crate::core::html::{cell_markup, cell_text, locate_rows};
use crate::model::{RawRow, RecordKind};

/// Static description of one source page.
#[derive(Clone, Copy, Debug)]
pub struct PageSpec {
    pub kind: RecordKind,
    /// Path under the configured origin.
    pub path: &'static str,
    pub min_cells: usize,
    /// Column that must carry text for the row to be kept.
    pub primary_col: usize,
}

impl PageSpec {
    pub fn for_kind(kind: RecordKind) -> &'static PageSpec {
        match kind {
            RecordKind::Assignments => &assignments::SPEC,
            RecordKind::Announcements => &announcements::SPEC,
            RecordKind::PublicAnnouncements => &public_announcements::SPEC,
        }
    }
}

/// Candidate rows of `doc`, paired with their position in the located row list.
pub fn extract_rows(doc: &str, spec: &PageSpec) -> Vec<(usize, RawRow)> {
    let html = Html::parse_document(doc);
    let (strategy, rows) = locate_rows(&html);

    let total = rows.len();
    let out: Vec<_> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(ix, tr)| {
            let cells = cell_markup(tr);
            if cells.len() < spec.min_cells {
                return None;
            }
            if cell_text(&cells[spec.primary_col]).is_empty() {
                return None;
            }
            Some((ix, RawRow::Positional(cells)))
        })
        .collect();

    logd!("{}: {} of {} rows kept via {:?}", spec.kind, out.len(), total, strategy);
    out
}
