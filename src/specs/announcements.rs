//! Spec for the "What's new" page (announcements).
//!
//! Layout: `date | title (usually an anchor)`.

use crate::config::consts::ANNOUNCEMENTS_PATH;
use crate::model::{RawRow, RecordKind};

use super::PageSpec;

pub const DATE: usize = 0;
pub const TITLE: usize = 1;

pub const SPEC: PageSpec = PageSpec {
    kind: RecordKind::Announcements,
    path: ANNOUNCEMENTS_PATH,
    min_cells: 2,
    primary_col: TITLE,
};

pub fn extract(doc: &str) -> Vec<(usize, RawRow)> {
    super::extract_rows(doc, &SPEC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_cell_rows_with_a_title() {
        let page = r#"<table><tbody>
            <tr><td>05 Jan 2024</td><td><a href="/uploads/whatsnew/a.pdf">Circular &amp; notes</a></td></tr>
            <tr><td>06 Jan 2024</td></tr>
            <tr><td>07 Jan 2024</td><td> </td></tr>
        </tbody></table>"#;
        let rows = extract(page);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 0);
    }
}
