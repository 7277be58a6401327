// src/core/html.rs
//
// DOM helpers shared by the page specs. Rows are located with a short list of
// selector strategies, most specific first, so a page that drops its <tbody>
// (or its <table>) still yields rows.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::sanitize::normalize_ws;

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector {css:?}: {e}"))
}

/// Row strategies in order of preference.
static ROW_STRATEGIES: LazyLock<[(&'static str, Selector); 3]> = LazyLock::new(|| {
    [
        ("table tbody tr", selector("table tbody tr")),
        ("table tr", selector("table tr")),
        ("tr", selector("tr")),
    ]
});

static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static HANDLER: LazyLock<Selector> = LazyLock::new(|| selector("[onclick]"));

/// The first strategy that matches any rows, with its rows in document order.
/// An empty result means the page has no table-like structure at all.
pub fn locate_rows(doc: &Html) -> (&'static str, Vec<ElementRef<'_>>) {
    for (name, sel) in ROW_STRATEGIES.iter() {
        let rows: Vec<_> = doc.select(sel).collect();
        if !rows.is_empty() {
            return (*name, rows);
        }
    }
    ("none", Vec::new())
}

/// Inner markup of the row's own `<td>` cells (nested tables are not flattened in).
pub fn cell_markup(row: ElementRef<'_>) -> Vec<String> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name().eq_ignore_ascii_case("td"))
        .map(|td| td.inner_html())
        .collect()
}

/// Visible text of a cell's markup, entities decoded and whitespace collapsed.
pub fn cell_text(markup: &str) -> String {
    if !markup.contains('<') && !markup.contains('&') {
        return normalize_ws(markup);
    }
    let frag = Html::parse_fragment(markup);
    let text: String = frag.root_element().text().collect();
    normalize_ws(&text)
}

/// Link-bearing bits of a cell: the first anchor, or failing that the first
/// element carrying an inline handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CellLink {
    pub href: Option<String>,
    pub handler: Option<String>,
    pub text: String,
}

pub fn cell_link(markup: &str) -> Option<CellLink> {
    if !markup.contains('<') {
        return None;
    }
    let frag = Html::parse_fragment(markup);

    if let Some(a) = frag.select(&ANCHOR).next() {
        let mut link = CellLink {
            href: a.value().attr("href").map(str::to_string),
            handler: a.value().attr("onclick").map(str::to_string),
            text: normalize_ws(&a.text().collect::<String>()),
        };
        // Handler sometimes sits on a wrapper instead of the anchor
        if link.handler.is_none() {
            link.handler = frag
                .select(&HANDLER)
                .next()
                .and_then(|el| el.value().attr("onclick"))
                .map(str::to_string);
        }
        return Some(link);
    }

    frag.select(&HANDLER).next().map(|el| CellLink {
        href: None,
        handler: el.value().attr("onclick").map(str::to_string),
        text: normalize_ws(&el.text().collect::<String>()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_tbody_rows() {
        let doc = Html::parse_document(
            "<table><thead><tr><th>H</th></tr></thead><tbody><tr><td>a</td></tr></tbody></table>",
        );
        let (strategy, rows) = locate_rows(&doc);
        assert_eq!(strategy, "table tbody tr");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn no_table_yields_no_rows() {
        let doc = Html::parse_document("<div>maintenance</div>");
        let (strategy, rows) = locate_rows(&doc);
        assert_eq!(strategy, "none");
        assert!(rows.is_empty());
    }

    #[test]
    fn cells_are_direct_children_only() {
        let doc = Html::parse_document(
            "<table><tr><td>a</td><td><table><tr><td>x</td><td>y</td></tr></table></td></tr></table>",
        );
        let (_, rows) = locate_rows(&doc);
        assert_eq!(cell_markup(rows[0]).len(), 2);
    }

    #[test]
    fn text_strips_tags_and_entities() {
        assert_eq!(cell_text("<a href='/x'>Acme &amp; Sons</a>\n  Ltd"), "Acme & Sons Ltd");
        assert_eq!(cell_text("  plain  "), "plain");
    }

    #[test]
    fn link_falls_back_to_any_handler() {
        let l = cell_link(r#"<span onclick="newwindow1('/g.pdf')">View</span>"#).unwrap();
        assert_eq!(l.href, None);
        assert_eq!(l.handler.as_deref(), Some("newwindow1('/g.pdf')"));
        assert_eq!(l.text, "View");
        assert!(cell_link("no markup").is_none());
    }

    #[test]
    fn anchor_attributes_are_read() {
        let l = cell_link(r##"<a href="#" onclick="window.open('/d.pdf')">Form G</a>"##).unwrap();
        assert_eq!(l.href.as_deref(), Some("#"));
        assert_eq!(l.handler.as_deref(), Some("window.open('/d.pdf')"));
        assert_eq!(l.text, "Form G");
    }
}
