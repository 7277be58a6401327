// src/core/links.rs
//
// Link recovery for table cells.
//
// Some rows carry the real document URL only inside an inline handler such as
// `onclick="window.open('/docs/formg.pdf')"`, with a `#` or `javascript:` href.
// Everything that knows about that markup convention lives in this file.

use std::sync::LazyLock;

use regex::Regex;

/// `window.open('…')` / `newwindow('…')` / `newwindow2("…")`, capturing the quoted target.
static SCRIPT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:newwindow\d*|window\.open)\s*\(\s*['"]([^'"]+)['"]"#)
        .expect("SCRIPT_OPEN is a valid pattern")
});

/// True for hrefs that do not navigate anywhere by themselves.
pub fn is_inert_href(href: &str) -> bool {
    let h = href.trim();
    h.is_empty()
        || h.starts_with('#')
        || h.get(..11).is_some_and(|p| p.eq_ignore_ascii_case("javascript:"))
}

/// URL passed to a window-opening call inside an inline handler, if any.
pub fn script_target(handler: &str) -> Option<String> {
    let caps = SCRIPT_OPEN.captures(handler)?;
    let url = caps.get(1)?.as_str().trim();
    if url.is_empty() { None } else { Some(s!(url)) }
}

/// Resolve a row link: a real href wins, then the handler target, else empty.
/// The result is absolute against `origin` whenever it is non-empty.
pub fn resolve(href: Option<&str>, handler: Option<&str>, origin: &str) -> String {
    let direct = href.filter(|h| !is_inert_href(h)).map(|h| s!(h.trim()));
    let target = direct.or_else(|| handler.and_then(script_target));
    match target {
        Some(link) => absolutize(&link, origin),
        None => s!(),
    }
}

/// Make `link` absolute against `origin` without ever doubling the separator.
/// Absolute http(s) links come back unchanged; empty stays empty.
pub fn absolutize(link: &str, origin: &str) -> String {
    let link = link.trim();
    if link.is_empty() || has_http_scheme(link) {
        return s!(link);
    }

    let origin = origin.trim_end_matches('/');
    if let Some(rest) = link.strip_prefix("//") {
        let scheme = origin.split("://").next().unwrap_or("https");
        return format!("{scheme}://{rest}");
    }
    if link.starts_with('/') {
        join!(origin, link)
    } else {
        join!(origin, "/", link)
    }
}

fn has_http_scheme(link: &str) -> bool {
    let lc = link.get(..8).unwrap_or(link).to_ascii_lowercase();
    lc.starts_with("http://") || lc.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://ibbi.gov.in";

    #[test]
    fn absolutize_never_doubles_the_separator() {
        assert_eq!(absolutize("/x/y", ORIGIN), "https://ibbi.gov.in/x/y");
        assert_eq!(absolutize("x/y", ORIGIN), "https://ibbi.gov.in/x/y");
        assert_eq!(absolutize("/x/y", "https://ibbi.gov.in/"), "https://ibbi.gov.in/x/y");
    }

    #[test]
    fn absolute_links_pass_through() {
        let abs = "https://example.org/doc.pdf";
        assert_eq!(absolutize(abs, ORIGIN), abs);
        assert_eq!(absolutize("HTTP://Example.org/a", ORIGIN), "HTTP://Example.org/a");
        assert_eq!(absolutize("//cdn.ibbi.gov.in/a.pdf", ORIGIN), "https://cdn.ibbi.gov.in/a.pdf");
        assert_eq!(absolutize("   ", ORIGIN), "");
    }

    #[test]
    fn script_target_handles_call_styles() {
        assert_eq!(script_target("window.open('/docs/formg.pdf')").as_deref(), Some("/docs/formg.pdf"));
        assert_eq!(script_target(r#"newwindow1( "uploads/g.pdf" , 'x')"#).as_deref(), Some("uploads/g.pdf"));
        assert_eq!(script_target("return Window.Open(\"https://a.b/c\");").as_deref(), Some("https://a.b/c"));
        assert_eq!(script_target("alert('hi')"), None);
        assert_eq!(script_target("window.open('')"), None);
    }

    #[test]
    fn inert_hrefs() {
        assert!(is_inert_href("#"));
        assert!(is_inert_href("  "));
        assert!(is_inert_href("JavaScript:void(0)"));
        assert!(!is_inert_href("/docs/a.pdf"));
    }

    #[test]
    fn resolve_prefers_real_href_then_handler() {
        assert_eq!(
            resolve(Some("/a.pdf"), Some("window.open('/b.pdf')"), ORIGIN),
            "https://ibbi.gov.in/a.pdf"
        );
        assert_eq!(
            resolve(Some("#"), Some("window.open('/b.pdf')"), ORIGIN),
            "https://ibbi.gov.in/b.pdf"
        );
        assert_eq!(resolve(None, Some("window.open('b.pdf')"), ORIGIN), "https://ibbi.gov.in/b.pdf");
        assert_eq!(resolve(Some("javascript:void(0)"), None, ORIGIN), "");
    }
}
