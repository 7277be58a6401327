// src/core/sanitize.rs

/// Collapse runs of whitespace (including NBSP) into one space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == '\u{a0}' {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Trimmed value, or `default` when nothing is left.
pub fn or_default(value: &str, default: &str) -> String {
    let v = value.trim();
    if v.is_empty() { s!(default) } else { s!(v) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_mixed_whitespace() {
        assert_eq!(normalize_ws("  Acme\u{a0}\u{a0}Pvt \n\t Ltd "), "Acme Pvt Ltd");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn defaults_only_blank_values() {
        assert_eq!(or_default("  ", "Active"), "Active");
        assert_eq!(or_default(" Closed ", "Active"), "Closed");
    }
}
