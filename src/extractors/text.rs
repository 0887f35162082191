// src/extractors/text.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Citation markers such as "[1]", "[note 2]" or "[citation needed]"
static REFERENCE_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]").expect("Failed to compile REFERENCE_MARKER_RE")
});

static ILLEGAL_FILENAME_CHARS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[<>:"/\\|?*]"#).expect("Failed to compile ILLEGAL_FILENAME_CHARS_RE")
});

/// Removes bracketed reference markers and trims surrounding whitespace.
pub fn clean_text(text: &str) -> String {
    REFERENCE_MARKER_RE.replace_all(text, "").trim().to_string()
}

/// Turns heading text into something usable as a file name stem.
///
/// Spaces and control characters such as line breaks become `_`.
pub fn sanitize_title(name: &str) -> String {
    ILLEGAL_FILENAME_CHARS_RE
        .replace_all(name, "")
        .chars()
        .map(|c| if c == ' ' || c.is_control() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reference_markers() {
        assert_eq!(clean_text("Foo[1] bar [note 2] "), "Foo bar");
        assert_eq!(clean_text("Population[a][b]"), "Population");
    }

    #[test]
    fn markers_are_non_greedy() {
        assert_eq!(clean_text("[1]keep[2] this"), "keep this");
    }

    #[test]
    fn marker_does_not_span_lines() {
        assert_eq!(clean_text("open [ \n close]"), "open [ \n close]");
    }

    #[test]
    fn empty_and_marker_only_text() {
        assert_eq!(clean_text(""), "");
        assert_eq!(clean_text("  [citation needed]  "), "");
    }

    #[test]
    fn sanitize_drops_illegal_characters_and_spaces() {
        assert_eq!(sanitize_title("Results: 2020/2021?"), "Results_20202021");
        assert_eq!(sanitize_title(r#"a<b>c"d\e|f*g"#), "abcdefg");
        assert_eq!(sanitize_title("Plain title"), "Plain_title");
    }

    #[test]
    fn sanitize_replaces_line_breaks_and_tabs() {
        assert_eq!(sanitize_title("Annual\nresults"), "Annual_results");
        assert_eq!(sanitize_title("a\r\n\tb"), "a___b");
        assert_eq!(sanitize_title("Caf\u{e9} menu"), "Caf\u{e9}_menu");
    }
}
