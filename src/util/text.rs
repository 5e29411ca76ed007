//! Unicode-aware text helpers for terminal rendering.
//!
//! Store names and descriptions come straight from the storefront API and may
//! carry HTML entities, stray control characters, or wide (CJK) glyphs.

use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Display width in terminal columns (CJK and emoji count as 2).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate to at most `max_width` columns, appending `...` when cut.
///
/// Widths too narrow for an ellipsis get a plain prefix instead.
///
/// ```
/// use steamdash::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Portal 2", 20), "Portal 2");
/// assert_eq!(truncate_to_width("Half-Life 2: Episode One", 12), "Half-Life...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width > ELLIPSIS_WIDTH {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    } else {
        (max_width, "")
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

fn is_stripped_control(c: char) -> bool {
    (c.is_control() && !matches!(c, '\t' | '\n' | '\r')) || c == '\x1b'
}

/// Remove ANSI escape sequences and control characters, keeping tab,
/// newline and carriage return.
///
/// CSI (`ESC [ ... final`) and OSC (`ESC ] ... BEL|ESC \`) sequences are
/// dropped whole; a bare ESC is dropped alone.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            }
        } else if !is_stripped_control(c) {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

/// Decode HTML entities in storefront text: the XML predefined set,
/// numeric references and `&nbsp;`.
///
/// Input with an unknown or unterminated entity is returned unchanged.
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }

    let resolve = |entity: &str| match entity {
        "nbsp" => Some(" "),
        other => resolve_predefined_entity(other),
    };
    match unescape_with(s, resolve) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::trace!(error = %e, "Keeping text with undecodable entities");
            Cow::Borrowed(s)
        }
    }
}

/// Prepare store text for a single terminal line: decode entities, strip
/// control sequences and collapse whitespace runs.
///
/// Control sequences are stripped after decoding, so entity-encoded ones
/// such as `&#x1b;[2J` are removed as well.
pub fn clean_text(s: &str) -> String {
    let decoded = decode_entities(s);
    let stripped = strip_control_chars(&decoded);
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("ゲーム"), 6);
    }

    #[test]
    fn test_truncate_fits_borrowed() {
        assert!(matches!(truncate_to_width("Portal", 6), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_to_width("Counter-Strike", 10), "Counter...");
    }

    #[test]
    fn test_truncate_wide_chars_never_split() {
        // Each glyph is 2 columns; budget of 4 leaves room for two.
        assert_eq!(truncate_to_width("ゲームです", 7), "ゲー...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test case", 0), "");
        assert_eq!(truncate_to_width("Test case", 3), "Tes");
    }

    #[test]
    fn test_strip_clean_borrowed() {
        assert!(matches!(strip_control_chars("plain text\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_csi_and_osc() {
        assert_eq!(strip_control_chars("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(strip_control_chars("a\x1b]0;title\x07b"), "ab");
        assert_eq!(strip_control_chars("a\x1b]8;;x\x1b\\b"), "ab");
        assert_eq!(strip_control_chars("a\x00b\x7fc\td"), "abc\td");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("&quot;Hi&quot; &#39;x&#x27;"), "\"Hi\" 'x'");
        assert_eq!(decode_entities("Fight&nbsp;on"), "Fight on");
        assert_eq!(decode_entities("AT&T &bogus; &"), "AT&T &bogus; &");
    }

    #[test]
    fn test_clean_text_strips_entity_encoded_escapes() {
        let cleaned = clean_text("Great game&#x1b;]0;pwned&#7; &#27;[2J");
        assert_eq!(cleaned, "Great game");
        assert!(!cleaned.chars().any(|c| c.is_control()));

        let cleaned = clean_text("Red&#27;[31m alert&#x7f;");
        assert_eq!(cleaned, "Red alert");
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  Build\n\n a &lt;base&gt;\x1b[1m now  "),
            "Build a <base> now"
        );
    }

    proptest! {
        #[test]
        fn truncate_never_exceeds_width(s in "[a-zA-Z0-9 :ゲーム世界]{0,40}", width in 0usize..30) {
            prop_assert!(display_width(&truncate_to_width(&s, width)) <= width);
        }

        #[test]
        fn clean_text_leaves_no_controls(
            s in "([a-z ]|&#x1b;|&#27;|&#7;|&#x7f;|&amp;|\\[|\\]){0,30}"
        ) {
            prop_assert!(!clean_text(&s).chars().any(|c| c.is_control()));
        }

        #[test]
        fn strip_leaves_no_escape(s in "[\\x00-\\x1f\\x7fa-z\\[\\]]{0,40}") {
            let out = strip_control_chars(&s);
            prop_assert!(!out.contains('\x1b'));
        }
    }
}
