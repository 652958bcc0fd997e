//! Text shaping for rendered tool output.
//!
//! HTML handling here is deliberately a single tag-stripping pass plus a few
//! entity replacements. It is not an HTML parser.

/// Entities decoded after tag removal. `&amp;` must stay last.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&amp;", "&"),
];

/// Strip `<...>` tags and common entities from an HTML document
pub fn strip_html(html: &str) -> String {
    let mut stripped = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        stripped.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                // Unterminated tag: keep the remainder verbatim
                rest = &rest[open..];
                break;
            },
        }
    }
    stripped.push_str(rest);

    let mut decoded = stripped;
    for (entity, replacement) in ENTITIES {
        if decoded.contains(entity) {
            decoded = decoded.replace(entity, replacement);
        }
    }

    collapse_blank_lines(&decoded)
}

/// Trim each line and keep at most one blank line between paragraphs
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            blank_run += 1;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(line);
        blank_run = 0;
    }

    out
}

/// Cut `text` to at most `limit` characters on a char boundary.
///
/// Returns the prefix and whether anything was dropped.
pub fn truncate_chars(text: &str, limit: usize) -> (&str, bool) {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => (&text[..byte_idx], true),
        None => (text, false),
    }
}

/// Render a 0..=1 fraction as a rounded whole percentage
pub fn percent(fraction: f64) -> i64 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction * 100.0).round() as i64
}
