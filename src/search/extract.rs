//! Visible-text extraction from HTML pages

use regex::Regex;
use std::sync::OnceLock;

struct Patterns {
    script: Regex,
    style: Regex,
    noscript: Regex,
    comment: Regex,
    tag: Regex,
    entity: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        script: Regex::new(r"(?is)<script[^>]*>.*?</script\s*>").expect("valid regex"),
        style: Regex::new(r"(?is)<style[^>]*>.*?</style\s*>").expect("valid regex"),
        noscript: Regex::new(r"(?is)<noscript[^>]*>.*?</noscript\s*>").expect("valid regex"),
        comment: Regex::new(r"(?s)<!--.*?-->").expect("valid regex"),
        tag: Regex::new(r"(?s)<[^>]*>").expect("valid regex"),
        entity: Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("valid regex"),
    })
}

fn decode_entity(entity: &str) -> Option<String> {
    let named = match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "ndash" => Some('\u{2013}'),
        "mdash" => Some('\u{2014}'),
        "hellip" => Some('\u{2026}'),
        "copy" => Some('\u{00a9}'),
        _ => None,
    };
    if let Some(c) = named {
        return Some(c.to_string());
    }
    let code = entity.strip_prefix('#')?;
    let value = match code.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse().ok()?,
    };
    char::from_u32(value).map(|c| c.to_string())
}

/// Extract the visible text of an HTML document
///
/// Drops `script`, `style` and `noscript` elements and comments, strips the
/// remaining tags, decodes common entities, and collapses every run of
/// whitespace to a single space.
pub fn extract_visible_text(html: &str) -> String {
    let p = patterns();
    let text = p.script.replace_all(html, " ");
    let text = p.style.replace_all(&text, " ");
    let text = p.noscript.replace_all(&text, " ");
    let text = p.comment.replace_all(&text, " ");
    let text = p.tag.replace_all(&text, " ");
    let text = p.entity.replace_all(&text, |caps: &regex::Captures<'_>| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cut `text` to at most `max_length` characters, marking the cut with `...`
pub fn truncate_chars(text: &str, max_length: usize) -> String {
    match text.char_indices().nth(max_length) {
        Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
        None => text.to_string(),
    }
}
