//! Markdown-flavored message formatting
//!
//! This module converts a raw assistant-response string into a sanitized
//! HTML fragment for display in a chat bubble. The input is untrusted plain
//! text: it may contain literal `<`/`>` characters that must never become
//! live markup, stray HTML tags from upstream, and fenced code that has to
//! survive verbatim.
//!
//! The conversion is a fixed pipeline of named stages. Order matters: each
//! stage assumes the previous stage's output shape. In particular, code
//! fences are pulled out of the raw text before anything else touches it
//! and restored at the end, escaping happens before any markup is
//! reintroduced, and bold resolves before italic.
//!
//! The formatter is pure and deterministic, designed for a single pass over
//! raw text. Feeding it its own output is not supported.
//!
//! # Examples
//!
//! ```
//! use bubbly::format::format;
//!
//! let html = format("**hi** there");
//! assert_eq!(html, "<p><strong>hi</strong> there</p>");
//! ```

mod code_blocks;

use regex::Regex;

/// Convert raw message text into an HTML fragment
///
/// Runs the full formatting pipeline. Malformed markdown (unbalanced
/// asterisks, unterminated fences) is left as literal text; no error is
/// ever raised. Empty input produces empty output.
pub fn format(text: &str) -> String {
    let (formatted, blocks) = code_blocks::extract(text);
    let formatted = normalize_tags(&formatted);
    let formatted = strip_tables(&formatted);
    let formatted = escape_html(&formatted);
    let formatted = inline_code(&formatted);
    let formatted = emphasis(&formatted);
    let formatted = links(&formatted);
    let formatted = headers(&formatted);
    let formatted = list_items(&formatted);
    let formatted = blockquotes(&formatted);
    let formatted = paragraphs(&formatted);
    let formatted = coalesce_lists(&formatted);
    let formatted = code_blocks::restore(&formatted, &blocks);
    cleanup(&formatted)
}

/// Convert stray line-break, paragraph, and div tags in the input into
/// plain newlines, and drop span tags entirely
///
/// Responses sometimes arrive with bits of HTML already baked in; flattening
/// them to newlines keeps the later escaping stage from rendering them as
/// literal tag text mid-sentence.
fn normalize_tags(text: &str) -> String {
    let mut result = Regex::new(r"(?i)<br\s*/?>")
        .unwrap()
        .replace_all(text, "\n")
        .to_string();
    result = Regex::new(r"(?i)</?p>")
        .unwrap()
        .replace_all(&result, "\n")
        .to_string();
    result = Regex::new(r"(?i)</?div>")
        .unwrap()
        .replace_all(&result, "\n")
        .to_string();
    result = Regex::new(r"(?i)</?span>")
        .unwrap()
        .replace_all(&result, "")
        .to_string();
    result
}

/// Flatten markdown tables to plain text
///
/// Table semantics are not renderable in a chat bubble, so rows degrade to
/// space-separated text and separator-only lines (dashes/colons) are deleted.
fn strip_tables(text: &str) -> String {
    let row = Regex::new(r"\|[^\n]+\|").unwrap();
    let dashes = Regex::new(r"[-:]+").unwrap();
    let result = row.replace_all(text, |caps: &regex::Captures| {
        let flattened = caps[0].replace('|', " ");
        dashes.replace_all(&flattened, "").trim().to_string()
    });

    Regex::new(r"(?m)^[ \t]*[-:]+[ \t]*$")
        .unwrap()
        .replace_all(&result, "")
        .to_string()
}

/// Escape `&`, `<`, and `>` so nothing in the input is live markup
///
/// Ampersand first, so already-produced entities are not double-mangled.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Single-backtick spans become inline code elements
fn inline_code(text: &str) -> String {
    Regex::new(r"`([^`]+)`")
        .unwrap()
        .replace_all(text, "<code class=\"inline-code\">$1</code>")
        .to_string()
}

/// `**text**` becomes bold, `*text*` becomes italic
///
/// Bold must run first so a bold span's asterisks are not misread as two
/// italic spans. Italic spans never cross a line boundary; a lone `*` at
/// the start of a line is a bullet marker for the list stage, not an
/// emphasis delimiter.
fn emphasis(text: &str) -> String {
    let result = Regex::new(r"\*\*([^*]+)\*\*")
        .unwrap()
        .replace_all(text, "<strong>$1</strong>")
        .to_string();
    Regex::new(r"\*([^*\n]+)\*")
        .unwrap()
        .replace_all(&result, "<em>$1</em>")
        .to_string()
}

/// `[label](url)` becomes an anchor opening in a new context with no
/// back-reference to the opener
fn links(text: &str) -> String {
    Regex::new(r"\[([^\]]+)\]\(([^)]+)\)")
        .unwrap()
        .replace_all(text, "<a href=\"$2\" target=\"_blank\" rel=\"noopener\">$1</a>")
        .to_string()
}

/// One to four leading `#` markers collapse to a bold line
///
/// Distinct heading levels carry no weight in a chat bubble.
fn headers(text: &str) -> String {
    Regex::new(r"(?m)^#{1,4}\s+(.*)$")
        .unwrap()
        .replace_all(text, "<strong>$1</strong>")
        .to_string()
}

/// Bullet lines become list items; numbered lines keep their ordinal as
/// normalized plain text
fn list_items(text: &str) -> String {
    let result = Regex::new(r"(?m)^[-*]\s+(.*)$")
        .unwrap()
        .replace_all(text, "<li>$1</li>")
        .to_string();
    Regex::new(r"(?m)^(\d+)\.\s+(.*)$")
        .unwrap()
        .replace_all(&result, "$1. $2")
        .to_string()
}

/// Lines beginning with the escaped `>` sequence become blockquotes
fn blockquotes(text: &str) -> String {
    Regex::new(r"(?m)^&gt;\s*(.*)$")
        .unwrap()
        .replace_all(text, "<blockquote>$1</blockquote>")
        .to_string()
}

/// Split on blank-line boundaries into paragraph elements
///
/// Single newlines inside a chunk become line breaks. Chunks holding a
/// placeholder token or already shaped as a block element pass through
/// unwrapped.
fn paragraphs(text: &str) -> String {
    let splitter = Regex::new(r"\n\n+").unwrap();
    splitter
        .split(text)
        .filter_map(|chunk| {
            let chunk = chunk.trim();
            if chunk.is_empty() {
                return None;
            }
            if code_blocks::contains_placeholder(chunk) {
                return Some(chunk.to_string());
            }
            if chunk.starts_with("<blockquote")
                || chunk.starts_with("<div")
                || chunk.starts_with("<ul")
                || chunk.starts_with("<li")
            {
                return Some(chunk.to_string());
            }
            Some(format!("<p>{}</p>", chunk.replace('\n', "<br>")))
        })
        .collect::<Vec<_>>()
        .join("")
}

/// Merge adjacent list items into one enclosing list element
fn coalesce_lists(text: &str) -> String {
    Regex::new(r"(?:<li>.*?</li>\n?)+")
        .unwrap()
        .replace_all(text, |caps: &regex::Captures| {
            format!(
                "<ul class=\"message-list\">{}</ul>",
                caps[0].replace('\n', "")
            )
        })
        .to_string()
}

/// Drop empty paragraphs and dangling trailing breaks left behind by
/// incidental blank input
fn cleanup(text: &str) -> String {
    let result = text.replace("<p></p>", "").replace("<br><br>", "</p><p>");
    Regex::new(r"(?:<br>\s*)+$")
        .unwrap()
        .replace_all(&result, "")
        .to_string()
}
