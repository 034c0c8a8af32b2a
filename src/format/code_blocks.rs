//! Fenced code block extraction and restoration
//!
//! Triple-backtick fences are rendered into self-contained block elements
//! and swapped out for numbered placeholder tokens before any prose
//! transformation runs. Restoring them is the second-to-last pipeline stage,
//! so code content is never subject to emphasis, list, or paragraph rules.

use super::escape_html;
use regex::Regex;

/// Prefix shared by every placeholder token
const PLACEHOLDER_PREFIX: &str = "__CODEBLOCK_";

/// Build the placeholder token for the block at `index`
pub(crate) fn placeholder(index: usize) -> String {
    format!("{}{}__", PLACEHOLDER_PREFIX, index)
}

/// Returns true if the chunk contains a code block placeholder
pub(crate) fn contains_placeholder(chunk: &str) -> bool {
    chunk.contains(PLACEHOLDER_PREFIX)
}

/// Extract fenced code blocks, replacing each with a placeholder token
///
/// Runs on the raw input before any other stage, so fence content reaches
/// the rendered block verbatim (minus surrounding whitespace) and is
/// escaped exactly once here. An empty language tag yields the generic
/// label `code`.
///
/// Returns the text with placeholders substituted in, plus the rendered
/// block markup in placeholder order.
pub(crate) fn extract(text: &str) -> (String, Vec<String>) {
    let re = Regex::new(r"```(\w*)\n((?s).*?)```").unwrap();
    let mut blocks: Vec<String> = Vec::new();

    let replaced = re.replace_all(text, |caps: &regex::Captures| {
        let lang = caps.get(1).map_or("", |m| m.as_str());
        let code = caps.get(2).map_or("", |m| m.as_str());
        let token = placeholder(blocks.len());
        blocks.push(render_block(lang, code.trim()));
        token
    });

    (replaced.into_owned(), blocks)
}

/// Substitute each placeholder token back with its saved block markup
pub(crate) fn restore(text: &str, blocks: &[String]) -> String {
    let mut restored = text.to_string();
    for (index, block) in blocks.iter().enumerate() {
        restored = restored.replacen(&placeholder(index), block, 1);
    }
    restored
}

/// Render a fenced block as a code-block element with a language label
/// and a copy control
fn render_block(lang: &str, code: &str) -> String {
    let label = if lang.is_empty() { "code" } else { lang };
    format!(
        "<div class=\"code-block\"><div class=\"code-header\">\
         <span class=\"code-lang\">{}</span>\
         <button class=\"copy-code-btn\">Copy</button></div>\
         <pre><code>{}</code></pre></div>",
        label,
        escape_html(code)
    )
}
