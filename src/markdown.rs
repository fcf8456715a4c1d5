//! Converts markdown chapter text into HTML fragments. Link destinations
//! pass through exactly as the author wrote them; `.md` references are
//! rewritten into `.html` afterwards by [`crate::links::rewrite_links`],
//! which operates on the rendered fragment.

use crate::htmlrenderer::push_html;
use pulldown_cmark::{Options, Parser};
use std::io;

/// Converts `markdown` into an HTML5 fragment. The extension set is fixed:
/// footnotes, smart punctuation, strikethrough, tables, and task lists are
/// always enabled (they define the renderer contract, not site
/// configuration).
pub fn to_html(markdown: &str) -> io::Result<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, Parser::new_ext(markdown, options))?;
    Ok(html)
}
