//! Markdown rendering to sanitized HTML.

use std::fs;
use std::io;
use std::path::Path;

use pulldown_cmark::{html, Options, Parser};

use crate::errors::Result;

/// Render a Markdown file to safe HTML.
///
/// An absent file yields an empty string rather than an error; the sibling
/// Markdown files in the meta repository are all optional.
pub fn render_file(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(render_text(&text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}

/// Render Markdown text to safe HTML.
///
/// Raw HTML embedded in the source is sanitized, not trusted; the output is
/// served to browsers verbatim.
pub fn render_text(text: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(text, options);
    let mut rendered = String::with_capacity(text.len() * 2);
    html::push_html(&mut rendered, parser);
    ammonia::clean(&rendered)
}
