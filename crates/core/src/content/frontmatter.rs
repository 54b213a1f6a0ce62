//! YAML front matter parsing for candidate files.
//!
//! Candidate files open with a `---` fenced YAML block followed by a
//! Markdown body. A file without front matter yields an empty field set and
//! the whole text as body.

use crate::content::yaml;
use crate::errors::{Error, Result};
use crate::records::Record;

/// A candidate file split into its YAML fields and Markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub fields: Record,
    pub body: String,
}

const FENCE: &str = "---";

/// Split `text` into front matter fields and body.
pub fn parse(text: &str) -> Result<Document> {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim_end() == FENCE => {}
        _ => {
            return Ok(Document {
                fields: Record::new(),
                body: text.to_string(),
            })
        }
    }

    let mut fence_lines = Vec::new();
    let mut body_lines = Vec::new();
    let mut closed = false;
    for line in lines {
        if !closed && line.trim_end() == FENCE {
            closed = true;
            continue;
        }
        if closed {
            body_lines.push(line);
        } else {
            fence_lines.push(line);
        }
    }
    if !closed {
        return Err(Error::structure("unterminated front matter fence"));
    }

    let yaml_text = fence_lines.join("\n");
    let fields = if yaml_text.trim().is_empty() {
        Record::new()
    } else {
        yaml::parse_str_mapping(&yaml_text)?
    };

    Ok(Document {
        fields,
        body: body_lines.join("\n"),
    })
}
