//! Parser building one election record from its directory.

use std::path::Path;

use chrono::Utc;

use crate::content::{markdown, yaml};
use crate::elections::election_model::status_of;
use crate::errors::{Error, Result};
use crate::meta::RecordParser;
use crate::records::Record;

/// Definition file every election directory must carry.
pub const ELECTION_FILE: &str = "election.yaml";
/// Optional long-form description.
pub const DESCRIPTION_FILE: &str = "election_desc.md";
/// Optional published results.
pub const RESULTS_FILE: &str = "results.md";

/// Builds an election record from `<dir>/election.yaml` plus optional
/// sibling Markdown, attaching the computed `status`, `key`, `description`
/// and `results` fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElectionParser;

impl ElectionParser {
    pub fn new() -> Self {
        Self
    }
}

impl RecordParser for ElectionParser {
    fn parse(&self, dir: &Path) -> Result<Record> {
        let mut record = yaml::parse_file(&dir.join(ELECTION_FILE))?;

        // Status is recomputed on every parse, never cached separately.
        let status = status_of(&record, Utc::now())?;
        record.set("status", status.as_str());

        let key = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| Error::structure("election path has no directory name"))?;
        record.set("key", key);

        record.set("description", markdown::render_file(&dir.join(DESCRIPTION_FILE))?);
        record.set("results", markdown::render_file(&dir.join(RESULTS_FILE))?);

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn election_dir(yaml: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        let e1 = dir.path().join("e1");
        fs::create_dir(&e1).expect("mkdir");
        fs::write(e1.join(ELECTION_FILE), yaml).expect("write");
        dir
    }

    #[test]
    fn attaches_computed_fields() {
        let dir = election_dir(
            "name: Steering Committee\nstart: \"2020-01-01\"\nend: \"2020-12-31\"\n",
        );
        let record = ElectionParser::new().parse(&dir.path().join("e1")).expect("parse");

        assert_eq!(record.key(), Some("e1"));
        assert_eq!(record.get_str("status"), Some("ended"));
        assert_eq!(record.get_str("description"), Some(""));
        assert_eq!(record.get_str("results"), Some(""));
        assert_eq!(record.get_str("name"), Some("Steering Committee"));
    }

    #[test]
    fn renders_sibling_markdown_when_present() {
        let dir = election_dir("start: \"2020-01-01\"\nend: \"2099-12-31\"\n");
        let e1 = dir.path().join("e1");
        fs::write(e1.join(DESCRIPTION_FILE), "# About\n\nAnnual vote.").expect("write");
        fs::write(e1.join(RESULTS_FILE), "Pending.").expect("write");

        let record = ElectionParser::new().parse(&e1).expect("parse");
        let description = record.get_str("description").expect("description");
        assert!(description.contains("<h1>About</h1>"));
        assert!(record.get_str("results").expect("results").contains("Pending."));
    }

    #[test]
    fn missing_definition_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let empty = dir.path().join("e1");
        fs::create_dir(&empty).expect("mkdir");

        let err = ElectionParser::new().parse(&empty).expect_err("should fail");
        assert!(err.is_not_found());
    }

    #[test]
    fn malformed_definition_is_a_parse_error() {
        let dir = election_dir("name: [broken\n");
        let err = ElectionParser::new()
            .parse(&dir.path().join("e1"))
            .expect_err("should fail");
        assert!(matches!(err, Error::Parse(_)));
    }
}
