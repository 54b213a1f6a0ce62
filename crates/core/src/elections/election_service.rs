//! Read API consumed by the web layer.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::content::{frontmatter, markdown, yaml};
use crate::errors::{Error, Result};
use crate::meta::{ChangeLog, MetaStore, SyncCoordinator};
use crate::records::Record;

/// Voter roll file inside an election directory.
pub const VOTERS_FILE: &str = "voters.yaml";
/// Candidate files are named `candidate-<key>.md`.
pub const CANDIDATE_PREFIX: &str = "candidate-";
const MARKDOWN_EXT: &str = ".md";

/// The read API: store lookups plus the domain sub-queries.
pub trait ElectionServiceTrait: Send + Sync {
    fn get(&self, key: &str) -> Result<Record>;
    fn all(&self) -> Vec<Record>;
    fn where_field(&self, field: &str, value: &Value) -> Vec<Record>;
    fn voters(&self, election_key: &str) -> Result<Vec<Record>>;
    fn candidates(&self, election_key: &str) -> Result<Vec<Record>>;
    fn candidate(&self, election_key: &str, candidate_key: &str) -> Result<Record>;
    fn sync(&self) -> Result<ChangeLog>;
}

/// Store-backed implementation.
///
/// Voter and candidate queries parse their files fresh on every call; those
/// reads are infrequent and must reflect the latest committed file.
pub struct ElectionService {
    store: Arc<MetaStore>,
    coordinator: Arc<SyncCoordinator>,
}

impl ElectionService {
    pub fn new(store: Arc<MetaStore>, coordinator: Arc<SyncCoordinator>) -> Self {
        Self { store, coordinator }
    }

    fn election_dir(&self, election_key: &str) -> PathBuf {
        self.store.root().join(election_key)
    }

    fn candidate_file(candidate_key: &str) -> String {
        format!("{CANDIDATE_PREFIX}{candidate_key}{MARKDOWN_EXT}")
    }
}

impl ElectionServiceTrait for ElectionService {
    fn get(&self, key: &str) -> Result<Record> {
        self.store.get(key)
    }

    fn all(&self) -> Vec<Record> {
        self.store.all()
    }

    fn where_field(&self, field: &str, value: &Value) -> Vec<Record> {
        self.store.where_field(field, value)
    }

    fn voters(&self, election_key: &str) -> Result<Vec<Record>> {
        let path = self.election_dir(election_key).join(VOTERS_FILE);
        voter_records(yaml::parse_value_file(&path)?)
    }

    fn candidates(&self, election_key: &str) -> Result<Vec<Record>> {
        let dir = self.election_dir(election_key);
        let mut names = candidate_file_names(&dir)?;
        names.sort();

        let mut result = Vec::with_capacity(names.len());
        for name in names {
            let path = dir.join(&name);
            let text = fs::read_to_string(&path).map_err(|err| Error::from_io(err, &path))?;
            let document = frontmatter::parse(&text)?;
            let mut record = document.fields;
            record.set("key", candidate_key_of(&name));
            result.push(record);
        }
        Ok(result)
    }

    fn candidate(&self, election_key: &str, candidate_key: &str) -> Result<Record> {
        let path = self
            .election_dir(election_key)
            .join(Self::candidate_file(candidate_key));
        let text = fs::read_to_string(&path).map_err(|err| Error::from_io(err, &path))?;

        let document = frontmatter::parse(&text)?;
        let mut record = document.fields;
        record.set("key", candidate_key);
        record.set("election_key", election_key);
        record.set("description", markdown::render_text(&document.body));
        Ok(record)
    }

    fn sync(&self) -> Result<ChangeLog> {
        self.coordinator.sync()
    }
}

fn candidate_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|err| Error::from_io(err, dir))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(CANDIDATE_PREFIX) && name.ends_with(MARKDOWN_EXT) {
            names.push(name);
        }
    }
    Ok(names)
}

fn candidate_key_of(file_name: &str) -> String {
    file_name
        .strip_prefix(CANDIDATE_PREFIX)
        .and_then(|rest| rest.strip_suffix(MARKDOWN_EXT))
        .unwrap_or(file_name)
        .to_string()
}

/// Shape the voter roll into records. The file holds either a top-level
/// sequence or an `eligible_voters` sequence; mapping items become records
/// as-is, scalar items become `{"id": <scalar>}`.
fn voter_records(value: Value) -> Result<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("eligible_voters") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::structure(
                    "voters file must hold a sequence or an 'eligible_voters' sequence",
                ))
            }
        },
        _ => {
            return Err(Error::structure(
                "voters file must hold a sequence or an 'eligible_voters' sequence",
            ))
        }
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Ok(Record::from(map)),
            Value::String(id) => {
                let mut record = Record::new();
                record.set("id", id);
                Ok(record)
            }
            other => Err(Error::structure(format!(
                "unsupported voter entry: {other}"
            ))),
        })
        .collect()
}
