//! YAML file reader producing `Record`s.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use serde_yaml::Value as YamlValue;

use crate::errors::{Error, Result};
use crate::records::Record;

/// Parse a YAML file that must hold a mapping at the top level.
///
/// Fails with `NotFound` if the path is absent and `Parse` on malformed
/// content.
pub fn parse_file(path: &Path) -> Result<Record> {
    match parse_value_file(path)? {
        Value::Object(map) => Ok(Record::from(map)),
        _ => Err(Error::structure(format!(
            "{} must hold a YAML mapping",
            path.display()
        ))),
    }
}

/// Parse a YAML file into a JSON value, whatever its top-level shape.
pub fn parse_value_file(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|err| Error::from_io(err, path))?;
    parse_str(&text)
}

/// Parse YAML text into a JSON value.
pub fn parse_str(text: &str) -> Result<Value> {
    let value: YamlValue = serde_yaml::from_str(text)?;
    yaml_to_json(value)
}

/// Parse YAML text that must hold a mapping.
pub fn parse_str_mapping(text: &str) -> Result<Record> {
    match parse_str(text)? {
        Value::Object(map) => Ok(Record::from(map)),
        _ => Err(Error::structure("expected a YAML mapping")),
    }
}

fn yaml_to_json(value: YamlValue) -> Result<Value> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                let f = n.as_f64().unwrap_or_default();
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| Error::structure("non-finite number in YAML"))?
            }
        }
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                out.insert(mapping_key(k)?, yaml_to_json(v)?);
            }
            Value::Object(out)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn mapping_key(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Number(n) => Ok(n.to_string()),
        other => Err(Error::structure(format!(
            "unsupported YAML mapping key: {other:?}"
        ))),
    }
}
