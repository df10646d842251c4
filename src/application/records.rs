//! Loading member records from TOML files.
//!
//! A records file is a list of `[[record]]` tables. Every table needs an integer
//! `id` and an integer parent reference (field name configurable, `pid` by
//! default); the whole table is kept as the record payload.
//!
//! ```toml
//! [[record]]
//! id = 1
//! name = "A"
//! pid = 0
//! ```

use std::path::Path;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, ResultExt};
use crate::domain::{Record, Tree};

/// Record with integer ids and the raw TOML table as payload.
pub type MemberRecord = Record<i64, toml::Table>;

/// Tree built from member records.
pub type MemberTree = Tree<MemberRecord>;

/// Field names used when reading record tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFields {
    /// Field holding the parent id
    pub parent_field: String,
    /// Field used as display label
    pub label_field: String,
}

impl Default for RecordFields {
    fn default() -> Self {
        Self {
            parent_field: "pid".into(),
            label_field: "name".into(),
        }
    }
}

impl RecordFields {
    /// Display label of a record: the label field as text, or the id.
    pub fn label(&self, record: &MemberRecord) -> String {
        match record.payload.get(&self.label_field) {
            Some(toml::Value::String(s)) => s.clone(),
            Some(toml::Value::Integer(i)) => i.to_string(),
            Some(other) => other.to_string(),
            None => record.id.to_string(),
        }
    }

    /// Payload for a member created at runtime.
    pub fn new_payload(&self, id: i64, parent_id: i64, label: &str) -> toml::Table {
        let mut table = toml::Table::new();
        table.insert("id".into(), toml::Value::Integer(id));
        table.insert(self.parent_field.clone(), toml::Value::Integer(parent_id));
        table.insert(self.label_field.clone(), toml::Value::String(label.to_string()));
        table
    }
}

/// Read and parse a records file.
#[instrument(level = "debug", skip(fields))]
pub fn load_records(path: &Path, fields: &RecordFields) -> ApplicationResult<Vec<MemberRecord>> {
    let content = std::fs::read_to_string(path).with_path_context("read records", path)?;
    parse_records(&content, path, fields)
}

/// Parse records from TOML text; `source` only labels errors.
pub fn parse_records(
    content: &str,
    source: &Path,
    fields: &RecordFields,
) -> ApplicationResult<Vec<MemberRecord>> {
    let format_err = |message: String| ApplicationError::RecordFormat {
        path: source.to_path_buf(),
        message,
    };

    let document: toml::Table = toml::from_str(content).map_err(|e| format_err(e.to_string()))?;
    let Some(entries) = document.get("record") else {
        debug!("no [[record]] tables in {}", source.display());
        return Ok(Vec::new());
    };
    let entries = entries
        .as_array()
        .ok_or_else(|| format_err("'record' must be an array of tables".into()))?;

    entries
        .iter()
        .enumerate()
        .map(|(n, entry)| -> ApplicationResult<MemberRecord> {
            let table = entry
                .as_table()
                .ok_or_else(|| format_err(format!("record #{} is not a table", n + 1)))?;
            let int_field = |name: &str| {
                table.get(name).and_then(toml::Value::as_integer).ok_or_else(|| {
                    format_err(format!("record #{} needs an integer '{}'", n + 1, name))
                })
            };
            let id = int_field("id")?;
            let parent_id = int_field(&fields.parent_field)?;
            Ok(Record::new(id, parent_id, table.clone()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[[record]]
id = 1
name = "A"
pid = 0

[[record]]
id = 2
name = "B"
pid = 1
"#;

    #[test]
    fn test_parse_records_reads_ids_and_parents() {
        let records = parse_records(SAMPLE, Path::new("sample.toml"), &RecordFields::default())
            .unwrap();
        let pairs: Vec<(i64, i64)> = records.iter().map(|r| (r.id, r.parent_id)).collect();
        assert_eq!(pairs, vec![(1, 0), (2, 1)]);
        assert_eq!(RecordFields::default().label(&records[1]), "B");
    }

    #[test]
    fn test_parse_records_with_custom_parent_field() {
        let content = "[[record]]\nid = 5\nsponsor = 0\n";
        let fields = RecordFields {
            parent_field: "sponsor".into(),
            ..RecordFields::default()
        };
        let records = parse_records(content, Path::new("x.toml"), &fields).unwrap();
        assert_eq!(records[0].parent_id, 0);
        // no label field: falls back to the id
        assert_eq!(fields.label(&records[0]), "5");
    }

    #[test]
    fn test_parse_records_rejects_missing_parent() {
        let content = "[[record]]\nid = 5\n";
        let err = parse_records(content, Path::new("x.toml"), &RecordFields::default())
            .unwrap_err();
        assert!(err.to_string().contains("needs an integer 'pid'"), "{}", err);
    }

    #[test]
    fn test_parse_records_without_tables_is_empty() {
        let records =
            parse_records("title = \"none\"\n", Path::new("x.toml"), &RecordFields::default())
                .unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_new_payload_uses_configured_fields() {
        let fields = RecordFields {
            parent_field: "upline".into(),
            label_field: "member".into(),
        };
        let payload = fields.new_payload(9, 3, "Zed");
        assert_eq!(payload.get("upline"), Some(&toml::Value::Integer(3)));
        assert_eq!(
            payload.get("member"),
            Some(&toml::Value::String("Zed".into()))
        );
    }
}
