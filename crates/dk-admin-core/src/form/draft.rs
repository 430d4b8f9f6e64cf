//! The in-progress record held by the form.
//!
//! Every value is kept as the raw string the operator typed. Coercion to
//! numbers, flags and lists, and nesting of dotted names, happen only when
//! the payload is assembled for submit.

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

use crate::form::errors::FormError;
use crate::resources::{FieldKind, FormSchema, RowSpec};

pub type DraftRow = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Draft {
    values: BTreeMap<String, String>,
    rows: Vec<DraftRow>,
    /// Values as loaded from the backend record; empty in create mode.
    loaded: BTreeMap<String, String>,
}

impl Draft {
    /// Create-mode draft: schema defaults and default rows.
    pub fn defaults(schema: &FormSchema) -> Self {
        let values = schema
            .fields
            .iter()
            .filter_map(|f| f.default.map(|d| (f.name.to_string(), d.to_string())))
            .collect();
        let rows = schema
            .rows
            .map(|spec| {
                spec.default_rows
                    .iter()
                    .map(|name| DraftRow::from([(spec.key_column.to_string(), name.to_string())]))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            values,
            rows,
            loaded: BTreeMap::new(),
        }
    }

    /// Edit-mode draft flattened from a backend record.
    pub fn from_record(schema: &FormSchema, record: &Value) -> Self {
        let values: BTreeMap<String, String> = schema
            .fields
            .iter()
            .filter_map(|f| {
                value_at(record, f.read_path())
                    .and_then(raw_string)
                    .map(|raw| (f.name.to_string(), raw))
            })
            .collect();
        let rows = schema
            .rows
            .map(|spec| rows_from_record(&spec, record))
            .unwrap_or_default();
        Self {
            loaded: values.clone(),
            values,
            rows,
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn rows(&self) -> &[DraftRow] {
        &self.rows
    }

    pub(crate) fn set(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn push_row(&mut self, row: DraftRow) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    pub(crate) fn set_row_value(
        &mut self,
        index: usize,
        column: &str,
        value: &str,
    ) -> Result<(), FormError> {
        let row = self
            .rows
            .get_mut(index)
            .ok_or(FormError::RowOutOfRange { index })?;
        row.insert(column.to_string(), value.to_string());
        Ok(())
    }

    /// Required fields that are absent or blank, in schema order.
    pub fn missing_required(&self, schema: &FormSchema) -> Vec<String> {
        schema
            .required_fields()
            .filter(|f| self.get(f.name).is_none_or(|v| v.trim().is_empty()))
            .map(|f| f.name.to_string())
            .collect()
    }

    /// Validate and assemble the request body.
    ///
    /// Blank optional fields are left out. Rows without a key or without
    /// any value are dropped. A choice field still holding the value loaded
    /// from the record is sent back as stored, even when it is outside the
    /// known options.
    pub fn to_payload(&self, schema: &FormSchema) -> Result<Value, FormError> {
        let missing = self.missing_required(schema);
        if !missing.is_empty() {
            return Err(FormError::MissingRequired { fields: missing });
        }

        let mut payload = Map::new();
        for field in schema.fields {
            let Some(raw) = self.get(field.name).map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            let value = match field.kind {
                FieldKind::Choice(_) if self.is_loaded_value(field.name, raw) => {
                    Value::String(raw.to_string())
                }
                kind => coerce(field.name, kind, raw)?,
            };
            insert_path(&mut payload, field.name, value);
        }

        if let Some(spec) = schema.rows {
            let table = self.rows_payload(&spec)?;
            if !table.is_empty() {
                insert_path(&mut payload, spec.target, Value::Object(table));
            }
        }

        Ok(Value::Object(payload))
    }

    fn is_loaded_value(&self, name: &str, raw: &str) -> bool {
        self.loaded.get(name).is_some_and(|loaded| loaded.trim() == raw)
    }

    fn rows_payload(&self, spec: &RowSpec) -> Result<Map<String, Value>, FormError> {
        let mut table = Map::new();
        for row in &self.rows {
            let Some(key) = row
                .get(spec.key_column)
                .map(|k| k.trim())
                .filter(|k| !k.is_empty())
            else {
                continue;
            };
            let mut entry = Map::new();
            for column in spec.columns {
                let Some(raw) = row
                    .get(column.name)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                else {
                    continue;
                };
                let field = format!("{}.{}", key, column.name);
                entry.insert(
                    column.payload_key.to_string(),
                    coerce(&field, column.kind, raw)?,
                );
            }
            if !entry.is_empty() {
                table.insert(key.to_string(), Value::Object(entry));
            }
        }
        Ok(table)
    }
}

fn rows_from_record(spec: &RowSpec, record: &Value) -> Vec<DraftRow> {
    let Some(Value::Object(table)) = value_at(record, spec.target) else {
        return Vec::new();
    };
    table
        .iter()
        .map(|(key, entry)| {
            let mut row = DraftRow::from([(spec.key_column.to_string(), key.clone())]);
            for column in spec.columns {
                if let Some(raw) = entry.get(column.payload_key).and_then(raw_string) {
                    row.insert(column.name.to_string(), raw);
                }
            }
            row
        })
        .collect()
}

fn value_at<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |node, segment| node.get(segment))
}

/// The string an operator would type for `value`.
fn raw_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(raw_string)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Null | Value::Object(_) => None,
    }
}

fn coerce(field: &str, kind: FieldKind, raw: &str) -> Result<Value, FormError> {
    let invalid_number = || FormError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    };

    match kind {
        FieldKind::Text => Ok(Value::String(raw.to_string())),
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| invalid_number()),
        FieldKind::Decimal => {
            if let Ok(whole) = raw.parse::<i64>() {
                return Ok(Value::from(whole));
            }
            raw.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(invalid_number)
        }
        FieldKind::Flag => match raw.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(Value::Bool(true)),
            "false" | "no" | "0" | "off" => Ok(Value::Bool(false)),
            _ => Err(FormError::InvalidChoice {
                field: field.to_string(),
                value: raw.to_string(),
                allowed: vec!["true".to_string(), "false".to_string()],
            }),
        },
        FieldKind::List => Ok(Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        )),
        FieldKind::Choice(allowed) => allowed
            .iter()
            .find(|option| option.eq_ignore_ascii_case(raw))
            .map(|option| Value::String(option.to_string()))
            .ok_or_else(|| FormError::InvalidChoice {
                field: field.to_string(),
                value: raw.to_string(),
                allowed: allowed.iter().map(|a| a.to_string()).collect(),
            }),
    }
}

fn insert_path(root: &mut Map<String, Value>, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            root.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let child = root
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(map) = child {
                insert_path(map, rest, value);
            }
        }
    }
}
