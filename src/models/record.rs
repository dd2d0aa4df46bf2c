use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::value::quote;
use super::{AttrValue, ClassName};

/// JSON field carrying the record kind in the persisted form.
pub const CLASS_FIELD: &str = "__class__";

/// Names managed by the record itself; they never live in the attribute bag.
pub const RESERVED_FIELDS: [&str; 4] = ["id", "created_at", "updated_at", CLASS_FIELD];

/// Reasons a persisted object cannot be turned back into a [`Record`].
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("entry is not an object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be a string")]
    NotAString(&'static str),

    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("invalid timestamp in `{field}`: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("unsupported value for attribute `{0}`")]
    InvalidAttribute(String),

    #[error("stored under `{stored}` but describes `{actual}`")]
    KeyMismatch { stored: String, actual: String },
}

/// One managed domain object.
///
/// `id` and `created_at` are fixed at creation. `updated_at` moves forward
/// whenever the record is changed through [`Record::touch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub class: ClassName,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub attributes: BTreeMap<String, AttrValue>,
}

/// Current time at the precision the JSON file stores.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Accepts RFC 3339 as well as naive ISO-8601 (no offset, taken as UTC).
fn parse_timestamp(field: &'static str, raw: &str) -> Result<DateTime<Utc>, RecordError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| RecordError::InvalidTimestamp {
            field,
            value: raw.to_string(),
        })
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, RecordError> {
    match obj.get(field) {
        None => Err(RecordError::MissingField(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RecordError::NotAString(field)),
    }
}

impl Record {
    /// Build a fresh record with a new id, current timestamps and the class
    /// defaults.
    pub fn new(class: ClassName) -> Self {
        let ts = now();
        let attributes = class
            .defaults()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            class,
            created_at: ts,
            updated_at: ts,
            attributes,
        }
    }

    /// Rebuild a record from its persisted object form.
    ///
    /// The stored id and timestamps are used verbatim. Class defaults missing
    /// from the object are filled in.
    pub fn from_json(obj: &Map<String, Value>) -> Result<Self, RecordError> {
        let tag = string_field(obj, CLASS_FIELD)?;
        let class = ClassName::from_str(&tag).ok_or(RecordError::UnknownClass(tag))?;
        let id = string_field(obj, "id")?;
        let created_at = parse_timestamp("created_at", &string_field(obj, "created_at")?)?;
        let updated_at = parse_timestamp("updated_at", &string_field(obj, "updated_at")?)?;

        let mut attributes: BTreeMap<String, AttrValue> = class
            .defaults()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();

        for (name, raw) in obj {
            if RESERVED_FIELDS.contains(&name.as_str()) {
                continue;
            }
            let value: AttrValue = serde_json::from_value(raw.clone())
                .map_err(|_| RecordError::InvalidAttribute(name.clone()))?;
            attributes.insert(name.clone(), value);
        }

        Ok(Self {
            id,
            class,
            created_at,
            updated_at,
            attributes,
        })
    }

    /// The persisted object form: every attribute plus id, timestamps and
    /// `__class__`. Fails on a value JSON cannot hold (a non-finite float).
    pub fn to_json(&self) -> Result<Map<String, Value>, RecordError> {
        let mut obj = Map::new();
        obj.insert("id".to_string(), Value::String(self.id.clone()));
        obj.insert(
            "created_at".to_string(),
            Value::String(format_timestamp(&self.created_at)),
        );
        obj.insert(
            "updated_at".to_string(),
            Value::String(format_timestamp(&self.updated_at)),
        );
        for (name, value) in &self.attributes {
            let v = value
                .to_json()
                .ok_or_else(|| RecordError::InvalidAttribute(name.clone()))?;
            obj.insert(name.clone(), v);
        }
        obj.insert(
            CLASS_FIELD.to_string(),
            Value::String(self.class.as_str().to_string()),
        );
        Ok(obj)
    }

    /// Registry key: `<Class>.<id>`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.class, self.id)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: AttrValue) {
        self.attributes.insert(name.into(), value);
    }

    /// Mark the record as modified now. Never moves `updated_at` backwards.
    pub fn touch(&mut self) {
        self.updated_at = now().max(self.created_at);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {{id: {}, created_at: {}, updated_at: {}",
            self.class,
            self.id,
            quote(&self.id),
            quote(&format_timestamp(&self.created_at)),
            quote(&format_timestamp(&self.updated_at)),
        )?;
        for (name, value) in &self.attributes {
            write!(f, ", {}: {}", name, value)?;
        }
        f.write_str("}")
    }
}
