use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fields::{
    validate_date, validate_device, validate_path, validate_referrer, validate_timestamp,
};
use crate::limits::Limits;

/// Field names a visit record must carry, in wire order. Every field is a
/// JSON string.
pub const VISIT_SCHEMA: [&str; 5] = ["path", "ref", "device", "ts", "date"];

/// One logged page view that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRecord {
    pub path: String,
    #[serde(rename = "ref")]
    pub referrer: String,
    pub device: String,
    pub ts: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Invalid record: expected JSON object")]
    NotAnObject,
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),
    #[error("Invalid type for {0}: expected str")]
    InvalidType(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Invalid referrer: {0}")]
    InvalidReferrer(String),
    #[error("Invalid device: {0}")]
    InvalidDevice(String),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl VisitRecord {
    /// Validate a decoded JSON value and build a record from it.
    pub fn from_value(value: &Value, limits: &Limits) -> Result<Self, RecordError> {
        let fields = value.as_object().ok_or(RecordError::NotAnObject)?;
        validate_visit_record(fields, limits)
    }

    /// Compact single-line JSON, fields in schema order.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Check a candidate record against the schema and the per-field rules.
///
/// Checks run in a fixed order: presence of every schema field, absence of
/// any other field, string types, then each field's own validator. The first
/// failure is reported.
pub fn validate_visit_record(
    fields: &Map<String, Value>,
    limits: &Limits,
) -> Result<VisitRecord, RecordError> {
    if let Some(missing) = VISIT_SCHEMA.iter().find(|name| !fields.contains_key(**name)) {
        return Err(RecordError::MissingField(missing.to_string()));
    }

    if let Some(extra) = fields.keys().find(|key| !VISIT_SCHEMA.contains(&key.as_str())) {
        return Err(RecordError::UnexpectedField(extra.clone()));
    }

    let path = string_field(fields, "path")?;
    let referrer = string_field(fields, "ref")?;
    let device = string_field(fields, "device")?;
    let ts = string_field(fields, "ts")?;
    let date = string_field(fields, "date")?;

    if !validate_path(path, limits.max_path_length) {
        return Err(RecordError::InvalidPath(path.to_string()));
    }
    if !validate_referrer(referrer, limits.max_referrer_length) {
        return Err(RecordError::InvalidReferrer(referrer.to_string()));
    }
    if !validate_device(device) {
        return Err(RecordError::InvalidDevice(device.to_string()));
    }
    if !validate_timestamp(ts, limits.max_timestamp_length) {
        return Err(RecordError::InvalidTimestamp(ts.to_string()));
    }
    if !validate_date(date) {
        return Err(RecordError::InvalidDate(date.to_string()));
    }

    Ok(VisitRecord {
        path: path.to_string(),
        referrer: referrer.to_string(),
        device: device.to_string(),
        ts: ts.to_string(),
        date: date.to_string(),
    })
}

fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str, RecordError> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| RecordError::InvalidType(name.to_string()))
}
