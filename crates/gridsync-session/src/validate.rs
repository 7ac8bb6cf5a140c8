//! Field-level checks run before a row is persisted

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use gridsync_core::{DataRecord, FieldMeta, FieldType, find_field, is_blank};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// A required field has no value
    Required,
    /// The value cannot be read as the field's type
    Malformed(FieldType),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::Required,
        }
    }

    pub fn malformed(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: field.into(),
            kind: FieldErrorKind::Malformed(field_type),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field),
            FieldErrorKind::Malformed(field_type) => {
                write!(f, "{} is not a valid {:?} value", self.field, field_type)
            }
        }
    }
}

/// Check the values of `columns` in `record` against their field metadata.
///
/// Only the listed columns are checked, since those are the only ones the
/// user can fix from the row. Columns without metadata are skipped.
pub fn validate_record(
    record: &DataRecord,
    fields: &[FieldMeta],
    columns: &[String],
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for column in columns {
        let Some(meta) = find_field(fields, column) else {
            continue;
        };
        match record.get(column) {
            value if is_blank(value) => {
                if meta.required {
                    errors.push(FieldError::required(column.as_str()));
                }
            }
            Some(value) if !is_well_formed(meta.field_type, value) => {
                errors.push(FieldError::malformed(column.as_str(), meta.field_type));
            }
            _ => {}
        }
    }
    errors
}

fn is_well_formed(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::Integer | FieldType::Long => match value {
            Value::Number(n) => n.is_i64() || n.is_u64(),
            Value::String(s) => s.trim().parse::<i64>().is_ok(),
            _ => false,
        },
        FieldType::Decimal => match value {
            Value::Number(_) => true,
            Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
            _ => false,
        },
        FieldType::Boolean => value.is_boolean(),
        FieldType::Date => value
            .as_str()
            .is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()),
        FieldType::Datetime => value.as_str().is_some_and(|s| {
            DateTime::parse_from_rfc3339(s).is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
                || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        }),
        FieldType::Time => value.as_str().is_some_and(|s| {
            NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
                || NaiveTime::parse_from_str(s, "%H:%M").is_ok()
        }),
        FieldType::ManyToOne | FieldType::OneToOne => value.is_object(),
        FieldType::OneToMany | FieldType::ManyToMany => value.is_array(),
        _ => true,
    }
}

#[cfg(test)]
mod tests;
