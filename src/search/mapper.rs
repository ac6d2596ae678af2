use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::entity::EntityConfig;

/// Epoch values at or above this are milliseconds, below are seconds.
const EPOCH_MILLIS_CUTOFF: i64 = 100_000_000_000;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Invalid timestamp format for field '{field}': {value}")]
    InvalidTimestamp { field: String, value: String },

    #[error("Row shape mismatch: {0}")]
    Shape(#[from] serde_json::Error),
}

pub struct ResultMapper;

impl ResultMapper {
    /// Convert fetched rows into typed view models.
    ///
    /// Every temporal field the entity declares is canonicalized to an
    /// RFC 3339 string and guaranteed present (null when the store has no
    /// value), so the output shape is stable whether or not the underlying
    /// value exists.
    pub fn map_rows<T: DeserializeOwned>(
        entity: &EntityConfig,
        rows: Vec<Map<String, Value>>,
    ) -> Result<Vec<T>, MapError> {
        rows.into_iter()
            .map(|row| {
                let row = Self::canonicalize(entity, row)?;
                Ok(serde_json::from_value(Value::Object(row))?)
            })
            .collect()
    }

    fn canonicalize(
        entity: &EntityConfig,
        mut row: Map<String, Value>,
    ) -> Result<Map<String, Value>, MapError> {
        for field in entity.temporal_fields {
            let canonical = match row.get(*field) {
                None | Some(Value::Null) => Value::Null,
                Some(value) => Value::String(canonical_timestamp(field, value)?),
            };
            row.insert(field.to_string(), canonical);
        }
        Ok(row)
    }
}

fn canonical_timestamp(field: &str, value: &Value) -> Result<String, MapError> {
    let invalid = || MapError::InvalidTimestamp {
        field: field.to_string(),
        value: value.to_string(),
    };

    let parsed: DateTime<Utc> = match value {
        Value::Number(n) => {
            let epoch = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
                .ok_or_else(invalid)?;
            if epoch.abs() >= EPOCH_MILLIS_CUTOFF {
                DateTime::from_timestamp_millis(epoch).ok_or_else(invalid)?
            } else {
                DateTime::from_timestamp(epoch, 0).ok_or_else(invalid)?
            }
        }
        Value::String(s) => parse_timestamp_str(s).ok_or_else(invalid)?,
        _ => return Err(invalid()),
    };

    Ok(parsed.to_rfc3339())
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Driver-native text forms without a zone are read as UTC
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}
