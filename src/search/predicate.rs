use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;
use serde::Serialize;

use super::error::FilterError;
use crate::entity::{EntityConfig, FilterKind};

/// A single compiled filter condition. All predicates on a plan are AND-ed;
/// `MatchesAny` is the one composite (OR across columns) and only ever comes
/// from an entity-defined free-text rule, never from a named filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// `value == null` means "field IS NULL", mirroring the equality
    /// convention of the wire filters.
    Equals { field: String, value: Value },
    Range {
        field: String,
        from: Option<Value>,
        to: Option<Value>,
    },
    Contains { field: String, substring: String },
    In { field: String, values: Vec<Value> },
    MatchesAny {
        fields: Vec<String>,
        substring: String,
    },
}

impl Predicate {
    /// The single column this predicate constrains, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::Equals { field, .. }
            | Predicate::Range { field, .. }
            | Predicate::Contains { field, .. }
            | Predicate::In { field, .. } => Some(field),
            Predicate::MatchesAny { .. } => None,
        }
    }
}

pub struct PredicateCompiler;

impl PredicateCompiler {
    /// Compile the request filter map into an ordered predicate list.
    ///
    /// Absent and null values both mean "no constraint". Unknown filter
    /// fields carrying a concrete value are rejected: silently dropping one
    /// would widen the result set behind the caller's back.
    pub fn compile(
        entity: &EntityConfig,
        filters: &BTreeMap<String, Value>,
    ) -> Result<Vec<Predicate>, FilterError> {
        let mut predicates = Vec::new();
        let mut consumed: BTreeSet<&str> = BTreeSet::new();

        for rule in entity.filter_fields {
            match rule.kind {
                FilterKind::Equality => {
                    if let Some(value) = present(filters, rule.field, &mut consumed) {
                        predicates.push(Predicate::Equals {
                            field: rule.field.to_string(),
                            value: scalar(rule.field, value)?,
                        });
                    }
                }
                FilterKind::Range => {
                    let from = range_bound(filters, rule.field, &["_from", "_min"], &mut consumed)?;
                    let to = range_bound(filters, rule.field, &["_to", "_max"], &mut consumed)?;
                    if from.is_some() || to.is_some() {
                        predicates.push(Predicate::Range {
                            field: rule.field.to_string(),
                            from,
                            to,
                        });
                    }
                }
                FilterKind::Substring => {
                    if let Some(value) = present(filters, rule.field, &mut consumed) {
                        match value {
                            Value::String(s) => predicates.push(Predicate::Contains {
                                field: rule.field.to_string(),
                                substring: s.clone(),
                            }),
                            _ => {
                                return Err(FilterError::InvalidValue {
                                    field: rule.field.to_string(),
                                    expected: "a string",
                                })
                            }
                        }
                    }
                }
                FilterKind::Membership => {
                    if let Some(value) = present(filters, rule.field, &mut consumed) {
                        let values = match value {
                            Value::Array(items) => items
                                .iter()
                                .map(|v| scalar(rule.field, v))
                                .collect::<Result<Vec<_>, _>>()?,
                            // A bare scalar is a one-element set
                            other => vec![scalar(rule.field, other)?],
                        };
                        predicates.push(Predicate::In {
                            field: rule.field.to_string(),
                            values,
                        });
                    }
                }
            }
        }

        if let Some(text) = &entity.text_search {
            if let Some(value) = present(filters, text.param, &mut consumed) {
                match value {
                    Value::String(s) if !s.is_empty() => predicates.push(Predicate::MatchesAny {
                        fields: text.fields.iter().map(|f| f.to_string()).collect(),
                        substring: s.clone(),
                    }),
                    Value::String(_) => {}
                    _ => {
                        return Err(FilterError::InvalidValue {
                            field: text.param.to_string(),
                            expected: "a string",
                        })
                    }
                }
            }
        }

        // Leftover keys with a concrete value were not declared by the entity
        for (key, value) in filters {
            if !value.is_null() && !consumed.contains(key.as_str()) {
                return Err(FilterError::UnknownField(key.clone()));
            }
        }

        Ok(predicates)
    }
}

/// Look up a filter value, treating null as absent. Marks the key consumed
/// either way so a null for a declared field is not flagged as unknown.
fn present<'a>(
    filters: &'a BTreeMap<String, Value>,
    field: &'static str,
    consumed: &mut BTreeSet<&'a str>,
) -> Option<&'a Value> {
    let (key, value) = filters.get_key_value(field)?;
    consumed.insert(key.as_str());
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn scalar(field: &str, value: &Value) -> Result<Value, FilterError> {
    match value {
        Value::Array(_) | Value::Object(_) => Err(FilterError::InvalidValue {
            field: field.to_string(),
            expected: "a scalar value",
        }),
        other => Ok(other.clone()),
    }
}

fn range_bound<'a>(
    filters: &'a BTreeMap<String, Value>,
    field: &'static str,
    suffixes: &[&str],
    consumed: &mut BTreeSet<&'a str>,
) -> Result<Option<Value>, FilterError> {
    let mut bound = None;
    for suffix in suffixes {
        let key = format!("{}{}", field, suffix);
        if let Some((stored_key, value)) = filters.get_key_value(&key) {
            // consume every spelling so an alternate one is not misread as
            // an unknown field; the first non-null value wins
            consumed.insert(stored_key.as_str());
            if value.is_null() || bound.is_some() {
                continue;
            }
            match value {
                Value::Number(_) | Value::String(_) => bound = Some(value.clone()),
                _ => {
                    return Err(FilterError::InvalidRangeBound {
                        field: field.to_string(),
                    })
                }
            }
        }
    }
    Ok(bound)
}
