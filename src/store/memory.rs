//! In-memory store: the fake persistence backend the engine is tested
//! against. Predicate semantics track the SQL translation in `sql.rs`.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::{SearchStore, StoreError};
use crate::search::predicate::Predicate;
use crate::search::types::{SortDirection, SortSpec};

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    collections: HashMap<String, Vec<Map<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection from JSON rows. Panics on non-object rows; this is
    /// test fixture plumbing, not an ingestion path.
    pub fn with_collection(mut self, name: impl Into<String>, rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| match row {
                Value::Object(map) => map,
                other => panic!("collection rows must be JSON objects, got {}", other),
            })
            .collect();
        self.collections.insert(name.into(), rows);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, row: Map<String, Value>) {
        self.collections.entry(name.into()).or_default().push(row);
    }

    fn rows(&self, collection: &str) -> Result<&Vec<Map<String, Value>>, StoreError> {
        self.collections
            .get(collection)
            .ok_or_else(|| StoreError::UnknownCollection(collection.to_string()))
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn count(&self, collection: &str, predicates: &[Predicate]) -> Result<i64, StoreError> {
        let matching = self
            .rows(collection)?
            .iter()
            .filter(|row| matches_all(row, predicates))
            .count();
        Ok(matching as i64)
    }

    async fn fetch(
        &self,
        collection: &str,
        predicates: &[Predicate],
        sort: &SortSpec,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Map<String, Value>>, StoreError> {
        let mut matching: Vec<Map<String, Value>> = self
            .rows(collection)?
            .iter()
            .filter(|row| matches_all(row, predicates))
            .cloned()
            .collect();

        // Stable sort keeps insertion order for equal keys, so identical
        // requests over unchanged data page identically.
        matching.sort_by(|a, b| {
            let ordering = compare_fields(a.get(&sort.field), b.get(&sort.field));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        Ok(matching
            .into_iter()
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }
}

fn matches_all(row: &Map<String, Value>, predicates: &[Predicate]) -> bool {
    predicates.iter().all(|p| matches(row, p))
}

fn matches(row: &Map<String, Value>, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::Equals { field, value } => match field_value(row, field) {
            None => value.is_null(),
            Some(actual) => json_eq(actual, value),
        },
        Predicate::Range { field, from, to } => {
            let Some(actual) = field_value(row, field) else {
                return false;
            };
            let lower_ok = from.as_ref().map_or(true, |bound| {
                compare_values(actual, bound).map_or(false, |o| o != Ordering::Less)
            });
            let upper_ok = to.as_ref().map_or(true, |bound| {
                compare_values(actual, bound).map_or(false, |o| o != Ordering::Greater)
            });
            lower_ok && upper_ok
        }
        Predicate::Contains { field, substring } => field_value(row, field)
            .and_then(Value::as_str)
            .map_or(false, |s| s.contains(substring)),
        Predicate::In { field, values } => field_value(row, field)
            .map_or(false, |actual| values.iter().any(|v| json_eq(actual, v))),
        Predicate::MatchesAny { fields, substring } => fields.iter().any(|field| {
            field_value(row, field)
                .and_then(Value::as_str)
                .map_or(false, |s| s.contains(substring))
        }),
    }
}

/// Absent and explicit null are the same thing to a predicate.
fn field_value<'a>(row: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    row.get(field).filter(|v| !v.is_null())
}

fn json_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(_), Value::Number(_)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

/// Total ordering for sort keys: null/absent first, incomparable equal.
fn compare_fields(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn equality_with_null_matches_absent_field() {
        let p = Predicate::Equals { field: "deleted_at".to_string(), value: Value::Null };
        assert!(matches(&row(json!({ "id": 1 })), &p));
        assert!(matches(&row(json!({ "id": 1, "deleted_at": null })), &p));
        assert!(!matches(&row(json!({ "id": 1, "deleted_at": "2026-01-01" })), &p));
    }

    #[test]
    fn range_compares_numbers_numerically() {
        let p = Predicate::Range {
            field: "amount".to_string(),
            from: Some(json!(100)),
            to: Some(json!(500)),
        };
        assert!(matches(&row(json!({ "amount": 100 })), &p));
        assert!(matches(&row(json!({ "amount": 250.5 })), &p));
        assert!(!matches(&row(json!({ "amount": 99 })), &p));
        assert!(!matches(&row(json!({ "amount": "high" })), &p));
    }

    #[test]
    fn membership_uses_numeric_equality_across_representations() {
        let p = Predicate::In { field: "code".to_string(), values: vec![json!(10.0)] };
        assert!(matches(&row(json!({ "code": 10 })), &p));
    }

    #[tokio::test]
    async fn unknown_collection_errors() {
        let store = MemoryStore::new();
        let err = store.count("nowhere", &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownCollection(_)));
    }
}
