use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{Column, PgPool, Row};

use super::sql;
use super::{SearchStore, StoreError};
use crate::search::predicate::Predicate;
use crate::search::types::SortSpec;

/// Postgres-backed store executing compiled plans over a shared pool.
pub struct PgSearchStore {
    pool: PgPool,
}

impl PgSearchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchStore for PgSearchStore {
    async fn count(&self, collection: &str, predicates: &[Predicate]) -> Result<i64, StoreError> {
        let compiled = sql::count_sql(collection, predicates)?;
        let mut q = sqlx::query(&compiled.text);
        for p in compiled.params.iter() {
            q = bind_param(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count)
    }

    async fn fetch(
        &self,
        collection: &str,
        predicates: &[Predicate],
        sort: &SortSpec,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Map<String, Value>>, StoreError> {
        let compiled = sql::select_sql(collection, predicates, sort, skip, limit)?;
        let mut q = sqlx::query(&compiled.text);
        for p in compiled.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(row_to_map).collect())
    }
}

fn bind_param<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    v: &'q Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(u) = n.as_u64() {
                // Postgres doesn't have u64; cast down if safe
                q.bind(u as i64)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s),
        Value::Array(_) => {
            // Arrays are expanded into per-element placeholders upstream
            q
        }
        Value::Object(_) => q.bind(v.clone()), // JSONB
    }
}

/// Convert a row into a JSON map, column by column. Unmappable values
/// degrade to null rather than failing the whole page.
fn row_to_map(row: PgRow) -> Map<String, Value> {
    let mut map = Map::new();
    for i in 0..row.len() {
        let column_name = row.column(i).name();

        let json_value = match row.try_get::<Option<Value>, _>(i) {
            Ok(Some(v)) => v,
            Ok(None) => Value::Null,
            Err(_) => {
                if let Ok(s) = row.try_get::<String, _>(i) {
                    Value::String(s)
                } else if let Ok(ts) = row.try_get::<DateTime<Utc>, _>(i) {
                    Value::String(ts.to_rfc3339())
                } else if let Ok(ts) = row.try_get::<chrono::NaiveDateTime, _>(i) {
                    // zoneless columns are stored in UTC
                    Value::String(ts.and_utc().to_rfc3339())
                } else if let Ok(id) = row.try_get::<uuid::Uuid, _>(i) {
                    Value::String(id.to_string())
                } else if let Ok(d) = row.try_get::<rust_decimal::Decimal, _>(i) {
                    Value::String(d.to_string())
                } else if let Ok(i64_val) = row.try_get::<i64, _>(i) {
                    Value::Number(i64_val.into())
                } else if let Ok(f64_val) = row.try_get::<f64, _>(i) {
                    Value::Number(
                        serde_json::Number::from_f64(f64_val).unwrap_or_else(|| 0.into()),
                    )
                } else if let Ok(bool_val) = row.try_get::<bool, _>(i) {
                    Value::Bool(bool_val)
                } else {
                    Value::Null
                }
            }
        };

        map.insert(column_name.to_string(), json_value);
    }
    map
}
