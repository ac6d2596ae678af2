use std::collections::BTreeMap;

use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A list/search request as handed over by the controller layer.
///
/// `page` and `limit` tolerate non-integer numbers (truncated) because list
/// endpoints must stay resilient to malformed pagination; anything the
/// compiler does not recognize under `filters` is rejected later instead.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default, deserialize_with = "lenient_int")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int")]
    pub limit: Option<i64>,
    #[serde(default, alias = "order_by", alias = "sort_by")]
    pub sort_field: Option<String>,
    #[serde(default, alias = "order", alias = "sort_dir")]
    pub sort_direction: Option<String>,
    /// Entity-specific filter fields, independently optional/nullable.
    #[serde(flatten)]
    pub filters: BTreeMap<String, Value>,
}

fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            Ok(n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)))
        }
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a number, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// A resolved sort: the field is guaranteed to come from the entity
/// allow-list by the time this struct exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    pub current: i64,
    pub limit: i64,
    pub records: i64,
    pub pages: i64,
}

/// The paginated response envelope: `{ pagination: {...}, data: [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub pagination: PaginationMetadata,
    pub data: Vec<T>,
}

impl<T: Serialize> IntoResponse for PageResult<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
