pub mod memory;
pub mod postgres;
pub mod sql;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::search::predicate::Predicate;
use crate::search::types::SortSpec;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// The persistence seam: a compiled plan in, JSON rows out.
///
/// Implementations must apply every predicate to both reads; the engine
/// issues `count` and `fetch` concurrently against the same predicate list
/// and does not expect a shared snapshot.
#[async_trait]
pub trait SearchStore: Send + Sync {
    async fn count(&self, collection: &str, predicates: &[Predicate]) -> Result<i64, StoreError>;

    async fn fetch(
        &self,
        collection: &str,
        predicates: &[Predicate],
        sort: &SortSpec,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Map<String, Value>>, StoreError>;
}
