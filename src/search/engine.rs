use serde::de::DeserializeOwned;

use super::mapper::ResultMapper;
use super::pagination::PaginationNormalizer;
use super::predicate::PredicateCompiler;
use super::scope::{CallerIdentity, ScopeInjector};
use super::sort::SortResolver;
use super::types::{PageResult, PaginationMetadata, SearchRequest};
use crate::config;
use crate::entity::EntityConfig;
use crate::error::SearchError;
use crate::store::SearchStore;

/// One engine for every list endpoint: compile, scope, execute, map.
///
/// The store is injected so the engine runs identically against Postgres or
/// the in-memory fake. Each invocation is stateless; nothing outlives the
/// returned page.
pub struct SearchEngine<S> {
    store: S,
}

impl<S: SearchStore> SearchEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn search<T: DeserializeOwned>(
        &self,
        entity: &EntityConfig,
        caller: Option<&CallerIdentity>,
        request: &SearchRequest,
    ) -> Result<PageResult<T>, SearchError> {
        let plan = PaginationNormalizer::normalize(entity.default_limit, request.page, request.limit);
        let mut predicates = PredicateCompiler::compile(entity, &request.filters)?;
        ScopeInjector::inject(entity, caller, &mut predicates)?;
        let sort = SortResolver::resolve(
            entity,
            request.sort_field.as_deref(),
            request.sort_direction.as_deref(),
        );

        if config::config().debug_logging {
            tracing::debug!(
                collection = entity.collection,
                predicates = %serde_json::to_string(&predicates).unwrap_or_default(),
                sort_field = %sort.field,
                page = plan.page,
                limit = plan.limit,
                "compiled search plan"
            );
        }

        // Count and fetch run concurrently without a shared snapshot; under
        // concurrent writes the two reads may observe different instants.
        let count = self.store.count(entity.collection, &predicates);
        let fetch = self
            .store
            .fetch(entity.collection, &predicates, &sort, plan.skip, plan.limit);
        let (records, rows) = tokio::try_join!(count, fetch)?;

        let data = ResultMapper::map_rows(entity, rows)?;
        Ok(PageResult {
            pagination: PaginationMetadata::new(&plan, records),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::product;
    use crate::store::memory::MemoryStore;
    use crate::store::StoreError;
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};

    /// Count and fetch are independent reads; this store answers them from
    /// different instants, like a live table under concurrent writes.
    struct SkewedStore;

    #[async_trait]
    impl crate::store::SearchStore for SkewedStore {
        async fn count(&self, _: &str, _: &[crate::search::predicate::Predicate]) -> Result<i64, StoreError> {
            Ok(100)
        }

        async fn fetch(
            &self,
            _: &str,
            _: &[crate::search::predicate::Predicate],
            _: &crate::search::types::SortSpec,
            _: i64,
            _: i64,
        ) -> Result<Vec<Map<String, Value>>, StoreError> {
            let row = json!({ "id": "row-1" });
            Ok(vec![row.as_object().unwrap().clone()])
        }
    }

    #[tokio::test]
    async fn count_and_fetch_are_not_reconciled() {
        let engine = SearchEngine::new(SkewedStore);
        let page: PageResult<Value> = engine
            .search(&product::PRODUCTS, None, &SearchRequest::default())
            .await
            .unwrap();

        // metadata trusts the count read, data trusts the fetch read
        assert_eq!(page.pagination.records, 100);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_a_single_error() {
        let engine = SearchEngine::new(MemoryStore::new());
        let result: Result<PageResult<Value>, _> = engine
            .search(&product::PRODUCTS, None, &SearchRequest::default())
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }
}
