use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityConfig, FieldRule, FilterKind, SortKey};
use crate::search::scope::ScopeRule;
use crate::search::types::SortDirection;

/// Customer accounts: self-scoped via the id column, so a non-administrative
/// caller listing customers only ever sees their own record.
pub static CUSTOMERS: EntityConfig = EntityConfig {
    collection: "customers",
    filter_fields: &[
        FieldRule { field: "status", kind: FilterKind::Equality },
        FieldRule { field: "email", kind: FilterKind::Substring },
        FieldRule { field: "name", kind: FilterKind::Substring },
        FieldRule { field: "created_at", kind: FilterKind::Range },
    ],
    text_search: None,
    sort_allow_list: &["name", "email", "created_at"],
    default_sort: SortKey { field: "created_at", direction: SortDirection::Desc },
    default_limit: 100,
    temporal_fields: &["created_at", "updated_at", "deleted_at"],
    scope: ScopeRule { owner_field: Some("id"), soft_delete_field: Some("deleted_at") },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}
