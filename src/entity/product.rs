use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityConfig, FieldRule, FilterKind, SortKey, TextSearchRule};
use crate::search::scope::ScopeRule;
use crate::search::types::SortDirection;

/// Catalog products: publicly searchable, no ownership scope.
pub static PRODUCTS: EntityConfig = EntityConfig {
    collection: "products",
    filter_fields: &[
        FieldRule { field: "status", kind: FilterKind::Equality },
        FieldRule { field: "sku", kind: FilterKind::Equality },
        FieldRule { field: "category_id", kind: FilterKind::Membership },
        FieldRule { field: "price", kind: FilterKind::Range },
        FieldRule { field: "created_at", kind: FilterKind::Range },
    ],
    text_search: Some(TextSearchRule { param: "q", fields: &["name", "description"] }),
    sort_allow_list: &["name", "price", "created_at", "updated_at"],
    default_sort: SortKey { field: "created_at", direction: SortDirection::Desc },
    default_limit: 20,
    temporal_fields: &["created_at", "updated_at", "deleted_at"],
    scope: ScopeRule { owner_field: None, soft_delete_field: Some("deleted_at") },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub status: String,
    pub category_id: Option<Uuid>,
    pub price: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}
