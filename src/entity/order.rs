use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityConfig, FieldRule, FilterKind, SortKey};
use crate::search::scope::ScopeRule;
use crate::search::types::SortDirection;

/// Customer orders: owner-scoped, customers only ever see their own.
pub static ORDERS: EntityConfig = EntityConfig {
    collection: "orders",
    filter_fields: &[
        FieldRule { field: "status", kind: FilterKind::Membership },
        FieldRule { field: "customer_id", kind: FilterKind::Equality },
        FieldRule { field: "amount", kind: FilterKind::Range },
        FieldRule { field: "placed_at", kind: FilterKind::Range },
    ],
    text_search: None,
    sort_allow_list: &["placed_at", "amount", "status"],
    default_sort: SortKey { field: "placed_at", direction: SortDirection::Desc },
    default_limit: 10,
    temporal_fields: &["placed_at", "shipped_at", "deleted_at"],
    scope: ScopeRule { owner_field: Some("customer_id"), soft_delete_field: Some("deleted_at") },
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub amount: Decimal,
    pub currency: String,
    pub placed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}
