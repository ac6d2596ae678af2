//! Per-entity search configuration.
//!
//! Every list endpoint used to re-derive the same filter/sort/scope plumbing
//! by hand; here each entity declares it once and the engine does the rest.

pub mod customer;
pub mod order;
pub mod product;

use crate::search::scope::ScopeRule;
use crate::search::types::SortDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Exact match on the field value.
    Equality,
    /// Bounded by `<field>_from`/`<field>_to` or `<field>_min`/`<field>_max`.
    Range,
    /// Substring match, native collation.
    Substring,
    /// Field value must be one of a finite set.
    Membership,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub kind: FilterKind,
}

/// Free-text search across several columns, exposed as one request
/// parameter and compiled to a single composite predicate.
#[derive(Debug, Clone, Copy)]
pub struct TextSearchRule {
    pub param: &'static str,
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct SortKey {
    pub field: &'static str,
    pub direction: SortDirection,
}

/// Everything the engine needs to know about one searchable collection.
#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    pub collection: &'static str,
    /// Declared filterable fields, in compilation order.
    pub filter_fields: &'static [FieldRule],
    pub text_search: Option<TextSearchRule>,
    pub sort_allow_list: &'static [&'static str],
    pub default_sort: SortKey,
    pub default_limit: i64,
    /// Fields the mapper canonicalizes to RFC 3339 (always present in output).
    pub temporal_fields: &'static [&'static str],
    pub scope: ScopeRule,
}
